use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    services::categories::{CreateCategoryInput, UpdateCategoryInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Create a new category
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let category = state
        .services
        .categories
        .create_category(CreateCategoryInput {
            name: payload.name,
            description: payload.description,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(category))
}

/// Get a category by ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .categories
        .get_category(&category_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Category with ID {} not found", category_id))
        })?;

    Ok(success_response(category))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let category = state
        .services
        .categories
        .update_category(
            category_id,
            UpdateCategoryInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Soft-delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .categories
        .delete_category(category_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List categories with pagination
pub async fn list_categories(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (categories, total) = state
        .services
        .categories
        .list_categories(pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        categories,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

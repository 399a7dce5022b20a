use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    services::users::{CreateUserInput, UpdateUserInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    /// One of `admin`, `user`, `vendedor`, `bodeguero`
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let created = state
        .services
        .users
        .create_user(CreateUserInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
        })
        .await
        .map_err(map_service_error)?;

    info!("User created: {}", created.id);
    Ok(created_response(created))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let found = state
        .services
        .users
        .get_user(&user_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", user_id)))?;

    Ok(success_response(found))
}

/// Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let updated = state
        .services
        .users
        .update_user(
            user_id,
            UpdateUserInput {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: payload.role,
                active: payload.active,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

/// Deactivate a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .users
        .deactivate_user(user_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List users with pagination
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (users, total) = state
        .services
        .users
        .list_users(pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        users,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

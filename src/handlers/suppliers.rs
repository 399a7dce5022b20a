use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    services::suppliers::{CreateSupplierInput, UpdateSupplierInput},
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
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Chilean RUT in any accepted spelling; normalized on write
    #[validate(length(min = 8, max = 13))]
    pub rut: String,

    #[validate(email)]
    pub email: String,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub rut: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub payment_terms: Option<String>,
}

/// Create a new supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .create_supplier(CreateSupplierInput {
            name: payload.name,
            rut: payload.rut,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            contact_name: payload.contact_name,
            payment_terms: payload.payment_terms,
        })
        .await
        .map_err(map_service_error)?;

    info!("Supplier created: {}", supplier.id);
    Ok(created_response(supplier))
}

/// Get a supplier by ID
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get_supplier(&supplier_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Supplier with ID {} not found", supplier_id))
        })?;

    Ok(success_response(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update_supplier(
            supplier_id,
            UpdateSupplierInput {
                name: payload.name,
                rut: payload.rut,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                contact_name: payload.contact_name,
                payment_terms: payload.payment_terms,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

/// Soft-delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .suppliers
        .delete_supplier(supplier_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List suppliers with pagination
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (suppliers, total) = state
        .services
        .suppliers
        .list_suppliers(pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        suppliers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    services::clients::{CreateClientInput, UpdateClientInput},
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
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Chilean RUT in any accepted spelling; normalized on write
    #[validate(length(min = 8, max = 13))]
    pub rut: String,

    #[validate(email)]
    pub email: String,

    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub rut: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Create a new client
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let client = state
        .services
        .clients
        .create_client(CreateClientInput {
            name: payload.name,
            rut: payload.rut,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
        .await
        .map_err(map_service_error)?;

    info!("Client created: {}", client.id);
    Ok(created_response(client))
}

/// Get a client by ID
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = state
        .services
        .clients
        .get_client(&client_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Client with ID {} not found", client_id)))?;

    Ok(success_response(client))
}

/// Update a client
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let client = state
        .services
        .clients
        .update_client(
            client_id,
            UpdateClientInput {
                name: payload.name,
                rut: payload.rut,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(client))
}

/// Soft-delete a client
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .clients
        .delete_client(client_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List clients with pagination
pub async fn list_clients(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (clients, total) = state
        .services
        .clients
        .list_clients(pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        clients,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Search clients by name, rut or email
pub async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = state
        .services
        .clients
        .search_clients(&params.q)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(clients))
}

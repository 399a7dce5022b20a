use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthUser,
    entities::order::OrderStatus,
    errors::ApiError,
    services::orders::{CreateOrderInput, OrderFilter, OrderItemInput, UpdateOrderInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "an order requires at least one item"))]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub client_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: crate::entities::order::Model,
    pub items: Vec<crate::entities::order_item::Model>,
}

/// Create a new order; stock is decremented per item (backorder allowed)
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user_id = user.id().map_err(|_| ApiError::Unauthorized)?;

    let (order, items) = state
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: payload.client_id,
            user_id,
            notes: payload.notes,
            items: payload
                .items
                .into_iter()
                .map(|item| OrderItemInput {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        })
        .await
        .map_err(map_service_error)?;

    info!("Order created: {}", order.id);
    Ok(created_response(OrderResponse { order, items }))
}

/// Get an order with its items
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (order, items) = state
        .services
        .orders
        .get_order(&order_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    Ok(success_response(OrderResponse { order, items }))
}

/// Update an order's status or notes
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .orders
        .update_order(
            order_id,
            UpdateOrderInput {
                status: payload.status,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}

/// Cancel a pending order, restoring stock
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .cancel_order(order_id)
        .await
        .map_err(map_service_error)?;

    info!("Order cancelled: {}", order_id);
    Ok(success_response(order))
}

/// Delete a cancelled order
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .orders
        .delete_order(order_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List orders with pagination and filters
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };

    let (orders, total) = state
        .services
        .orders
        .list_orders(
            OrderFilter {
                client_id: query.client_id,
                status: query.status,
            },
            pagination.per_page,
            pagination.offset(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

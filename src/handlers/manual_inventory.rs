use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::AuthUser,
    entities::manual_inventory::AdjustmentType,
    errors::ApiError,
    services::manual_inventory::AdjustStockInput,
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

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdjustmentRequest {
    pub product_id: Uuid,

    /// `increase` or `decrease`
    #[serde(rename = "type")]
    pub adjustment_type: AdjustmentType,

    #[validate(range(min = 1))]
    pub quantity: i32,

    /// Mandatory when decreasing
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub product_id: Option<Uuid>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    #[serde(flatten)]
    pub record: crate::entities::manual_inventory::Model,
    pub stock_after: i32,
}

/// Apply a manual stock adjustment
pub async fn create_adjustment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAdjustmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user_id = user.id().map_err(|_| ApiError::Unauthorized)?;

    let adjustment = state
        .services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id: payload.product_id,
            user_id,
            adjustment_type: payload.adjustment_type,
            quantity: payload.quantity,
            reason: payload.reason,
        })
        .await
        .map_err(map_service_error)?;

    info!(
        "Manual adjustment {} recorded for product {}",
        adjustment.record.id, payload.product_id
    );

    Ok(created_response(AdjustmentResponse {
        stock_after: adjustment.new_stock,
        record: adjustment.record,
    }))
}

/// Get a single adjustment record
pub async fn get_adjustment(
    State(state): State<AppState>,
    Path(adjustment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .services
        .manual_inventory
        .get_adjustment(&adjustment_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Adjustment with ID {} not found", adjustment_id))
        })?;

    Ok(success_response(record))
}

/// List adjustment records, newest first
pub async fn list_adjustments(
    State(state): State<AppState>,
    Query(query): Query<AdjustmentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };

    let (records, total) = state
        .services
        .manual_inventory
        .list_adjustments(query.product_id, pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        records,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

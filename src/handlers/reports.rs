use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct InventoryReportQuery {
    /// Products at or below this stock level are listed as low-stock
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

fn default_low_stock_threshold() -> i32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct MovementsReportQuery {
    pub product_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SalesReportQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Inventory snapshot: totals, stock value and low-stock products
pub async fn inventory_report(
    State(state): State<AppState>,
    Query(query): Query<InventoryReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .inventory_report(query.low_stock_threshold)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Manual stock movement history with totals
pub async fn movements_report(
    State(state): State<AppState>,
    Query(query): Query<MovementsReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .movements_report(query.product_id, query.from, query.to)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Order volume and revenue summary
pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .sales_report(query.from, query.to)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

//! InventPro API Library
//!
//! Inventory and order management backend: CRUD over clients, suppliers,
//! products, categories, orders and users, manual stock adjustments with an
//! append-only audit trail, and read-only reports, all behind JWT auth with
//! role-based permissions.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod rut;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::consts as perm;
use crate::auth::AuthRouterExt;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

/// Full v1 API router with per-group permission gating.
pub fn api_v1_routes() -> Router<AppState> {
    // Clients routes with permission gating
    let clients_read = Router::new()
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients/search", get(handlers::clients::search_clients))
        .route("/clients/:id", get(handlers::clients::get_client))
        .with_permission(perm::CLIENTS_READ);

    let clients_create = Router::new()
        .route(
            "/clients",
            axum::routing::post(handlers::clients::create_client),
        )
        .with_permission(perm::CLIENTS_CREATE);

    let clients_update = Router::new()
        .route(
            "/clients/:id",
            axum::routing::put(handlers::clients::update_client),
        )
        .with_permission(perm::CLIENTS_UPDATE);

    let clients_delete = Router::new()
        .route(
            "/clients/:id",
            axum::routing::delete(handlers::clients::delete_client),
        )
        .with_permission(perm::CLIENTS_DELETE);

    // Suppliers routes with permission gating
    let suppliers_read = Router::new()
        .route("/suppliers", get(handlers::suppliers::list_suppliers))
        .route("/suppliers/:id", get(handlers::suppliers::get_supplier))
        .with_permission(perm::SUPPLIERS_READ);

    let suppliers_create = Router::new()
        .route(
            "/suppliers",
            axum::routing::post(handlers::suppliers::create_supplier),
        )
        .with_permission(perm::SUPPLIERS_CREATE);

    let suppliers_update = Router::new()
        .route(
            "/suppliers/:id",
            axum::routing::put(handlers::suppliers::update_supplier),
        )
        .with_permission(perm::SUPPLIERS_UPDATE);

    let suppliers_delete = Router::new()
        .route(
            "/suppliers/:id",
            axum::routing::delete(handlers::suppliers::delete_supplier),
        )
        .with_permission(perm::SUPPLIERS_DELETE);

    // Categories routes with permission gating
    let categories_read = Router::new()
        .route("/categories", get(handlers::categories::list_categories))
        .route("/categories/:id", get(handlers::categories::get_category))
        .with_permission(perm::CATEGORIES_READ);

    let categories_create = Router::new()
        .route(
            "/categories",
            axum::routing::post(handlers::categories::create_category),
        )
        .with_permission(perm::CATEGORIES_CREATE);

    let categories_update = Router::new()
        .route(
            "/categories/:id",
            axum::routing::put(handlers::categories::update_category),
        )
        .with_permission(perm::CATEGORIES_UPDATE);

    let categories_delete = Router::new()
        .route(
            "/categories/:id",
            axum::routing::delete(handlers::categories::delete_category),
        )
        .with_permission(perm::CATEGORIES_DELETE);

    // Products routes with permission gating
    let products_read = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route("/products/:id", get(handlers::products::get_product))
        .with_permission(perm::PRODUCTS_READ);

    let products_create = Router::new()
        .route(
            "/products",
            axum::routing::post(handlers::products::create_product),
        )
        .with_permission(perm::PRODUCTS_CREATE);

    let products_update = Router::new()
        .route(
            "/products/:id",
            axum::routing::put(handlers::products::update_product),
        )
        .with_permission(perm::PRODUCTS_UPDATE);

    let products_delete = Router::new()
        .route(
            "/products/:id",
            axum::routing::delete(handlers::products::delete_product),
        )
        .with_permission(perm::PRODUCTS_DELETE);

    // Orders routes with permission gating
    let orders_read = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .with_permission(perm::ORDERS_READ);

    let orders_create = Router::new()
        .route(
            "/orders",
            axum::routing::post(handlers::orders::create_order),
        )
        .with_permission(perm::ORDERS_CREATE);

    let orders_update = Router::new()
        .route(
            "/orders/:id",
            axum::routing::put(handlers::orders::update_order),
        )
        .with_permission(perm::ORDERS_UPDATE);

    let orders_cancel = Router::new()
        .route(
            "/orders/:id/cancel",
            axum::routing::post(handlers::orders::cancel_order),
        )
        .with_permission(perm::ORDERS_CANCEL);

    let orders_delete = Router::new()
        .route(
            "/orders/:id",
            axum::routing::delete(handlers::orders::delete_order),
        )
        .with_permission(perm::ORDERS_DELETE);

    // Manual inventory routes: the audit trail is append-only, so there is
    // no update or delete surface.
    let inventory_read = Router::new()
        .route(
            "/manual-inventory",
            get(handlers::manual_inventory::list_adjustments),
        )
        .route(
            "/manual-inventory/:id",
            get(handlers::manual_inventory::get_adjustment),
        )
        .with_permission(perm::INVENTORY_READ);

    let inventory_adjust = Router::new()
        .route(
            "/manual-inventory",
            axum::routing::post(handlers::manual_inventory::create_adjustment),
        )
        .with_permission(perm::INVENTORY_ADJUST);

    // Users routes (admin-gated via users:* permissions)
    let users_read = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/:id", get(handlers::users::get_user))
        .with_permission(perm::USERS_READ);

    let users_create = Router::new()
        .route("/users", axum::routing::post(handlers::users::create_user))
        .with_permission(perm::USERS_CREATE);

    let users_update = Router::new()
        .route(
            "/users/:id",
            axum::routing::put(handlers::users::update_user),
        )
        .with_permission(perm::USERS_UPDATE);

    let users_delete = Router::new()
        .route(
            "/users/:id",
            axum::routing::delete(handlers::users::delete_user),
        )
        .with_permission(perm::USERS_DELETE);

    // Reports routes
    let reports = Router::new()
        .route(
            "/reports/inventory",
            get(handlers::reports::inventory_report),
        )
        .route(
            "/reports/movements",
            get(handlers::reports::movements_report),
        )
        .route("/reports/sales", get(handlers::reports::sales_report))
        .with_permission(perm::REPORTS_READ);

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Clients API (auth + permissions)
        .merge(clients_read)
        .merge(clients_create)
        .merge(clients_update)
        .merge(clients_delete)
        // Suppliers API (auth + permissions)
        .merge(suppliers_read)
        .merge(suppliers_create)
        .merge(suppliers_update)
        .merge(suppliers_delete)
        // Categories API (auth + permissions)
        .merge(categories_read)
        .merge(categories_create)
        .merge(categories_update)
        .merge(categories_delete)
        // Products API (auth + permissions)
        .merge(products_read)
        .merge(products_create)
        .merge(products_update)
        .merge(products_delete)
        // Orders API (auth + permissions)
        .merge(orders_read)
        .merge(orders_create)
        .merge(orders_update)
        .merge(orders_cancel)
        .merge(orders_delete)
        // Manual inventory API (auth + permissions)
        .merge(inventory_read)
        .merge(inventory_adjust)
        // Users API (auth + permissions)
        .merge(users_read)
        .merge(users_create)
        .merge(users_update)
        .merge(users_delete)
        // Reports API (auth + permissions)
        .merge(reports)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "inventpro-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    services::products::{CreateProductInput, ProductFilter, UpdateProductInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub sku: String,

    pub price: Decimal,

    /// Initial stock; later changes go through manual inventory adjustments
    #[serde(default)]
    pub stock: i32,

    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub search: Option<String>,
    /// Include inactive products when true
    #[serde(default)]
    pub include_inactive: bool,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .create_product(CreateProductInput {
            name: payload.name,
            description: payload.description,
            sku: payload.sku,
            price: payload.price,
            stock: payload.stock,
            category_id: payload.category_id,
            supplier_id: payload.supplier_id,
        })
        .await
        .map_err(map_service_error)?;

    info!("Product created: {}", product.id);
    Ok(created_response(product))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(&product_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Product with ID {} not found", product_id)))?;

    Ok(success_response(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .update_product(
            product_id,
            UpdateProductInput {
                name: payload.name,
                description: payload.description,
                sku: payload.sku,
                price: payload.price,
                category_id: payload.category_id,
                supplier_id: payload.supplier_id,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

/// Deactivate a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .products
        .delete_product(product_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List products with pagination and filters
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };

    let (products, total) = state
        .services
        .products
        .list_products(
            ProductFilter {
                category_id: query.category_id,
                supplier_id: query.supplier_id,
                active_only: !query.include_inactive,
                search: query.search,
            },
            pagination.per_page,
            pagination.offset(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        products,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

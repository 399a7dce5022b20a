use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    entities::{manual_inventory::AdjustmentType, order::OrderStatus},
    errors::ErrorResponse,
    handlers,
    services::reports::{InventoryReport, LowStockProduct, SalesReport},
};

/// OpenAPI document for the REST surface. Served at `/swagger-ui` with the
/// raw document at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "InventPro API",
        description = "Inventory and order management backend",
        license(name = "MIT")
    ),
    components(schemas(
        ErrorResponse,
        AdjustmentType,
        OrderStatus,
        handlers::clients::CreateClientRequest,
        handlers::clients::UpdateClientRequest,
        handlers::suppliers::CreateSupplierRequest,
        handlers::suppliers::UpdateSupplierRequest,
        handlers::categories::CreateCategoryRequest,
        handlers::categories::UpdateCategoryRequest,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::orders::CreateOrderRequest,
        handlers::orders::OrderItemRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::users::CreateUserRequest,
        handlers::users::UpdateUserRequest,
        handlers::manual_inventory::CreateAdjustmentRequest,
        InventoryReport,
        LowStockProduct,
        SalesReport,
    )),
    tags(
        (name = "clients", description = "Client management"),
        (name = "suppliers", description = "Supplier management"),
        (name = "categories", description = "Category management"),
        (name = "products", description = "Product catalog"),
        (name = "orders", description = "Order management"),
        (name = "users", description = "User administration"),
        (name = "manual-inventory", description = "Manual stock adjustments"),
        (name = "reports", description = "Read-only reports"),
    )
)]
pub struct ApiDoc;

/// Swagger UI router, mounted by `main`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

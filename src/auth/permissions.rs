/*!
 * # Permissions Module
 *
 * Permission strings are `resource:action` pairs. Role tables in `rbac`
 * grant either explicit pairs or a `resource:*` wildcard.
 */

/// Permission actions
pub struct Actions;

impl Actions {
    pub const READ: &'static str = "read";
    pub const CREATE: &'static str = "create";
    pub const UPDATE: &'static str = "update";
    pub const DELETE: &'static str = "delete";
    pub const ALL: &'static str = "*";
}

/// Resource types
pub struct Resources;

impl Resources {
    pub const CLIENTS: &'static str = "clients";
    pub const SUPPLIERS: &'static str = "suppliers";
    pub const CATEGORIES: &'static str = "categories";
    pub const PRODUCTS: &'static str = "products";
    pub const ORDERS: &'static str = "orders";
    pub const INVENTORY: &'static str = "inventory";
    pub const USERS: &'static str = "users";
    pub const REPORTS: &'static str = "reports";
    pub const ADMIN: &'static str = "admin";
}

/// Common permission string constants for compile-time safety
pub mod consts {
    // Clients
    pub const CLIENTS_READ: &str = "clients:read";
    pub const CLIENTS_CREATE: &str = "clients:create";
    pub const CLIENTS_UPDATE: &str = "clients:update";
    pub const CLIENTS_DELETE: &str = "clients:delete";

    // Suppliers
    pub const SUPPLIERS_READ: &str = "suppliers:read";
    pub const SUPPLIERS_CREATE: &str = "suppliers:create";
    pub const SUPPLIERS_UPDATE: &str = "suppliers:update";
    pub const SUPPLIERS_DELETE: &str = "suppliers:delete";

    // Categories
    pub const CATEGORIES_READ: &str = "categories:read";
    pub const CATEGORIES_CREATE: &str = "categories:create";
    pub const CATEGORIES_UPDATE: &str = "categories:update";
    pub const CATEGORIES_DELETE: &str = "categories:delete";

    // Products
    pub const PRODUCTS_READ: &str = "products:read";
    pub const PRODUCTS_CREATE: &str = "products:create";
    pub const PRODUCTS_UPDATE: &str = "products:update";
    pub const PRODUCTS_DELETE: &str = "products:delete";

    // Orders
    pub const ORDERS_READ: &str = "orders:read";
    pub const ORDERS_CREATE: &str = "orders:create";
    pub const ORDERS_UPDATE: &str = "orders:update";
    pub const ORDERS_DELETE: &str = "orders:delete";
    pub const ORDERS_CANCEL: &str = "orders:cancel";

    // Manual inventory
    pub const INVENTORY_READ: &str = "inventory:read";
    pub const INVENTORY_ADJUST: &str = "inventory:adjust";

    // Users (admin only)
    pub const USERS_READ: &str = "users:read";
    pub const USERS_CREATE: &str = "users:create";
    pub const USERS_UPDATE: &str = "users:update";
    pub const USERS_DELETE: &str = "users:delete";

    // Reports
    pub const REPORTS_READ: &str = "reports:read";
}

/// Format a permission string
pub fn format_permission(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

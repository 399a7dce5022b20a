/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * Roles are fixed at compile time and map onto permission sets. A user
 * carries exactly one role; the role's permissions are embedded in the JWT
 * at login so the middleware never re-queries them.
 */

use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::warn;

/// Role definition with associated permissions
#[derive(Debug, Clone)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
pub const ROLE_VENDEDOR: &str = "vendedor";
pub const ROLE_BODEGUERO: &str = "bodeguero";

// Define standard roles and their permissions
lazy_static! {
    pub static ref ROLES: HashMap<String, Role> = {
        let mut roles = HashMap::new();

        // Admin role - has all permissions
        roles.insert(
            ROLE_ADMIN.to_string(),
            Role {
                name: ROLE_ADMIN.to_string(),
                description: "Administrator with full access".to_string(),
                permissions: vec![
                    "admin:*".to_string(),
                    "users:*".to_string(),
                    "clients:*".to_string(),
                    "suppliers:*".to_string(),
                    "categories:*".to_string(),
                    "products:*".to_string(),
                    "orders:*".to_string(),
                    "inventory:*".to_string(),
                    "reports:*".to_string(),
                ],
            },
        );

        // Salesperson role
        roles.insert(
            ROLE_VENDEDOR.to_string(),
            Role {
                name: ROLE_VENDEDOR.to_string(),
                description: "Salesperson managing clients and orders".to_string(),
                permissions: vec![
                    "clients:read".to_string(),
                    "clients:create".to_string(),
                    "clients:update".to_string(),
                    "categories:read".to_string(),
                    "products:read".to_string(),
                    "orders:read".to_string(),
                    "orders:create".to_string(),
                    "orders:update".to_string(),
                    "orders:cancel".to_string(),
                    "reports:read".to_string(),
                ],
            },
        );

        // Warehouse keeper role
        roles.insert(
            ROLE_BODEGUERO.to_string(),
            Role {
                name: ROLE_BODEGUERO.to_string(),
                description: "Warehouse keeper managing stock".to_string(),
                permissions: vec![
                    "suppliers:read".to_string(),
                    "categories:read".to_string(),
                    "products:read".to_string(),
                    "products:update".to_string(),
                    "orders:read".to_string(),
                    "inventory:read".to_string(),
                    "inventory:adjust".to_string(),
                    "reports:read".to_string(),
                ],
            },
        );

        // Standard user role (read-only basics)
        roles.insert(
            ROLE_USER.to_string(),
            Role {
                name: ROLE_USER.to_string(),
                description: "Standard user with basic read access".to_string(),
                permissions: vec![
                    "clients:read".to_string(),
                    "categories:read".to_string(),
                    "products:read".to_string(),
                    "orders:read".to_string(),
                ],
            },
        );

        roles
    };
}

/// Get all permissions for a role
pub fn role_permissions(role_name: &str) -> Vec<String> {
    match ROLES.get(role_name) {
        Some(role) => role.permissions.clone(),
        None => {
            warn!("Role not found: {}", role_name);
            vec![]
        }
    }
}

/// Whether a role name is one of the known roles
pub fn is_known_role(role_name: &str) -> bool {
    ROLES.contains_key(role_name)
}

/// Check if a granted permission satisfies a required permission.
/// Supports `resource:*` and the global `*` wildcard.
pub fn permission_matches(granted: &str, required: &str) -> bool {
    if granted == required || granted == "*" {
        return true;
    }

    if let Some(prefix) = granted.strip_suffix(":*") {
        if let Some((resource, _)) = required.split_once(':') {
            return resource == prefix;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::consts as perm;

    fn role_allows(role: &str, required: &str) -> bool {
        role_permissions(role)
            .iter()
            .any(|granted| permission_matches(granted, required))
    }

    #[test]
    fn admin_has_everything() {
        for required in [
            perm::USERS_DELETE,
            perm::INVENTORY_ADJUST,
            perm::ORDERS_CANCEL,
            perm::REPORTS_READ,
        ] {
            assert!(role_allows(ROLE_ADMIN, required), "admin lacks {required}");
        }
    }

    #[test]
    fn vendedor_sells_but_does_not_touch_stock() {
        assert!(role_allows(ROLE_VENDEDOR, perm::ORDERS_CREATE));
        assert!(role_allows(ROLE_VENDEDOR, perm::CLIENTS_UPDATE));
        assert!(!role_allows(ROLE_VENDEDOR, perm::INVENTORY_ADJUST));
        assert!(!role_allows(ROLE_VENDEDOR, perm::USERS_CREATE));
    }

    #[test]
    fn bodeguero_adjusts_stock_but_does_not_sell() {
        assert!(role_allows(ROLE_BODEGUERO, perm::INVENTORY_ADJUST));
        assert!(role_allows(ROLE_BODEGUERO, perm::PRODUCTS_UPDATE));
        assert!(!role_allows(ROLE_BODEGUERO, perm::ORDERS_CREATE));
        assert!(!role_allows(ROLE_BODEGUERO, perm::CLIENTS_CREATE));
    }

    #[test]
    fn plain_user_is_read_only() {
        assert!(role_allows(ROLE_USER, perm::PRODUCTS_READ));
        assert!(!role_allows(ROLE_USER, perm::PRODUCTS_CREATE));
        assert!(!role_allows(ROLE_USER, perm::INVENTORY_ADJUST));
    }

    #[test]
    fn wildcard_matching() {
        assert!(permission_matches("clients:*", "clients:delete"));
        assert!(!permission_matches("clients:*", "orders:read"));
        assert!(permission_matches("*", "anything:at-all"));
        assert!(!permission_matches("clients:read", "clients:update"));
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        assert!(role_permissions("ghost").is_empty());
        assert!(!is_known_role("ghost"));
        assert!(is_known_role(ROLE_VENDEDOR));
    }
}

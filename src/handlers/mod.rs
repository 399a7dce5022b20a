pub mod categories;
pub mod clients;
pub mod common;
pub mod manual_inventory;
pub mod orders;
pub mod products;
pub mod reports;
pub mod suppliers;
pub mod users;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
/// Constructed once at startup and shared via [`AppState`].
#[derive(Clone)]
pub struct AppServices {
    pub clients: Arc<crate::services::clients::ClientService>,
    pub suppliers: Arc<crate::services::suppliers::SupplierService>,
    pub categories: Arc<crate::services::categories::CategoryService>,
    pub products: Arc<crate::services::products::ProductService>,
    pub orders: Arc<crate::services::orders::OrderService>,
    pub users: Arc<crate::services::users::UserService>,
    pub manual_inventory: Arc<crate::services::manual_inventory::ManualInventoryService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    /// Build the services container over a shared pool and event channel.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let clients = Arc::new(crate::services::clients::ClientService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let suppliers = Arc::new(crate::services::suppliers::SupplierService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let categories = Arc::new(crate::services::categories::CategoryService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let products = Arc::new(crate::services::products::ProductService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let users = Arc::new(crate::services::users::UserService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let manual_inventory = Arc::new(
            crate::services::manual_inventory::ManualInventoryService::new(
                db_pool.clone(),
                event_sender,
            ),
        );
        let reports = Arc::new(crate::services::reports::ReportService::new(db_pool));

        Self {
            clients,
            suppliers,
            categories,
            products,
            orders,
            users,
            manual_inventory,
            reports,
        }
    }
}

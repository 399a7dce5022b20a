pub mod categories;
pub mod clients;
pub mod manual_inventory;
pub mod orders;
pub mod products;
pub mod reports;
pub mod suppliers;
pub mod users;

use crate::entities::product;
use crate::errors::ServiceError;
use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, QuerySelect};
use uuid::Uuid;

/// Load a product inside a transaction, holding a row-level write lock so
/// concurrent stock mutations cannot interleave. SQLite has no `FOR UPDATE`;
/// its single-writer lock already serializes the transaction, so the lock
/// clause is applied only on PostgreSQL.
pub(crate) async fn load_product_for_update<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> Result<product::Model, ServiceError> {
    let mut query = product::Entity::find_by_id(product_id);
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }

    query
        .one(conn)
        .await
        .map_err(ServiceError::from_db)?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
}

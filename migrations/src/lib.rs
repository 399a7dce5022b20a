pub use sea_orm_migration::prelude::*;

mod m20240102_000001_create_users_table;
mod m20240102_000002_create_categories_table;
mod m20240102_000003_create_suppliers_table;
mod m20240102_000004_create_clients_table;
mod m20240102_000005_create_products_table;
mod m20240102_000006_create_orders_tables;
mod m20240102_000007_create_manual_inventory_table;
mod m20240215_000008_add_partial_unique_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240102_000001_create_users_table::Migration),
            Box::new(m20240102_000002_create_categories_table::Migration),
            Box::new(m20240102_000003_create_suppliers_table::Migration),
            Box::new(m20240102_000004_create_clients_table::Migration),
            Box::new(m20240102_000005_create_products_table::Migration),
            Box::new(m20240102_000006_create_orders_tables::Migration),
            Box::new(m20240102_000007_create_manual_inventory_table::Migration),
            Box::new(m20240215_000008_add_partial_unique_indexes::Migration),
        ]
    }
}

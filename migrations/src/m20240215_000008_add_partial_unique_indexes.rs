use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240215_000008_add_partial_unique_indexes"
    }
}

// Uniqueness of rut/email is scoped to rows that are not soft-deleted, so a
// deleted client's identifiers can be reused by a new record. The index
// builder has no WHERE clause support, hence raw SQL; the statements are
// valid on both PostgreSQL and SQLite.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX uq_clients_rut_active ON clients (rut) WHERE deleted_at IS NULL",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX uq_clients_email_active ON clients (lower(email)) WHERE deleted_at IS NULL",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX uq_suppliers_rut_active ON suppliers (rut) WHERE deleted_at IS NULL",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX uq_suppliers_email_active ON suppliers (lower(email)) WHERE deleted_at IS NULL",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX uq_categories_name_active ON categories (name) WHERE deleted_at IS NULL",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for stmt in [
            "DROP INDEX IF EXISTS uq_clients_rut_active",
            "DROP INDEX IF EXISTS uq_clients_email_active",
            "DROP INDEX IF EXISTS uq_suppliers_rut_active",
            "DROP INDEX IF EXISTS uq_suppliers_email_active",
            "DROP INDEX IF EXISTS uq_categories_name_active",
        ] {
            conn.execute_unprepared(stmt).await?;
        }
        Ok(())
    }
}

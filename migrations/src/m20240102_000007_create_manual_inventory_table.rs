use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240102_000007_create_manual_inventory_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ManualInventory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ManualInventory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ManualInventory::ProductId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ManualInventory::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ManualInventory::AdjustmentType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManualInventory::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(ManualInventory::Quantity).gt(0)),
                    )
                    .col(ColumnDef::new(ManualInventory::Reason).text().null())
                    .col(
                        ColumnDef::new(ManualInventory::PreviousStock)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManualInventory::NewStock)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManualInventory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_manual_inventory_product")
                            .from(ManualInventory::Table, ManualInventory::ProductId)
                            .to(
                                super::m20240102_000005_create_products_table::Products::Table,
                                super::m20240102_000005_create_products_table::Products::Id,
                            ),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_manual_inventory_user")
                            .from(ManualInventory::Table, ManualInventory::UserId)
                            .to(
                                super::m20240102_000001_create_users_table::Users::Table,
                                super::m20240102_000001_create_users_table::Users::Id,
                            ),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_manual_inventory_product_id")
                    .table(ManualInventory::Table)
                    .col(ManualInventory::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_manual_inventory_created_at")
                    .table(ManualInventory::Table)
                    .col(ManualInventory::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ManualInventory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ManualInventory {
    Table,
    Id,
    ProductId,
    UserId,
    AdjustmentType,
    Quantity,
    Reason,
    PreviousStock,
    NewStock,
    CreatedAt,
}

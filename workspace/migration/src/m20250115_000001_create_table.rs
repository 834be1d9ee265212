use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(boolean(Users::IsStaff).default(false))
                    .to_owned(),
            )
            .await?;

        // Create purchase_orders table
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(pk_auto(PurchaseOrders::Id))
                    .col(string_null(PurchaseOrders::PoReference))
                    .col(string(PurchaseOrders::OrderType))
                    .col(date_null(PurchaseOrders::PoDate))
                    .col(string_null(PurchaseOrders::ClientName))
                    .to_owned(),
            )
            .await?;

        // The dashboard aggregates by date and by type, so both get an index
        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_po_date")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::PoDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_order_type")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::OrderType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    IsStaff,
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    Table,
    Id,
    PoReference,
    OrderType,
    PoDate,
    ClientName,
}

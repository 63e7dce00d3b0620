//! Create `waste_pickups` table.
//! One row per collection request; `preferred_date` is free-form text and nullable.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WastePickups::Table)
                    .if_not_exists()
                    .col(uuid(WastePickups::Id).primary_key())
                    .col(text(WastePickups::FullName).not_null())
                    .col(text(WastePickups::Location).not_null())
                    .col(text(WastePickups::WasteType).not_null())
                    .col(ColumnDef::new(WastePickups::PreferredDate).text().null())
                    .col(
                        timestamp_with_time_zone(WastePickups::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WastePickups::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WastePickups {
    Table,
    Id,
    FullName,
    Location,
    WasteType,
    PreferredDate,
    CreatedAt,
}

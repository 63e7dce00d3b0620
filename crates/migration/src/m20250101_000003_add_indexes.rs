//! Index supporting the newest-first listing of waste pickups.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_waste_pickups_created_at")
                    .table(WastePickups::Table)
                    .col((WastePickups::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_waste_pickups_created_at")
                    .table(WastePickups::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum WastePickups { Table, CreatedAt }

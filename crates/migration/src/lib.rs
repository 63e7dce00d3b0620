//! Migrator registering the relational schema for users and waste pickups.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_waste_pickups;
mod m20250101_000003_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_waste_pickups::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000003_add_indexes::Migration),
        ]
    }
}

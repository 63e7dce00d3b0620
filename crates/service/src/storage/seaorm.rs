use async_trait::async_trait;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tracing::{error, info};
use uuid::Uuid;

use models::errors::ModelError;
use models::{user, waste_pickup};
use models::{InsertUser, InsertWastePickup, UpdateWastePickup, User, WastePickup};

use super::Storage;
use crate::errors::StorageError;

/// PostgreSQL backend over SeaORM. Ids are v4 UUIDs in hyphenated form.
pub struct SeaOrmStorage {
    pub db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// Connect and bring the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let db = models::db::connect(url, max_connections)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StorageError::Backend(format!("migration failed: {e}")))?;
        info!("relational schema migrated");
        Ok(Self { db })
    }
}

/// Non-UUID ids can never match a row.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

#[async_trait]
impl Storage for SeaOrmStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let Some(id) = parse_id(id) else { return Ok(None) };
        Ok(user::find(&self.db, id).await?.map(Into::into))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(user::find_by_username(&self.db, username).await?.map(Into::into))
    }

    async fn create_user(&self, input: InsertUser) -> Result<User, StorageError> {
        match user::create(&self.db, &input).await {
            Ok(created) => Ok(created.into()),
            Err(ModelError::Conflict(_)) => Err(StorageError::DuplicateUsername(input.username)),
            Err(e) => {
                error!(error = %e, "insert user failed");
                Err(e.into())
            }
        }
    }

    async fn create_waste_pickup(&self, pickup: InsertWastePickup) -> Result<WastePickup, StorageError> {
        let created = waste_pickup::create(&self.db, &pickup).await.map_err(|e| {
            error!(error = %e, "insert waste pickup failed");
            StorageError::from(e)
        })?;
        Ok(created.into())
    }

    async fn get_waste_pickup(&self, id: &str) -> Result<Option<WastePickup>, StorageError> {
        let Some(id) = parse_id(id) else { return Ok(None) };
        Ok(waste_pickup::find(&self.db, id).await?.map(Into::into))
    }

    async fn get_all_waste_pickups(&self) -> Result<Vec<WastePickup>, StorageError> {
        let rows = waste_pickup::list_newest_first(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_waste_pickups(&self) -> Result<usize, StorageError> {
        Ok(waste_pickup::count(&self.db).await? as usize)
    }

    async fn update_waste_pickup(&self, id: &str, update: UpdateWastePickup) -> Result<Option<WastePickup>, StorageError> {
        let Some(id) = parse_id(id) else { return Ok(None) };
        let updated = waste_pickup::update(&self.db, id, update).await.map_err(|e| {
            error!(error = %e, pickup_id = %id, "update waste pickup failed");
            StorageError::from(e)
        })?;
        Ok(updated.map(Into::into))
    }

    async fn delete_waste_pickup(&self, id: &str) -> Result<bool, StorageError> {
        let Some(id) = parse_id(id) else { return Ok(false) };
        waste_pickup::hard_delete(&self.db, id).await.map_err(|e| {
            error!(error = %e, pickup_id = %id, "delete waste pickup failed");
            StorageError::from(e)
        })
    }
}

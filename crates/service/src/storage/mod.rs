//! Storage abstraction for the service layer
//!
//! [`Storage`] is the single seam every persistence backend implements. The
//! contract is backend-independent:
//! - lookups return `Ok(None)` for absent records, including ids that are not
//!   syntactically valid for the backend; `Err` always means the store failed
//! - listing is newest first by `created_at`
//! - usernames are unique on every backend
//! - updates never insert

use async_trait::async_trait;
use models::{InsertUser, InsertWastePickup, UpdateWastePickup, User, WastePickup};

use crate::errors::StorageError;

pub mod memory;
pub mod mongo;
pub mod seaorm;
#[cfg(test)]
pub(crate) mod conformance;

pub use memory::MemStorage;
pub use mongo::MongoStorage;
pub use seaorm::SeaOrmStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Short backend name used in logs and the health response.
    fn backend_name(&self) -> &'static str;

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    /// Assign a fresh id. Fails with [`StorageError::DuplicateUsername`] when taken.
    async fn create_user(&self, user: InsertUser) -> Result<User, StorageError>;

    /// Assign a fresh id and `created_at`; a missing preferred date is stored as null.
    async fn create_waste_pickup(&self, pickup: InsertWastePickup) -> Result<WastePickup, StorageError>;
    async fn get_waste_pickup(&self, id: &str) -> Result<Option<WastePickup>, StorageError>;
    /// Every record exactly once, newest first.
    async fn get_all_waste_pickups(&self) -> Result<Vec<WastePickup>, StorageError>;
    async fn count_waste_pickups(&self) -> Result<usize, StorageError>;
    /// Merge provided fields; `Ok(None)` when no record has this id.
    async fn update_waste_pickup(&self, id: &str, update: UpdateWastePickup) -> Result<Option<WastePickup>, StorageError>;
    /// `Ok(true)` only when a record was removed.
    async fn delete_waste_pickup(&self, id: &str) -> Result<bool, StorageError>;
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use models::{InsertUser, InsertWastePickup, UpdateWastePickup, User, WastePickup};

use super::Storage;
use crate::errors::StorageError;

/// Process-local backend for development and tests.
///
/// Data lives only as long as the value does; a restart starts empty.
/// Ids are random v4 UUIDs.
#[derive(Default)]
pub struct MemStorage {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    pickups: HashMap<String, Entry>,
    users: HashMap<String, User>,
    user_ids_by_name: HashMap<String, String>,
    next_seq: u64,
}

/// Insertion sequence breaks ties between equal timestamps.
struct Entry {
    seq: u64,
    record: WastePickup,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .user_ids_by_name
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, StorageError> {
        let mut inner = self.inner.write().await;
        if inner.user_ids_by_name.contains_key(&user.username) {
            return Err(StorageError::DuplicateUsername(user.username));
        }
        let created = User { id: Uuid::new_v4().to_string(), username: user.username, password: user.password };
        inner.user_ids_by_name.insert(created.username.clone(), created.id.clone());
        inner.users.insert(created.id.clone(), created.clone());
        debug!(user_id = %created.id, "user stored in memory");
        Ok(created)
    }

    async fn create_waste_pickup(&self, pickup: InsertWastePickup) -> Result<WastePickup, StorageError> {
        let mut inner = self.inner.write().await;
        // stamped under the lock so time order and seq order agree
        let record = WastePickup::new(Uuid::new_v4().to_string(), pickup, Utc::now());
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.pickups.insert(record.id.clone(), Entry { seq, record: record.clone() });
        debug!(pickup_id = %record.id, seq, "waste pickup stored in memory");
        Ok(record)
    }

    async fn get_waste_pickup(&self, id: &str) -> Result<Option<WastePickup>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.pickups.get(id).map(|e| e.record.clone()))
    }

    async fn get_all_waste_pickups(&self) -> Result<Vec<WastePickup>, StorageError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry> = inner.pickups.values().collect();
        entries.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|e| e.record.clone()).collect())
    }

    async fn count_waste_pickups(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().await.pickups.len())
    }

    async fn update_waste_pickup(&self, id: &str, update: UpdateWastePickup) -> Result<Option<WastePickup>, StorageError> {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.pickups.get_mut(id) else {
            return Ok(None);
        };
        entry.record.apply(update);
        Ok(Some(entry.record.clone()))
    }

    async fn delete_waste_pickup(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.pickups.remove(id).is_some())
    }
}

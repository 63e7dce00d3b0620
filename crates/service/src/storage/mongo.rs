//! MongoDB document-store backend.
//!
//! Two collections, `users` and `waste_pickups`, keyed by native ObjectIds and
//! exposed as their 24-character hex form. Field names are camelCase so the
//! documents match the JSON the API serves.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use models::schema::normalize_preferred_date;
use models::{InsertUser, InsertWastePickup, UpdateWastePickup, User, WastePickup};

use super::Storage;
use crate::errors::StorageError;

pub const USERS_COLLECTION: &str = "users";
pub const WASTE_PICKUPS_COLLECTION: &str = "waste_pickups";

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    username: String,
    password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WastePickupDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    full_name: String,
    location: String,
    waste_type: String,
    #[serde(default)]
    preferred_date: Option<String>,
    created_at: bson::DateTime,
}

impl From<UserDocument> for User {
    fn from(d: UserDocument) -> Self {
        Self { id: d.id.to_hex(), username: d.username, password: d.password }
    }
}

impl From<WastePickupDocument> for WastePickup {
    fn from(d: WastePickupDocument) -> Self {
        Self {
            id: d.id.to_hex(),
            full_name: d.full_name,
            location: d.location,
            waste_type: d.waste_type,
            preferred_date: normalize_preferred_date(d.preferred_date),
            created_at: d.created_at.to_chrono(),
        }
    }
}

/// A malformed id can never name a document, so it is reported as absent.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

pub struct MongoStorage {
    database: Database,
    users: Collection<UserDocument>,
    pickups: Collection<WastePickupDocument>,
}

impl MongoStorage {
    /// Connect once, verify the server answers, and ensure indexes.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database, "MongoDB connected");
        Self::with_database(db).await
    }

    /// Wrap an already connected database handle.
    pub async fn with_database(database: Database) -> Result<Self, StorageError> {
        let storage = Self {
            users: database.collection(USERS_COLLECTION),
            pickups: database.collection(WASTE_PICKUPS_COLLECTION),
            database,
        };
        storage.ensure_indexes().await?;
        Ok(storage)
    }

    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        let unique_username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(unique_username).await?;

        let newest_first = IndexModel::builder()
            .keys(doc! { "createdAt": -1, "_id": -1 })
            .build();
        self.pickups.create_index(newest_first).await?;
        debug!("MongoDB indexes ensured");
        Ok(())
    }

    /// Drop the whole database. Used to clean up throwaway test databases.
    pub async fn drop_database(self) -> Result<(), StorageError> {
        self.database.drop().await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for MongoStorage {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        Ok(self.users.find_one(doc! { "_id": oid }).await?.map(Into::into))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self.users.find_one(doc! { "username": username }).await?.map(Into::into))
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, StorageError> {
        let document = UserDocument { id: ObjectId::new(), username: user.username, password: user.password };
        match self.users.insert_one(&document).await {
            Ok(_) => Ok(document.into()),
            Err(e) if is_duplicate_key(&e) => Err(StorageError::DuplicateUsername(document.username)),
            Err(e) => {
                error!(error = %e, "insert user failed");
                Err(e.into())
            }
        }
    }

    async fn create_waste_pickup(&self, pickup: InsertWastePickup) -> Result<WastePickup, StorageError> {
        let document = WastePickupDocument {
            id: ObjectId::new(),
            full_name: pickup.full_name,
            location: pickup.location,
            waste_type: pickup.waste_type,
            preferred_date: normalize_preferred_date(pickup.preferred_date),
            created_at: bson::DateTime::now(),
        };
        if let Err(e) = self.pickups.insert_one(&document).await {
            error!(error = %e, "insert waste pickup failed");
            return Err(e.into());
        }
        debug!(pickup_id = %document.id, "waste pickup inserted");
        Ok(document.into())
    }

    async fn get_waste_pickup(&self, id: &str) -> Result<Option<WastePickup>, StorageError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        Ok(self.pickups.find_one(doc! { "_id": oid }).await?.map(Into::into))
    }

    async fn get_all_waste_pickups(&self) -> Result<Vec<WastePickup>, StorageError> {
        let cursor = self
            .pickups
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        let documents: Vec<WastePickupDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn count_waste_pickups(&self) -> Result<usize, StorageError> {
        let n = self.pickups.count_documents(doc! {}).await?;
        Ok(n as usize)
    }

    async fn update_waste_pickup(&self, id: &str, update: UpdateWastePickup) -> Result<Option<WastePickup>, StorageError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };

        let mut set = Document::new();
        if let Some(name) = update.full_name {
            set.insert("fullName", name);
        }
        if let Some(location) = update.location {
            set.insert("location", location);
        }
        if let Some(kind) = update.waste_type {
            set.insert("wasteType", kind);
        }
        if let Some(date) = update.preferred_date {
            set.insert("preferredDate", normalize_preferred_date(date));
        }
        if set.is_empty() {
            return self.get_waste_pickup(id).await;
        }

        let updated = self
            .pickups
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                error!(error = %e, pickup_id = %oid, "update waste pickup failed");
                StorageError::from(e)
            })?;
        Ok(updated.map(Into::into))
    }

    async fn delete_waste_pickup(&self, id: &str) -> Result<bool, StorageError> {
        let Some(oid) = parse_id(id) else { return Ok(false) };
        let res = self.pickups.delete_one(doc! { "_id": oid }).await.map_err(|e| {
            error!(error = %e, pickup_id = %oid, "delete waste pickup failed");
            StorageError::from(e)
        })?;
        Ok(res.deleted_count > 0)
    }
}

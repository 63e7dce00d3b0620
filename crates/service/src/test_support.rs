//! Backends for database-backed tests. Each helper returns `Ok(None)` when its
//! connection string is missing or `SKIP_DB_TESTS` is set, so the suite stays
//! green on machines without MongoDB or PostgreSQL.

use common::env::{optional_var, skip_db_tests};
use uuid::Uuid;

use crate::storage::{MongoStorage, SeaOrmStorage};

/// A MongoDB backend on a throwaway database; callers drop it when done.
pub async fn mongo_storage() -> Result<Option<MongoStorage>, anyhow::Error> {
    if skip_db_tests() {
        return Ok(None);
    }
    let Some(uri) = optional_var("MONGODB_URI") else {
        eprintln!("skip: MONGODB_URI not set");
        return Ok(None);
    };
    let database = format!("waste_pickup_test_{}", Uuid::new_v4().simple());
    Ok(Some(MongoStorage::connect(&uri, &database).await?))
}

/// A PostgreSQL backend with migrations applied.
pub async fn postgres_storage() -> Result<Option<SeaOrmStorage>, anyhow::Error> {
    if skip_db_tests() {
        return Ok(None);
    }
    let Some(url) = optional_var("DATABASE_URL") else {
        eprintln!("skip: DATABASE_URL not set");
        return Ok(None);
    };
    Ok(Some(SeaOrmStorage::connect(&url, 5).await?))
}

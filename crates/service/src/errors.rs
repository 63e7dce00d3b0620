use thiserror::Error;

use models::errors::ModelError;

/// Failures a storage backend may report. "Not found" is never an error here;
/// lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("username `{0}` is already taken")]
    DuplicateUsername(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StorageError {
    fn from(e: mongodb::error::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

impl From<ModelError> for StorageError {
    fn from(e: ModelError) -> Self {
        StorageError::Backend(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Storage(StorageError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Storage(_) => 1200,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DuplicateUsername(_) => ServiceError::Conflict(e.to_string()),
            other => ServiceError::Storage(other),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Conflict(msg) => ServiceError::Conflict(msg),
            ModelError::Db(msg) => ServiceError::Storage(StorageError::Backend(msg)),
        }
    }
}

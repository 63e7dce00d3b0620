use std::sync::Arc;

use tracing::{debug, info, instrument};

use models::{InsertUser, User};

use crate::errors::ServiceError;
use crate::storage::Storage;

/// Account workflows over the storage seam.
///
/// Passwords are persisted exactly as submitted. Hashing belongs in front of
/// this service once a credential scheme is chosen.
#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>) -> Self { Self { storage } }

    /// Create an account with a unique username.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{storage::MemStorage, UserService};
    /// use models::InsertUser;
    /// let svc = UserService::new(Arc::new(MemStorage::new()));
    /// let user = tokio_test::block_on(svc.register(InsertUser { username: "amina".into(), password: "pw".into() })).unwrap();
    /// assert_eq!(user.username, "amina");
    /// let again = tokio_test::block_on(svc.register(InsertUser { username: "amina".into(), password: "x".into() }));
    /// assert!(again.is_err());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: InsertUser) -> Result<User, ServiceError> {
        let input = input.validate()?;
        if self.storage.get_user_by_username(&input.username).await?.is_some() {
            debug!("username already taken");
            return Err(ServiceError::Conflict(format!("username `{}` is already taken", input.username)));
        }
        // The backend enforces uniqueness too; a concurrent registration still fails cleanly.
        let user = self.storage.create_user(input).await?;
        info!(user_id = %user.id, "user_registered");
        Ok(user)
    }

    pub async fn get(&self, id: &str) -> Result<User, ServiceError> {
        self.storage
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.storage.get_user_by_username(username).await?)
    }
}

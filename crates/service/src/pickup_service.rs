use std::sync::Arc;

use tracing::{debug, info, instrument};

use models::{InsertWastePickup, UpdateWastePickup, WastePickup};

use crate::errors::ServiceError;
use crate::storage::Storage;

const ENTITY: &str = "Pickup";

/// Waste pickup workflows independent of the web framework.
///
/// Every operation validates first and then issues exactly one storage call;
/// invalid input never reaches the backend.
#[derive(Clone)]
pub struct WastePickupService {
    storage: Arc<dyn Storage>,
}

impl WastePickupService {
    pub fn new(storage: Arc<dyn Storage>) -> Self { Self { storage } }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Book a new pickup.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{storage::MemStorage, WastePickupService};
    /// use models::InsertWastePickup;
    /// let svc = WastePickupService::new(Arc::new(MemStorage::new()));
    /// let input = InsertWastePickup { full_name: "Jane Doe".into(), location: "Nairobi".into(), waste_type: "Organic".into(), preferred_date: None };
    /// let pickup = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(pickup.location, "Nairobi");
    /// assert!(pickup.preferred_date.is_none());
    /// ```
    #[instrument(skip(self, input), fields(backend = self.storage.backend_name(), location = %input.location))]
    pub async fn create(&self, input: InsertWastePickup) -> Result<WastePickup, ServiceError> {
        let input = input.validate()?;
        let pickup = self.storage.create_waste_pickup(input).await?;
        info!(pickup_id = %pickup.id, waste_type = %pickup.waste_type, "waste_pickup_created");
        Ok(pickup)
    }

    #[instrument(skip(self), fields(backend = self.storage.backend_name()))]
    pub async fn get(&self, id: &str) -> Result<WastePickup, ServiceError> {
        match self.storage.get_waste_pickup(id).await? {
            Some(p) => Ok(p),
            None => {
                debug!("waste pickup not found");
                Err(ServiceError::not_found(ENTITY))
            }
        }
    }

    /// All pickups, newest first.
    pub async fn list(&self) -> Result<Vec<WastePickup>, ServiceError> {
        Ok(self.storage.get_all_waste_pickups().await?)
    }

    pub async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.storage.count_waste_pickups().await?)
    }

    /// Merge the provided fields into an existing pickup.
    #[instrument(skip(self, update), fields(backend = self.storage.backend_name()))]
    pub async fn update(&self, id: &str, update: UpdateWastePickup) -> Result<WastePickup, ServiceError> {
        let update = update.validate()?;
        match self.storage.update_waste_pickup(id, update).await? {
            Some(p) => {
                info!(pickup_id = %p.id, "waste_pickup_updated");
                Ok(p)
            }
            None => Err(ServiceError::not_found(ENTITY)),
        }
    }

    #[instrument(skip(self), fields(backend = self.storage.backend_name()))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.storage.delete_waste_pickup(id).await? {
            info!(pickup_id = %id, "waste_pickup_deleted");
            Ok(())
        } else {
            Err(ServiceError::not_found(ENTITY))
        }
    }
}

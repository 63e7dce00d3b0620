use std::sync::Arc;

use service::storage::Storage;
use service::WastePickupService;

/// Shared handler state. Built once at startup around a single storage
/// backend and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub pickups: WastePickupService,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { pickups: WastePickupService::new(storage) }
    }
}

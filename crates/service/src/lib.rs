//! Service layer for waste pickup bookings.
//! - `storage` defines the persistence seam and its memory, MongoDB and PostgreSQL backends.
//! - `pickup_service` / `user_service` validate input, then make exactly one storage call.
//! - Errors are split into storage failures and business outcomes (`errors`).

pub mod errors;
pub mod storage;
pub mod pickup_service;
pub mod user_service;
#[cfg(test)]
pub mod test_support;

pub use pickup_service::WastePickupService;
pub use user_service::UserService;

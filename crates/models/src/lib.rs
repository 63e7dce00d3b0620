//! Record schema for the waste pickup service.
//!
//! - `schema` holds the backend-independent input/output contracts and their validation.
//! - `waste_pickup` and `user` are the relational (SeaORM) entities with their CRUD helpers.
//! - `db` opens a pooled relational connection.

pub mod errors;
pub mod schema;
pub mod db;
pub mod user;
pub mod waste_pickup;

pub use schema::{InsertUser, InsertWastePickup, UpdateWastePickup, User, WastePickup};

#[cfg(test)]
mod tests;

//! Shared building blocks for the waste pickup workspace: logging bootstrap,
//! startup environment helpers and small response types reused by the server.

pub mod types;
pub mod utils;
pub mod env;

//! Environment helpers
//!
//! Blank values are treated the same as unset ones so that an empty
//! `MONGODB_URI=` line in `.env` does not look like a configured backend.

/// Read an optional variable, treating blank values as unset.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// True when database-backed tests should be skipped (`SKIP_DB_TESTS` set).
pub fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok()
}

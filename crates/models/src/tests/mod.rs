
/// Relational entity CRUD tests (need `DATABASE_URL`)
pub mod db_tests;

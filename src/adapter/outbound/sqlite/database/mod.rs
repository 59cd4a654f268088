//! SQLite database modules.
//!
//! Provides database connection management, schema definitions, and
//! Diesel model types for the catalog database.

pub mod connection;
pub mod model;
pub mod schema;

pub use connection::{create_pool, open_database, run_migrations, DbPool, MEMORY_DATABASE};

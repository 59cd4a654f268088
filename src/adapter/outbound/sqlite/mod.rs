//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed vehicle catalog, the storefront product
//! catalog, and the bulk CSV importer using Diesel ORM.

pub mod catalog;
pub mod database;
pub mod import;
pub mod product;

pub use catalog::SqliteVehicleCatalog;
pub use import::{CatalogImporter, ImportReport};
pub use product::SqliteProductCatalog;

//! Fitment - vehicle-to-parts compatibility filtering.
//!
//! A shopper narrows a vehicle catalog through five cascading choices
//! (make, model, listing, year, engine) or a registration-plate lookup,
//! and the storefront product list is restricted to parts tagged for the
//! resolved vehicle.
//!
//! # Modules
//!
//! - [`domain`] - Identifiers, catalog records, criteria, and the selection
//!   state machine
//! - [`port`] - Catalog, product, and registration lookup contracts plus
//!   the action API
//! - [`application`] - Resolver, compatibility filter, dispatcher, tokens,
//!   and supplier feed preparation
//! - [`adapter`] - SQLite storage, the vehicle data HTTP client, and the CLI
//! - [`infrastructure`] - Configuration and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fitment::adapter::outbound::sqlite::database::open_database;
//! use fitment::adapter::outbound::sqlite::SqliteVehicleCatalog;
//! use fitment::application::VehicleResolver;
//!
//! let pool = open_database("fitment.db")?;
//! let resolver = VehicleResolver::new(Arc::new(SqliteVehicleCatalog::new(pool)));
//! let makes = resolver.makes()?;
//! # Ok::<(), fitment::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

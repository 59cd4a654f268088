//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`catalog`]: A seeded in-memory SQLite catalog and its fixture data.
//! - [`product`]: In-memory [`ProductCatalog`](crate::port::outbound::product::ProductCatalog).
//! - [`lookup`]: Scripted [`RegistrationLookup`](crate::port::outbound::registration::RegistrationLookup)
//!   and provider payload builders.

pub mod catalog;
pub mod lookup;
pub mod product;

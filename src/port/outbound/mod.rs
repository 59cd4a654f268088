//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the storage and third-party dependencies of the
//! fitment services: the vehicle catalog store, the storefront product
//! catalog, and the registration lookup provider.

pub mod catalog;
pub mod product;
pub mod registration;

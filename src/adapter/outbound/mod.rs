//! Outbound adapters (driven side).

pub mod sqlite;
pub mod vehicledata;

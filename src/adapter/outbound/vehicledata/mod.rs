//! Registration lookup adapter for the vehicle data provider.

pub mod client;
pub mod response;

pub use client::{ApiKey, VehicleDataClient};

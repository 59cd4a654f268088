//! Storefront products and compatibility tags.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VehicleId};

/// Product fields returned to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub link: String,
    pub image: Option<String>,
    pub price: String,
}

/// Marker linking a product to one vehicle.
///
/// The tag name is the vehicle identifier rendered in decimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityTag(String);

impl CompatibilityTag {
    #[must_use]
    pub fn for_vehicle(vehicle_id: VehicleId) -> Self {
        Self(vehicle_id.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<VehicleId> for CompatibilityTag {
    fn from(vehicle_id: VehicleId) -> Self {
        Self::for_vehicle(vehicle_id)
    }
}

impl fmt::Display for CompatibilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

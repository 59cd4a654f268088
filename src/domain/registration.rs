//! Vehicle attributes derived from a registration-plate lookup.

use serde::{Deserialize, Serialize};

use super::criteria::FilterCriteria;

/// Vehicle attributes in the filter vocabulary.
///
/// Every field is optional: the provider schema does not guarantee any of
/// them, and callers still have to confirm the values against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    pub make: Option<String>,
    pub model: Option<String>,
    pub listing: Option<String>,
    pub year: Option<i32>,
    pub engine: Option<String>,
}

impl VehicleAttributes {
    /// Project the attributes onto selection criteria.
    #[must_use]
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            make: self.make.clone(),
            model: self.model.clone(),
            listing: self.listing.clone(),
            year: self.year,
            engine: self.engine.clone(),
        }
    }
}

/// Result of a registration lookup: the raw provider payload plus the
/// normalized attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationResult {
    pub raw: serde_json::Value,
    pub attributes: VehicleAttributes,
}

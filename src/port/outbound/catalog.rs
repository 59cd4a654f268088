//! Vehicle catalog port.
//!
//! Narrowing queries over vehicle base records, engine codes, and their
//! links. Implementations are read-only at request time; bulk loading
//! happens through the importer during initialization.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{VehicleId, YearRange};
use crate::error::Result;

/// Row counts per catalog table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub vehicles: i64,
    pub engines: i64,
    pub links: i64,
}

/// Read-side queries of the vehicle catalog store.
///
/// All string lists are distinct and sorted ascending. Unknown values
/// yield empty results rather than errors.
pub trait VehicleCatalog: Send + Sync {
    /// Every make in the catalog.
    fn distinct_makes(&self) -> Result<Vec<String>>;

    /// Models recorded for `make`.
    fn distinct_models(&self, make: &str) -> Result<Vec<String>>;

    /// Listings recorded for `make` and `model`.
    fn distinct_listings(&self, make: &str, model: &str) -> Result<Vec<String>>;

    /// Year ranges of every record matching the triple.
    fn year_ranges(&self, make: &str, model: &str, listing: &str) -> Result<Vec<YearRange>>;

    /// Vehicles matching the triple whose range covers `year`.
    fn vehicle_ids(
        &self,
        make: &str,
        model: &str,
        listing: &str,
        year: i32,
    ) -> Result<BTreeSet<VehicleId>>;

    /// Distinct engine codes linked to any of `vehicle_ids`.
    fn engine_codes_for(&self, vehicle_ids: &BTreeSet<VehicleId>) -> Result<Vec<String>>;

    /// The vehicle matching all five criteria at once.
    ///
    /// When several vehicles match, the smallest identifier is returned.
    fn resolve_vehicle_id(
        &self,
        make: &str,
        model: &str,
        listing: &str,
        year: i32,
        engine_code: &str,
    ) -> Result<Option<VehicleId>>;

    /// Number of rows in each catalog table.
    fn counts(&self) -> Result<CatalogCounts>;
}

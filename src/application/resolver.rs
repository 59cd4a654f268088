//! Vehicle resolver service.
//!
//! Exposes the cascading selection protocol (make, model, listing, year,
//! engine) as a chain of stateless queries over the vehicle catalog. The
//! caller carries the criteria selected so far; nothing is kept between
//! calls.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::{expand_years, FilterCriteria, Selection, SelectionStatus, Stage, VehicleId};
use crate::error::Result;
use crate::port::outbound::catalog::VehicleCatalog;

/// Choices offered for the first unfilled stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "options", rename_all = "snake_case")]
pub enum StageOptions {
    Makes(Vec<String>),
    Models(Vec<String>),
    Listings(Vec<String>),
    Years(Vec<i32>),
    Engines(Vec<String>),
    /// All five stages are filled.
    Complete,
}

impl StageOptions {
    /// Stage these options belong to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Makes(_) => Stage::Make,
            Self::Models(_) => Stage::Model,
            Self::Listings(_) => Stage::Listing,
            Self::Years(_) => Stage::Year,
            Self::Engines(_) => Stage::Engine,
            Self::Complete => Stage::Resolved,
        }
    }

    /// Number of choices offered.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Makes(v) | Self::Models(v) | Self::Listings(v) | Self::Engines(v) => v.len(),
            Self::Years(v) => v.len(),
            Self::Complete => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stateless orchestration of the narrowing queries.
pub struct VehicleResolver {
    catalog: Arc<dyn VehicleCatalog>,
}

impl VehicleResolver {
    pub fn new(catalog: Arc<dyn VehicleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn makes(&self) -> Result<Vec<String>> {
        let makes = self.catalog.distinct_makes()?;
        debug!(count = makes.len(), "Loaded makes");
        Ok(makes)
    }

    pub fn models(&self, make: &str) -> Result<Vec<String>> {
        let models = self.catalog.distinct_models(make)?;
        debug!(make = %make, count = models.len(), "Loaded models");
        Ok(models)
    }

    pub fn listings(&self, make: &str, model: &str) -> Result<Vec<String>> {
        let listings = self.catalog.distinct_listings(make, model)?;
        debug!(make = %make, model = %model, count = listings.len(), "Loaded listings");
        Ok(listings)
    }

    /// Every year covered by any record of the triple, ascending.
    pub fn years(&self, make: &str, model: &str, listing: &str) -> Result<Vec<i32>> {
        let ranges = self.catalog.year_ranges(make, model, listing)?;
        let years = expand_years(&ranges);
        debug!(
            make = %make,
            model = %model,
            listing = %listing,
            ranges = ranges.len(),
            count = years.len(),
            "Expanded years"
        );
        Ok(years)
    }

    /// Engine codes linked to any vehicle of the triple covering `year`.
    pub fn engines(&self, make: &str, model: &str, listing: &str, year: i32) -> Result<Vec<String>> {
        let vehicle_ids = self.catalog.vehicle_ids(make, model, listing, year)?;
        let engines = self.catalog.engine_codes_for(&vehicle_ids)?;
        debug!(
            make = %make,
            model = %model,
            listing = %listing,
            year,
            vehicles = vehicle_ids.len(),
            count = engines.len(),
            "Loaded engines"
        );
        Ok(engines)
    }

    /// Options for the first unfilled stage of `criteria`.
    ///
    /// Values after the first gap are ignored; they cannot be reached.
    pub fn next_options(&self, criteria: &FilterCriteria) -> Result<StageOptions> {
        let Some(stage) = criteria.next_stage() else {
            return Ok(StageOptions::Complete);
        };
        // Every stage before `stage` is filled, so the earlier fields are set.
        let make = criteria.make.as_deref().unwrap_or_default();
        let model = criteria.model.as_deref().unwrap_or_default();
        let listing = criteria.listing.as_deref().unwrap_or_default();
        let options = match stage {
            Stage::Make => StageOptions::Makes(self.makes()?),
            Stage::Model => StageOptions::Models(self.models(make)?),
            Stage::Listing => StageOptions::Listings(self.listings(make, model)?),
            Stage::Year => StageOptions::Years(self.years(make, model, listing)?),
            Stage::Engine => match criteria.year {
                Some(year) => StageOptions::Engines(self.engines(make, model, listing, year)?),
                None => StageOptions::Engines(Vec::new()),
            },
            Stage::Resolved => StageOptions::Complete,
        };
        Ok(options)
    }

    /// The vehicle matching all five criteria, or `None` when incomplete or
    /// unmatched.
    pub fn resolve_id(&self, criteria: &FilterCriteria) -> Result<Option<VehicleId>> {
        let Some(c) = criteria.complete() else {
            debug!(filled = criteria.filled_stages(), "Criteria incomplete, not resolving");
            return Ok(None);
        };
        let vehicle_id = self
            .catalog
            .resolve_vehicle_id(c.make, c.model, c.listing, c.year, c.engine)?;
        debug!(
            make = %c.make,
            model = %c.model,
            listing = %c.listing,
            year = c.year,
            engine = %c.engine,
            vehicle_id = ?vehicle_id,
            "Resolved vehicle"
        );
        Ok(vehicle_id)
    }

    /// Resolve a selection in place and report where it stands.
    pub fn resolve_selection(&self, selection: &mut Selection) -> Result<SelectionStatus> {
        if selection.criteria().is_complete() {
            let vehicle_id = self.resolve_id(selection.criteria())?;
            selection.record_resolution(vehicle_id);
        }
        Ok(selection.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::catalog::seeded_catalog;

    fn resolver() -> VehicleResolver {
        VehicleResolver::new(Arc::new(seeded_catalog()))
    }

    fn focus_hatchback() -> FilterCriteria {
        FilterCriteria::new()
            .make("Ford")
            .model("Focus")
            .listing("Hatchback")
    }

    #[test]
    fn next_options_walks_the_cascade() {
        let resolver = resolver();

        assert_eq!(
            resolver.next_options(&FilterCriteria::new()).unwrap(),
            StageOptions::Makes(vec!["Audi".into(), "Ford".into()])
        );
        assert_eq!(
            resolver.next_options(&FilterCriteria::new().make("Ford")).unwrap(),
            StageOptions::Models(vec!["Fiesta".into(), "Focus".into()])
        );
        assert_eq!(
            resolver
                .next_options(&FilterCriteria::new().make("Ford").model("Focus"))
                .unwrap(),
            StageOptions::Listings(vec!["Estate".into(), "Hatchback".into()])
        );
        assert_eq!(
            resolver.next_options(&focus_hatchback()).unwrap(),
            StageOptions::Years((2011..=2018).collect())
        );
        assert_eq!(
            resolver.next_options(&focus_hatchback().year(2016)).unwrap(),
            StageOptions::Engines(vec!["1.0 EcoBoost".into(), "TDCI".into()])
        );
        assert_eq!(
            resolver
                .next_options(&focus_hatchback().year(2016).engine("TDCI"))
                .unwrap(),
            StageOptions::Complete
        );
    }

    #[test]
    fn stage_after_gap_is_ignored() {
        let resolver = resolver();
        let criteria = FilterCriteria::new().make("Ford").listing("Hatchback");
        let options = resolver.next_options(&criteria).unwrap();
        assert_eq!(options.stage(), Stage::Model);
    }

    #[test]
    fn unknown_make_yields_empty_stages_and_no_vehicle() {
        let resolver = resolver();
        assert!(resolver.models("Lada").unwrap().is_empty());
        assert!(resolver.listings("Lada", "Niva").unwrap().is_empty());
        assert!(resolver.years("Lada", "Niva", "4x4").unwrap().is_empty());
        assert!(resolver.engines("Lada", "Niva", "4x4", 2016).unwrap().is_empty());
        let criteria = FilterCriteria::new()
            .make("Lada")
            .model("Niva")
            .listing("4x4")
            .year(2016)
            .engine("1.7");
        assert_eq!(resolver.resolve_id(&criteria).unwrap(), None);
    }

    #[test]
    fn resolve_is_idempotent_and_sound() {
        let resolver = resolver();
        let catalog = seeded_catalog();
        let criteria = focus_hatchback().year(2016).engine("TDCI");

        let first = resolver.resolve_id(&criteria).unwrap();
        let second = resolver.resolve_id(&criteria).unwrap();
        assert_eq!(first, Some(VehicleId::new(1)));
        assert_eq!(first, second);

        let candidates = catalog
            .vehicle_ids("Ford", "Focus", "Hatchback", 2016)
            .unwrap();
        assert!(candidates.contains(&VehicleId::new(1)));
    }

    #[test]
    fn incomplete_criteria_never_resolve() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_id(&focus_hatchback().year(2016)).unwrap(), None);
    }

    #[test]
    fn ambiguous_match_resolves_to_smallest_id() {
        let resolver = resolver();
        let criteria = FilterCriteria::new()
            .make("Audi")
            .model("A3")
            .listing("Sportback")
            .year(2017)
            .engine("2.0 TDI");
        assert_eq!(resolver.resolve_id(&criteria).unwrap(), Some(VehicleId::new(5)));
    }

    #[test]
    fn selection_reaches_resolved_only_on_match() {
        let resolver = resolver();
        let mut selection = Selection::new();
        selection.select_make("Ford");
        selection.select_model("Focus");
        selection.select_listing("Hatchback");
        selection.select_year(2012);
        selection.select_engine("TDCI");

        assert_eq!(resolver.resolve_selection(&mut selection).unwrap(), SelectionStatus::NoMatch);
        assert_eq!(selection.vehicle_id(), None);

        selection.select_year(2016);
        assert_eq!(
            selection.status(),
            SelectionStatus::Awaiting(Stage::Engine),
            "changing the year clears the engine"
        );
        selection.select_engine("TDCI");
        assert_eq!(
            resolver.resolve_selection(&mut selection).unwrap(),
            SelectionStatus::Resolved(VehicleId::new(1))
        );
        assert_eq!(selection.stage(), Stage::Resolved);
    }
}

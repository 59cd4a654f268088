//! Cascading selection state machine.
//!
//! Make → Model → Listing → Year → Engine → Resolved. Choosing a value at
//! one stage resets every later stage and any previous resolution. The
//! terminal `Resolved` state is only reached once all five values are set
//! and a lookup produced a vehicle identifier.

use super::criteria::{FilterCriteria, Stage};
use super::id::VehicleId;

/// Where a selection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// Waiting for a value at the given stage.
    Awaiting(Stage),
    /// All five values are set but no vehicle matches them.
    NoMatch,
    /// A vehicle identifier was resolved.
    Resolved(VehicleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Pending,
    NoMatch,
    Found(VehicleId),
}

/// Client-side selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    criteria: FilterCriteria,
    resolution: Resolution,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            resolution: Resolution::Pending,
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn select_make(&mut self, make: impl Into<String>) {
        self.criteria.make = Some(make.into());
        self.reset_after(Stage::Make);
    }

    pub fn select_model(&mut self, model: impl Into<String>) {
        self.criteria.model = Some(model.into());
        self.reset_after(Stage::Model);
    }

    pub fn select_listing(&mut self, listing: impl Into<String>) {
        self.criteria.listing = Some(listing.into());
        self.reset_after(Stage::Listing);
    }

    pub fn select_year(&mut self, year: i32) {
        self.criteria.year = Some(year);
        self.reset_after(Stage::Year);
    }

    pub fn select_engine(&mut self, engine: impl Into<String>) {
        self.criteria.engine = Some(engine.into());
        self.reset_after(Stage::Engine);
    }

    /// Record the outcome of resolving the current criteria.
    ///
    /// Ignored unless all five values are set, so an incomplete selection
    /// can never become `Resolved`.
    pub fn record_resolution(&mut self, vehicle_id: Option<VehicleId>) {
        if !self.criteria.is_complete() {
            return;
        }
        self.resolution = match vehicle_id {
            Some(id) => Resolution::Found(id),
            None => Resolution::NoMatch,
        };
    }

    #[must_use]
    pub fn status(&self) -> SelectionStatus {
        if let Some(stage) = self.criteria.next_stage() {
            return SelectionStatus::Awaiting(stage);
        }
        match self.resolution {
            Resolution::Found(id) => SelectionStatus::Resolved(id),
            Resolution::NoMatch => SelectionStatus::NoMatch,
            Resolution::Pending => SelectionStatus::Awaiting(Stage::Engine),
        }
    }

    /// Current stage of the cascade.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self.status() {
            SelectionStatus::Awaiting(stage) => stage,
            SelectionStatus::NoMatch => Stage::Engine,
            SelectionStatus::Resolved(_) => Stage::Resolved,
        }
    }

    #[must_use]
    pub fn vehicle_id(&self) -> Option<VehicleId> {
        match self.resolution {
            Resolution::Found(id) => Some(id),
            _ => None,
        }
    }

    fn reset_after(&mut self, stage: Stage) {
        self.criteria.clear_after(stage);
        self.resolution = Resolution::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_selection() -> Selection {
        let mut selection = Selection::new();
        selection.select_make("Ford");
        selection.select_model("Focus");
        selection.select_listing("Hatchback");
        selection.select_year(2016);
        selection.select_engine("TDCI");
        selection
    }

    #[test]
    fn stages_advance_in_order() {
        let mut selection = Selection::new();
        assert_eq!(selection.stage(), Stage::Make);
        selection.select_make("Ford");
        assert_eq!(selection.stage(), Stage::Model);
        selection.select_model("Focus");
        assert_eq!(selection.stage(), Stage::Listing);
        selection.select_listing("Hatchback");
        assert_eq!(selection.stage(), Stage::Year);
        selection.select_year(2016);
        assert_eq!(selection.stage(), Stage::Engine);
    }

    #[test]
    fn resolution_reaches_terminal_state() {
        let mut selection = complete_selection();
        selection.record_resolution(Some(VehicleId::new(1)));
        assert_eq!(selection.status(), SelectionStatus::Resolved(VehicleId::new(1)));
        assert_eq!(selection.stage(), Stage::Resolved);
    }

    #[test]
    fn missing_match_is_not_terminal() {
        let mut selection = complete_selection();
        selection.record_resolution(None);
        assert_eq!(selection.status(), SelectionStatus::NoMatch);
        assert_eq!(selection.vehicle_id(), None);
    }

    #[test]
    fn changing_an_early_stage_resets_later_ones() {
        let mut selection = complete_selection();
        selection.record_resolution(Some(VehicleId::new(1)));

        selection.select_model("Fiesta");

        assert_eq!(selection.stage(), Stage::Listing);
        assert_eq!(selection.criteria().listing, None);
        assert_eq!(selection.criteria().engine, None);
        assert_eq!(selection.vehicle_id(), None);
    }

    #[test]
    fn incomplete_selection_ignores_resolution() {
        let mut selection = Selection::new();
        selection.select_make("Ford");
        selection.record_resolution(Some(VehicleId::new(9)));
        assert_eq!(selection.status(), SelectionStatus::Awaiting(Stage::Model));
    }
}

//! Filter criteria and the ordered selection stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered stages of the cascading vehicle selection.
///
/// Each stage depends only on the stages before it. `Resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Make,
    Model,
    Listing,
    Year,
    Engine,
    Resolved,
}

impl Stage {
    /// The five selectable stages, in order.
    pub const SELECTABLE: [Stage; 5] = [
        Stage::Make,
        Stage::Model,
        Stage::Listing,
        Stage::Year,
        Stage::Engine,
    ];

    /// Position of the stage in the cascade (`Make` = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Make => "make",
            Self::Model => "model",
            Self::Listing => "listing",
            Self::Year => "year",
            Self::Engine => "engine",
            Self::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

/// Criteria accumulated by the caller across the selection stages.
///
/// The server holds none of this between requests; each call carries the
/// full tuple selected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub make: Option<String>,
    pub model: Option<String>,
    pub listing: Option<String>,
    pub year: Option<i32>,
    pub engine: Option<String>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn listing(mut self, listing: impl Into<String>) -> Self {
        self.listing = Some(listing.into());
        self
    }

    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Number of leading stages that are filled.
    ///
    /// Stages are contiguous: a value after the first gap is unreachable
    /// and does not count.
    #[must_use]
    pub fn filled_stages(&self) -> usize {
        let filled = [
            is_set(self.make.as_deref()),
            is_set(self.model.as_deref()),
            is_set(self.listing.as_deref()),
            self.year.is_some(),
            is_set(self.engine.as_deref()),
        ];
        filled.iter().take_while(|set| **set).count()
    }

    /// First stage still waiting for a value, or `None` when all five are set.
    #[must_use]
    pub fn next_stage(&self) -> Option<Stage> {
        Stage::SELECTABLE.get(self.filled_stages()).copied()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.filled_stages() == Stage::SELECTABLE.len()
    }

    /// Borrow all five values when the criteria are complete.
    #[must_use]
    pub fn complete(&self) -> Option<CompleteCriteria<'_>> {
        if !self.is_complete() {
            return None;
        }
        Some(CompleteCriteria {
            make: self.make.as_deref()?,
            model: self.model.as_deref()?,
            listing: self.listing.as_deref()?,
            year: self.year?,
            engine: self.engine.as_deref()?,
        })
    }

    /// Clear every stage after `stage`.
    pub fn clear_after(&mut self, stage: Stage) {
        for later in Stage::SELECTABLE.iter().filter(|s| **s > stage) {
            match later {
                Stage::Make => self.make = None,
                Stage::Model => self.model = None,
                Stage::Listing => self.listing = None,
                Stage::Year => self.year = None,
                Stage::Engine => self.engine = None,
                Stage::Resolved => {}
            }
        }
    }
}

/// A fully specified criteria tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteCriteria<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub listing: &'a str,
    pub year: i32,
    pub engine: &'a str,
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_wait_for_make() {
        assert_eq!(FilterCriteria::new().next_stage(), Some(Stage::Make));
    }

    #[test]
    fn gap_hides_later_values() {
        let criteria = FilterCriteria::new().make("Ford").listing("Hatchback").year(2016);
        assert_eq!(criteria.filled_stages(), 1);
        assert_eq!(criteria.next_stage(), Some(Stage::Model));
    }

    #[test]
    fn empty_string_counts_as_unset() {
        let criteria = FilterCriteria::new().make("");
        assert_eq!(criteria.next_stage(), Some(Stage::Make));
    }

    #[test]
    fn complete_criteria_expose_all_values() {
        let criteria = FilterCriteria::new()
            .make("Ford")
            .model("Focus")
            .listing("Hatchback")
            .year(2016)
            .engine("TDCI");
        assert!(criteria.is_complete());
        assert_eq!(criteria.next_stage(), None);
        let complete = criteria.complete().unwrap();
        assert_eq!(complete.year, 2016);
        assert_eq!(complete.engine, "TDCI");
    }

    #[test]
    fn clear_after_resets_later_stages() {
        let mut criteria = FilterCriteria::new()
            .make("Ford")
            .model("Focus")
            .listing("Hatchback")
            .year(2016)
            .engine("TDCI");
        criteria.clear_after(Stage::Model);
        assert_eq!(criteria, FilterCriteria::new().make("Ford").model("Focus"));
    }
}

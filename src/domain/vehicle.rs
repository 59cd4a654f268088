//! Vehicle catalog records.
//!
//! These mirror the three tables of the catalog store: vehicle base rows,
//! engine codes, and the many-to-many link between them.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{EngineId, VehicleId};

/// Earliest model year a catalog record may carry.
pub const MIN_MODEL_YEAR: i32 = 1800;
/// Latest model year a catalog record may carry.
pub const MAX_MODEL_YEAR: i32 = 2200;

/// Inclusive range of model years.
///
/// Ranges read back from storage are not guaranteed to be ordered; an
/// inverted range simply contains no years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    #[must_use]
    pub const fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }

    /// Build a range from stored fractional years, truncating toward zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_stored(from: f64, to: f64) -> Self {
        Self {
            from: from.trunc() as i32,
            to: to.trunc() as i32,
        }
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.from > self.to
    }

    /// Iterate the years of the range in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.from..=self.to
    }
}

/// One vehicle fitment entry.
///
/// A make/model/listing combination may appear in several records with
/// different (possibly overlapping) year ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: VehicleId,
    pub make: String,
    pub model: String,
    pub listing: String,
    pub year_from: f64,
    pub year_to: f64,
}

impl VehicleRecord {
    /// Create a record.
    ///
    /// Rejects blank make, model, or listing, years outside
    /// [`MIN_MODEL_YEAR`]..=[`MAX_MODEL_YEAR`], and a range that ends before
    /// it starts.
    pub fn try_new(
        vehicle_id: VehicleId,
        make: impl Into<String>,
        model: impl Into<String>,
        listing: impl Into<String>,
        year_from: f64,
        year_to: f64,
    ) -> Result<Self, DomainError> {
        let record = Self {
            vehicle_id,
            make: make.into(),
            model: model.into(),
            listing: listing.into(),
            year_from,
            year_to,
        };
        for (field, value) in [
            ("make", &record.make),
            ("model", &record.model),
            ("listing", &record.listing),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::EmptyField { field });
            }
        }
        check_year("year_from", year_from)?;
        check_year("year_to", year_to)?;

        let years = record.years();
        if year_from > year_to {
            return Err(DomainError::InvertedYearRange {
                from: years.from,
                to: years.to,
            });
        }
        Ok(record)
    }

    #[must_use]
    pub fn years(&self) -> YearRange {
        YearRange::from_stored(self.year_from, self.year_to)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn check_year(field: &'static str, year: f64) -> Result<(), DomainError> {
    let window = f64::from(MIN_MODEL_YEAR)..=f64::from(MAX_MODEL_YEAR);
    if window.contains(&year.trunc()) {
        return Ok(());
    }
    Err(DomainError::YearOutOfRange {
        field,
        year: year.trunc() as i64,
        min: MIN_MODEL_YEAR,
        max: MAX_MODEL_YEAR,
    })
}

/// A distinct engine code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRecord {
    pub engine_id: EngineId,
    pub engine_code: String,
}

impl EngineRecord {
    /// Create an engine record, rejecting a blank code.
    pub fn try_new(engine_id: EngineId, engine_code: impl Into<String>) -> Result<Self, DomainError> {
        let engine_code = engine_code.into();
        if engine_code.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "engine_code",
            });
        }
        Ok(Self {
            engine_id,
            engine_code,
        })
    }
}

/// Association between a vehicle and one of its engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleEngineLink {
    pub vehicle_id: VehicleId,
    pub engine_id: EngineId,
}

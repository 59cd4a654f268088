//! Domain validation errors for fitment types.
//!
//! Returned by `try_new` constructors when a record would violate a
//! catalog invariant.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A year range must not end before it starts.
    #[error("year range {from}..{to} ends before it starts")]
    InvertedYearRange {
        /// First year of the range.
        from: i32,
        /// Last year of the range.
        to: i32,
    },

    /// Model years must fall within a plausible window.
    #[error("{field} {year} is outside {min}..={max}")]
    YearOutOfRange {
        /// Name of the offending year field.
        field: &'static str,
        /// The year, truncated toward zero.
        year: i64,
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },

    /// Text fields of a vehicle record must not be blank.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the blank field.
        field: &'static str,
    },
}

impl DomainError {
    /// Name of the field the violation concerns.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvertedYearRange { .. } => "year_range",
            Self::YearOutOfRange { field, .. } | Self::EmptyField { field } => field,
        }
    }
}

//! Storage-agnostic fitment domain.
//!
//! Plain types and pure functions only: identifiers, catalog records,
//! selection criteria, the cascading selection state machine, products,
//! and registration lookup results.

pub mod criteria;
pub mod error;
pub mod id;
pub mod product;
pub mod registration;
pub mod selection;
pub mod vehicle;
pub mod years;

pub use criteria::{CompleteCriteria, FilterCriteria, Stage};
pub use id::{EngineId, ProductId, VehicleId};
pub use product::{CompatibilityTag, ProductSummary};
pub use registration::{RegistrationResult, VehicleAttributes};
pub use selection::{Selection, SelectionStatus};
pub use vehicle::{
    EngineRecord, VehicleEngineLink, VehicleRecord, YearRange, MAX_MODEL_YEAR, MIN_MODEL_YEAR,
};
pub use years::expand_years;

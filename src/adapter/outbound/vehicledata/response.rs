//! Vehicle data provider response handling.
//!
//! The raw payload is passed through to callers untouched; the attributes
//! used by the filter are picked out of it with JSON pointers.

use serde_json::Value;

use crate::domain::{RegistrationResult, VehicleAttributes};
use crate::error::LookupError;

const VEHICLE_DETAILS: &str = "/Results/VehicleDetails";
const MODEL_DETAILS: &str = "/Results/ModelDetails";

const MAKE: &[&str] = &[
    "/Results/ModelDetails/ModelIdentification/Make",
    "/Results/VehicleDetails/VehicleIdentification/DvlaMake",
];
const MODEL: &[&str] = &[
    "/Results/ModelDetails/ModelIdentification/Range",
    "/Results/VehicleDetails/VehicleIdentification/DvlaModel",
];
const LISTING: &[&str] = &["/Results/ModelDetails/ModelIdentification/Model"];
const YEAR: &[&str] = &[
    "/Results/VehicleDetails/VehicleIdentification/YearOfManufacture",
    "/Results/ModelDetails/ModelIdentification/YearOfManufacture",
];
const ENGINE: &[&str] = &[
    "/Results/ModelDetails/Powertrain/IceDetails/EngineFamily",
    "/Results/ModelDetails/Powertrain/IceDetails/EngineDescription",
];

/// Parse a provider response body.
///
/// # Errors
/// [`LookupError::InvalidUpstreamResponse`] when the body is not JSON or
/// lacks the vehicle or model details sections.
pub fn parse_response(body: &str) -> Result<RegistrationResult, LookupError> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| LookupError::InvalidUpstreamResponse(format!("body is not JSON: {e}")))?;

    for section in [VEHICLE_DETAILS, MODEL_DETAILS] {
        match raw.pointer(section) {
            Some(value) if !value.is_null() => {}
            _ => {
                return Err(LookupError::InvalidUpstreamResponse(format!(
                    "missing {}",
                    section.trim_start_matches('/').replace('/', ".")
                )))
            }
        }
    }

    let attributes = extract_attributes(&raw);
    Ok(RegistrationResult { raw, attributes })
}

/// Map the provider schema onto filter attributes.
#[must_use]
pub fn extract_attributes(raw: &Value) -> VehicleAttributes {
    VehicleAttributes {
        make: first_text(raw, MAKE),
        model: first_text(raw, MODEL),
        listing: first_text(raw, LISTING),
        year: first_year(raw, YEAR),
        engine: first_text(raw, ENGINE),
    }
}

fn first_text(raw: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|pointer| match raw.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_year(raw: &Value, pointers: &[&str]) -> Option<i32> {
    pointers.iter().find_map(|pointer| match raw.pointer(pointer)? {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().get(..4).and_then(|y| y.parse().ok()),
        _ => None,
    })
}

//! Scripted registration lookup and provider payload builders.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapter::outbound::vehicledata::response::parse_response;
use crate::domain::RegistrationResult;
use crate::error::LookupError;
use crate::port::outbound::registration::RegistrationLookup;

/// [`RegistrationLookup`] that replays queued outcomes and records plates.
///
/// When the queue is empty every call fails with
/// [`LookupError::UpstreamUnavailable`].
#[derive(Debug, Default)]
pub struct ScriptedLookup {
    outcomes: Mutex<VecDeque<Result<RegistrationResult, LookupError>>>,
    plates: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful lookup returning `payload`.
    ///
    /// # Panics
    /// Panics if `payload` is not a valid provider document.
    #[must_use]
    pub fn with_payload(self, payload: &Value) -> Self {
        let result = parse_response(&payload.to_string()).expect("valid provider payload");
        self.push(Ok(result));
        self
    }

    /// Queue a failed lookup.
    #[must_use]
    pub fn with_error(self, error: LookupError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, outcome: Result<RegistrationResult, LookupError>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(outcome);
        }
    }

    /// Plates passed to [`RegistrationLookup::lookup`], in call order.
    #[must_use]
    pub fn plates(&self) -> Vec<String> {
        self.plates.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RegistrationLookup for ScriptedLookup {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn lookup(&self, plate: &str) -> Result<RegistrationResult, LookupError> {
        if let Ok(mut plates) = self.plates.lock() {
            plates.push(plate.to_string());
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or_else(|| Err(LookupError::UpstreamUnavailable("no scripted response".into())))
    }
}

/// Provider document for a vehicle in the filter vocabulary.
#[must_use]
pub fn registration_payload(
    plate: &str,
    make: &str,
    model: &str,
    listing: &str,
    year: i32,
    engine: &str,
) -> Value {
    json!({
        "ResponseInformation": { "StatusCode": 0, "StatusMessage": "Success" },
        "Results": {
            "VehicleDetails": {
                "VehicleIdentification": {
                    "Vrm": plate,
                    "DvlaMake": make.to_uppercase(),
                    "DvlaModel": model.to_uppercase(),
                    "YearOfManufacture": year
                }
            },
            "ModelDetails": {
                "ModelIdentification": {
                    "Make": make,
                    "Range": model,
                    "Model": listing
                },
                "Powertrain": {
                    "IceDetails": { "EngineFamily": engine }
                }
            }
        }
    })
}

//! Action API request and response shapes.
//!
//! Every request names an action, carries the anti-forgery token, and
//! brings the full set of criteria selected so far. Field values arrive
//! form-style, so numbers may be sent as strings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{FilterCriteria, VehicleId};
use crate::error::FilterError;

/// Session identifier used when a request does not name one.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Raw inbound request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Session the request belongs to.
    #[must_use]
    pub fn session_id(&self) -> &str {
        self.session
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(ANONYMOUS_SESSION)
    }

    fn text(&self, field: &str) -> Result<String, FilterError> {
        match self.fields.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::String(_) | Value::Null) | None => {
                Err(FilterError::invalid(field, "is required"))
            }
            Some(_) => Err(FilterError::invalid(field, "must be a string")),
        }
    }

    fn year(&self) -> Result<i32, FilterError> {
        let invalid = || FilterError::invalid("year", "must be a whole number");
        match self.fields.get("year") {
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(invalid),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                s.trim().parse::<i32>().map_err(|_| invalid())
            }
            Some(Value::String(_) | Value::Null) | None => {
                Err(FilterError::invalid("year", "is required"))
            }
            Some(_) => Err(invalid()),
        }
    }

    fn optional_vehicle_id(&self) -> Result<Option<VehicleId>, FilterError> {
        let invalid = || FilterError::invalid("vehicle_id", "must be a whole number");
        match self.fields.get("vehicle_id") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.parse::<VehicleId>().map(Some).map_err(|_| invalid()),
            Some(Value::Number(n)) => n.as_i64().map(|id| Some(VehicleId::new(id))).ok_or_else(invalid),
            Some(_) => Err(invalid()),
        }
    }
}

/// A parsed, validated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GetMakes,
    GetModels { make: String },
    GetListings { make: String, model: String },
    GetYears { make: String, model: String, listing: String },
    GetEngines { make: String, model: String, listing: String, year: i32 },
    GetVehicleId(FilterCriteria),
    FilterProducts { vehicle_id: Option<VehicleId> },
    LookupVehicleByReg { reg_number: String },
    GetLastVehicle,
}

impl Action {
    /// Wire name of the action.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetMakes => "get_makes",
            Self::GetModels { .. } => "get_models",
            Self::GetListings { .. } => "get_listings",
            Self::GetYears { .. } => "get_years",
            Self::GetEngines { .. } => "get_engines",
            Self::GetVehicleId(_) => "get_vehicle_id",
            Self::FilterProducts { .. } => "filter_products",
            Self::LookupVehicleByReg { .. } => "lookup_vehicle_by_reg",
            Self::GetLastVehicle => "get_last_vehicle",
        }
    }

    /// Parse the action named by `request` and validate its fields.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownAction`] for an unrecognized name and
    /// [`FilterError::InvalidArgument`] for a missing or malformed field.
    pub fn parse(request: &ActionRequest) -> Result<Self, FilterError> {
        let action = match request.action.trim() {
            "get_makes" => Self::GetMakes,
            "get_models" => Self::GetModels {
                make: request.text("make")?,
            },
            "get_listings" => Self::GetListings {
                make: request.text("make")?,
                model: request.text("model")?,
            },
            "get_years" => Self::GetYears {
                make: request.text("make")?,
                model: request.text("model")?,
                listing: request.text("listing")?,
            },
            "get_engines" => Self::GetEngines {
                make: request.text("make")?,
                model: request.text("model")?,
                listing: request.text("listing")?,
                year: request.year()?,
            },
            "get_vehicle_id" => Self::GetVehicleId(FilterCriteria {
                make: Some(request.text("make")?),
                model: Some(request.text("model")?),
                listing: Some(request.text("listing")?),
                year: Some(request.year()?),
                engine: Some(request.text("engine")?),
            }),
            "filter_products" => Self::FilterProducts {
                vehicle_id: request.optional_vehicle_id()?,
            },
            "lookup_vehicle_by_reg" => Self::LookupVehicleByReg {
                reg_number: request.text("reg_number")?,
            },
            "get_last_vehicle" => Self::GetLastVehicle,
            other => return Err(FilterError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
}

impl Envelope {
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }

    #[must_use]
    pub fn failure(error: &FilterError) -> Self {
        Self {
            success: false,
            data: json!({
                "code": error.code(),
                "message": error.public_message(),
            }),
        }
    }

    /// Failure code, when this is a failure envelope.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.data.get("code").and_then(Value::as_str)
    }
}

/// Inbound port for the action API.
#[async_trait]
pub trait FilterApi: Send + Sync {
    /// Handle one request. Never fails: every outcome is an envelope.
    async fn dispatch(&self, request: &ActionRequest) -> Envelope;

    /// Issue an anti-forgery token for `session`.
    fn issue_token(&self, session: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(action: &str) -> ActionRequest {
        ActionRequest::new(action)
    }

    #[test]
    fn parses_request_json_with_flattened_fields() {
        let raw = r#"{"action":"get_models","nonce":"abc","make":" Ford "}"#;
        let request: ActionRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.nonce.as_deref(), Some("abc"));
        assert_eq!(
            Action::parse(&request).unwrap(),
            Action::GetModels {
                make: "Ford".into()
            }
        );
    }

    #[test]
    fn year_accepts_number_or_numeric_string() {
        let base = request("get_engines")
            .with_field("make", "Ford")
            .with_field("model", "Focus")
            .with_field("listing", "Hatchback");

        let from_number = Action::parse(&base.clone().with_field("year", 2016)).unwrap();
        let from_string = Action::parse(&base.with_field("year", "2016")).unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn non_numeric_year_is_invalid_argument() {
        let req = request("get_engines")
            .with_field("make", "Ford")
            .with_field("model", "Focus")
            .with_field("listing", "Hatchback")
            .with_field("year", "twenty sixteen");
        let err = Action::parse(&req).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument { ref field, .. } if field == "year"));
    }

    #[test]
    fn missing_field_is_invalid_argument() {
        let err = Action::parse(&request("get_listings").with_field("make", "Ford")).unwrap_err();
        assert_eq!(err, FilterError::invalid("model", "is required"));
    }

    #[test]
    fn filter_products_treats_blank_vehicle_id_as_absent() {
        let parsed = Action::parse(&request("filter_products").with_field("vehicle_id", "")).unwrap();
        assert_eq!(parsed, Action::FilterProducts { vehicle_id: None });

        let parsed = Action::parse(&request("filter_products").with_field("vehicle_id", "12")).unwrap();
        assert_eq!(
            parsed,
            Action::FilterProducts {
                vehicle_id: Some(VehicleId::new(12))
            }
        );
    }

    #[test]
    fn unknown_action_is_reported() {
        let err = Action::parse(&request("drop_tables")).unwrap_err();
        assert_eq!(err, FilterError::UnknownAction("drop_tables".into()));
    }

    #[test]
    fn failure_envelope_carries_code_and_message() {
        let envelope = Envelope::failure(&FilterError::AuthRejected);
        assert!(!envelope.success);
        assert_eq!(envelope.error_code(), Some("auth_rejected"));
        assert_eq!(envelope.data["message"], "security token missing or invalid");
    }

    #[test]
    fn session_defaults_to_anonymous() {
        assert_eq!(request("get_makes").session_id(), ANONYMOUS_SESSION);
        assert_eq!(request("get_makes").with_session(" s1 ").session_id(), "s1");
    }
}

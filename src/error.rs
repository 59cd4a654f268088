use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures of the registration lookup provider.
///
/// Messages never carry the request URL, which embeds the API key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("vehicle lookup service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("vehicle lookup service responded with HTTP status {status}")]
    UpstreamError { status: u16, body: String },

    #[error("invalid response from vehicle lookup service: {0}")]
    InvalidUpstreamResponse(String),

    #[error("vehicle lookup is not configured (FITMENT_LOOKUP_API_KEY not set)")]
    MissingApiKey,
}

/// Errors surfaced at the request boundary of the action API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("security token missing or invalid")]
    AuthRejected,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl FilterError {
    /// Shorthand for [`FilterError::InvalidArgument`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code used in failure envelopes.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::AuthRejected => "auth_rejected",
            Self::UnknownAction(_) => "unknown_action",
            Self::Lookup(LookupError::UpstreamUnavailable(_)) => "upstream_unavailable",
            Self::Lookup(LookupError::UpstreamError { .. }) => "upstream_error",
            Self::Lookup(LookupError::InvalidUpstreamResponse(_)) => "invalid_upstream_response",
            Self::Lookup(LookupError::MissingApiKey) => "lookup_unconfigured",
            Self::Internal(_) => "internal",
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Internal failures are reported generically; details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<Error> for FilterError {
    fn from(err: Error) -> Self {
        match err {
            Error::Filter(inner) => inner,
            Error::Lookup(inner) => FilterError::Lookup(inner),
            Error::Domain(inner) => FilterError::invalid(inner.field(), inner.to_string()),
            other => FilterError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_reported_generically() {
        let err = FilterError::Internal("disk I/O error at /var/db".into());
        assert_eq!(err.code(), "internal");
        assert!(!err.public_message().contains("/var/db"));
    }

    #[test]
    fn lookup_errors_keep_their_codes() {
        let err = FilterError::from(LookupError::UpstreamError {
            status: 503,
            body: "busy".into(),
        });
        assert_eq!(err.code(), "upstream_error");
        assert_eq!(
            err.public_message(),
            "vehicle lookup service responded with HTTP status 503"
        );
    }

    #[test]
    fn crate_errors_fold_into_filter_errors() {
        let err: FilterError = Error::Database("locked".into()).into();
        assert!(matches!(err, FilterError::Internal(_)));

        let err: FilterError = Error::Filter(FilterError::AuthRejected).into();
        assert_eq!(err, FilterError::AuthRejected);
    }
}

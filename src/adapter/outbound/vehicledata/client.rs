//! Vehicle data provider HTTP client.
//!
//! Implements [`RegistrationLookup`] against the provider's lookup
//! endpoint. The API key travels as a query parameter, so every transport
//! error is stripped of its URL before it is logged or returned.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::response::parse_response;
use crate::domain::RegistrationResult;
use crate::error::{Error, LookupError, Result};
use crate::infrastructure::config::LookupConfig;
use crate::port::outbound::registration::RegistrationLookup;

/// Longest upstream error body kept in [`LookupError::UpstreamError`].
const MAX_ERROR_BODY: usize = 512;

/// Provider API key. `Debug` never prints the value.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// HTTP client for the registration lookup provider.
#[derive(Debug, Clone)]
pub struct VehicleDataClient {
    client: Client,
    base_url: String,
    package_name: String,
    api_key: Option<ApiKey>,
}

impl VehicleDataClient {
    /// Create a client with explicit settings.
    ///
    /// Without an API key every lookup fails with
    /// [`LookupError::MissingApiKey`].
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        package_name: impl Into<String>,
        api_key: Option<ApiKey>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Connection(e.without_url().to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            package_name: package_name.into(),
            api_key,
        })
    }

    /// Create a client from configuration, reading the key from the
    /// environment.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let api_key = LookupConfig::api_key_from_env().map(ApiKey::new);
        if api_key.is_none() {
            warn!("No lookup API key configured; registration lookups are disabled");
        }
        Self::new(
            config.base_url.clone(),
            config.package_name.clone(),
            api_key,
            config.timeout(),
        )
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl RegistrationLookup for VehicleDataClient {
    fn name(&self) -> &'static str {
        "vehicledata"
    }

    async fn lookup(&self, plate: &str) -> std::result::Result<RegistrationResult, LookupError> {
        let api_key = self.api_key.as_ref().ok_or(LookupError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("packageName", self.package_name.as_str()),
                ("apikey", api_key.expose()),
                ("vrm", plate),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!(error = %e, "Vehicle lookup request failed");
                LookupError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            warn!(error = %e, "Vehicle lookup response could not be read");
            LookupError::UpstreamUnavailable(e.to_string())
        })?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Vehicle lookup returned an error status");
            return Err(LookupError::UpstreamError {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let result = parse_response(&body).inspect_err(|e| {
            warn!(error = %e, "Vehicle lookup returned an unexpected body");
        })?;
        debug!(
            make = ?result.attributes.make,
            model = ?result.attributes.model,
            "Vehicle lookup succeeded"
        );
        Ok(result)
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((index, _)) => body[..index].to_string(),
        None => body.to_string(),
    }
}

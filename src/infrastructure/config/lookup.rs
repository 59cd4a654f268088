//! Registration lookup provider configuration.
//!
//! The API key is read from the `FITMENT_LOOKUP_API_KEY` environment
//! variable at runtime and never from the config file.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "FITMENT_LOOKUP_API_KEY";

/// Registration lookup provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Provider lookup endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Data package requested from the provider.
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://uk.api.vehicledataglobal.com/r2/lookup".into()
}

fn default_package_name() -> String {
    "VehicleDetails".into()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl LookupConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// API key from the environment, if set and non-empty.
    #[must_use]
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            package_name: default_package_name(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

//! Anti-forgery token configuration.

use serde::Deserialize;

/// Environment variable holding the token signing secret.
pub const NONCE_SECRET_ENV: &str = "FITMENT_NONCE_SECRET";

/// Session and token settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Token lifetime in seconds. A token verifies for between half and
    /// the whole of this window (default: one day).
    #[serde(default = "default_nonce_lifetime_secs")]
    pub nonce_lifetime_secs: u64,
}

const fn default_nonce_lifetime_secs() -> u64 {
    86_400
}

impl SessionConfig {
    /// Signing secret from the environment, if set and non-empty.
    #[must_use]
    pub fn secret_from_env() -> Option<String> {
        std::env::var(NONCE_SECRET_ENV)
            .ok()
            .filter(|secret| !secret.trim().is_empty())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nonce_lifetime_secs: default_nonce_lifetime_secs(),
        }
    }
}

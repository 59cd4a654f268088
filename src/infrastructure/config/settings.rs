//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file; secrets (the lookup
//! API key and the token signing secret) only ever come from the
//! environment.
//!
//! # Example
//!
//! ```no_run
//! use fitment::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::lookup::LookupConfig;
use super::session::SessionConfig;
use crate::error::{ConfigError, Result};

/// Catalog import settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Directory holding the catalog CSV exports.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "fitment.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registration lookup provider settings.
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Anti-forgery token settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Catalog import settings.
    #[serde(default)]
    pub import: ImportConfig,
}

fn default_database_path() -> String {
    "fitment.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            lookup: LookupConfig::default(),
            session: SessionConfig::default(),
            import: ImportConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration from `path`, using defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.lookup.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "lookup.base_url",
            }
            .into());
        }
        if let Err(e) = url::Url::parse(&self.lookup.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "lookup.base_url",
                reason: e.to_string(),
            }
            .into());
        }
        if self.lookup.package_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "lookup.package_name",
            }
            .into());
        }
        if self.lookup.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.session.nonce_lifetime_secs < 2 {
            return Err(ConfigError::InvalidValue {
                field: "session.nonce_lifetime_secs",
                reason: "must be at least 2".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

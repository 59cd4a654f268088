//! Handler for the `config` command group.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::{Config, LookupConfig, SessionConfig};

/// Execute `config show`.
///
/// Secrets are reported only as set or not set.
pub fn execute_show(path: &Path, config: &Config) -> Result<()> {
    output::section("Effective Configuration");
    if path.exists() {
        output::field("File", path.display());
    } else {
        output::field("File", format!("{} (not found, defaults)", path.display()));
    }
    output::field("Database", &config.database);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    output::section("Lookup");
    output::field("Base URL", &config.lookup.base_url);
    output::field("Package", &config.lookup.package_name);
    output::field("Timeout", format!("{} ms", config.lookup.timeout_ms));
    output::field("API key", presence(LookupConfig::api_key_from_env().is_some()));

    output::section("Session");
    output::field(
        "Token life",
        format!("{} s", config.session.nonce_lifetime_secs),
    );
    output::field("Secret", presence(SessionConfig::secret_from_env().is_some()));

    output::section("Import");
    output::field("Data dir", config.import.data_dir.display());
    Ok(())
}

fn presence(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "not set"
    }
}

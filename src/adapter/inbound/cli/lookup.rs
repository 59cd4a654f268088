//! Handler for the `lookup` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::LookupArgs;
use crate::adapter::inbound::cli::output;
use crate::error::{FilterError, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Execute `lookup <plate>`.
pub async fn execute(config: &Config, args: &LookupArgs) -> Result<()> {
    let plate = args.plate.trim();
    if plate.is_empty() {
        return Err(FilterError::invalid("plate", "must not be empty").into());
    }

    let lookup = bootstrap::build_lookup(config)?;
    output::action("Looking up", plate);
    let result = lookup.lookup(plate).await?;

    if output::is_json() {
        output::json_output(&json!({
            "attributes": result.attributes,
            "raw": result.raw,
        }));
        return Ok(());
    }

    let attributes = &result.attributes;
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    output::section("Vehicle");
    output::field("Make", or_dash(attributes.make.clone()));
    output::field("Model", or_dash(attributes.model.clone()));
    output::field("Listing", or_dash(attributes.listing.clone()));
    output::field("Year", or_dash(attributes.year.map(|y| y.to_string())));
    output::field("Engine", or_dash(attributes.engine.clone()));

    if output::verbosity() > 0 {
        output::section("Provider Response");
        output::note(&serde_json::to_string_pretty(&result.raw)?);
    }
    Ok(())
}

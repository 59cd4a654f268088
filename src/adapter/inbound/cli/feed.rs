//! Handler for the `prepare-feed` command.

use chrono::{Datelike, Utc};

use crate::adapter::inbound::cli::command::PrepareFeedArgs;
use crate::adapter::inbound::cli::output;
use crate::application::prepare_feed;
use crate::error::Result;

/// Execute `prepare-feed <input> <out_dir>`.
pub fn execute(args: &PrepareFeedArgs) -> Result<()> {
    let current_year = args.current_year.unwrap_or_else(|| Utc::now().year());

    output::action("Preparing", &args.input.display().to_string());
    let report = prepare_feed(&args.input, &args.out_dir, current_year)?;

    output::section("Feed Prepared");
    output::field("Rows read", report.rows_read);
    output::field("Rows skipped", report.rows_skipped);
    output::field("Merged", report.duplicates_merged);
    output::field("Vehicles", report.vehicles);
    output::field("Engines", report.engines);
    output::field("Links", report.links);
    output::field("Part numbers", report.parts);

    output::section("Files");
    for file in &report.files {
        output::note(&file.display().to_string());
    }
    output::section("Next Steps");
    output::note(&format!(
        "Run: fitment import {}",
        output::muted(args.out_dir.display())
    ));
    Ok(())
}

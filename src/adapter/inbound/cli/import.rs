//! Handlers for catalog and product loading commands.

use std::path::Path;
use std::sync::Arc;

use crate::adapter::inbound::cli::command::ImportArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::{CatalogImporter, SqliteProductCatalog, SqliteVehicleCatalog};
use crate::application::CompatibilityFilter;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::port::outbound::catalog::VehicleCatalog;

/// Execute `import [dir]`.
pub fn execute_import(config: &Config, args: &ImportArgs) -> Result<()> {
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.import.data_dir.clone());
    let pool = bootstrap::open_store(config)?;

    output::action("Importing", &dir.display().to_string());
    let report = CatalogImporter::new(pool.clone()).import_directory(&dir)?;
    let totals = SqliteVehicleCatalog::new(pool).counts()?;

    output::section("Catalog Imported");
    output::field("Vehicles", report.vehicles);
    output::field("Engines", report.engines);
    output::field("Links", report.links);
    for file in &report.skipped_files {
        output::warning(&format!("{file} not found, table left empty"));
    }
    if report.skipped_rows > 0 {
        output::warning(&format!(
            "{} vehicle rows without make, model, or listing skipped ({} links)",
            report.skipped_rows, report.skipped_links
        ));
    }
    if output::verbosity() > 0 {
        output::section("Catalog Totals");
        output::field("Vehicles", totals.vehicles);
        output::field("Engines", totals.engines);
        output::field("Links", totals.links);
    }
    Ok(())
}

/// Execute `products import <csv>`.
pub fn execute_products_import(config: &Config, csv: &Path) -> Result<()> {
    let filter = product_filter(config)?;
    output::action("Importing", &csv.display().to_string());
    let count = filter.import_products(csv)?;
    output::success(&format!("Imported {} products", output::highlight(count)));
    Ok(())
}

/// Execute `tag-products <map>`.
pub fn execute_tag_products(config: &Config, map: &Path) -> Result<()> {
    let filter = product_filter(config)?;
    output::action("Tagging", &map.display().to_string());
    let report = filter.tag_from_part_map(map)?;

    output::section("Products Tagged");
    output::field("Part numbers", report.parts);
    output::field("Tags applied", report.tags_applied);
    if !report.unknown_parts.is_empty() {
        output::warning(&format!(
            "{} part numbers have no matching product",
            report.unknown_parts.len()
        ));
        if output::verbosity() > 0 {
            for part in &report.unknown_parts {
                output::note(part);
            }
        }
    }
    Ok(())
}

fn product_filter(config: &Config) -> Result<CompatibilityFilter> {
    let pool = bootstrap::open_store(config)?;
    Ok(CompatibilityFilter::new(Arc::new(SqliteProductCatalog::new(pool))))
}

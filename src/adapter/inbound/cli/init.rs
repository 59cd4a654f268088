//! Handler for the `init` command.

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::SqliteVehicleCatalog;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::port::outbound::catalog::VehicleCatalog;

/// Create the database (if needed) and apply pending migrations.
pub fn execute(config: &Config) -> Result<()> {
    let pool = bootstrap::open_store(config)?;
    let counts = SqliteVehicleCatalog::new(pool).counts()?;

    output::section("Database Ready");
    output::success("Applied migrations");
    output::field("Database", &config.database);
    output::field("Vehicles", counts.vehicles);
    output::field("Engines", counts.engines);
    output::field("Links", counts.links);

    if counts.vehicles == 0 {
        output::section("Next Steps");
        output::note(&format!(
            "1. Run: fitment import {}",
            config.import.data_dir.display()
        ));
        output::note("2. Run: fitment products import <products.csv>");
        output::note("3. Run: fitment tag-products <part_vehicle_map.csv>");
    }
    Ok(())
}

//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::sqlite::database::connection::{open_database, DbPool};
use crate::adapter::outbound::sqlite::{SqliteProductCatalog, SqliteVehicleCatalog};
use crate::adapter::outbound::vehicledata::VehicleDataClient;
use crate::application::{ActionDispatcher, CompatibilityFilter, NonceGuard, VehicleResolver};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::registration::RegistrationLookup;

/// Open the configured database and apply pending migrations.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn open_store(config: &Config) -> Result<DbPool> {
    let pool = open_database(&config.database)?;
    info!(database = %config.database, "Catalog store ready");
    Ok(pool)
}

/// Build the registration lookup client from configuration.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn build_lookup(config: &Config) -> Result<Arc<dyn RegistrationLookup>> {
    let client = VehicleDataClient::from_config(&config.lookup)?;
    Ok(Arc::new(client))
}

/// Wire the action dispatcher over an open store.
///
/// # Errors
/// Returns an error if the lookup client cannot be built.
pub fn build_dispatcher(config: &Config, pool: &DbPool) -> Result<ActionDispatcher> {
    let resolver = VehicleResolver::new(Arc::new(SqliteVehicleCatalog::new(pool.clone())));
    let compatibility = CompatibilityFilter::new(Arc::new(SqliteProductCatalog::new(pool.clone())));
    let lookup = build_lookup(config)?;
    let nonces = NonceGuard::from_config(&config.session);
    Ok(ActionDispatcher::new(resolver, compatibility, lookup, nonces))
}

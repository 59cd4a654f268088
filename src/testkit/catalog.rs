//! Seeded catalog database for tests.
//!
//! The fixture covers the common narrowing paths:
//!
//! | id | make | model  | listing   | years     | engines             |
//! |----|------|--------|-----------|-----------|---------------------|
//! | 1  | Ford | Focus  | Hatchback | 2015-2018 | TDCI, 1.0 EcoBoost  |
//! | 2  | Ford | Focus  | Hatchback | 2011-2014 | 1.6 Ti-VCT          |
//! | 3  | Ford | Focus  | Estate    | 2015-2018 | TDCI                |
//! | 4  | Ford | Fiesta | Hatchback | 2013-2017 | 1.0 EcoBoost        |
//! | 5  | Audi | A3     | Sportback | 2012-2020 | 2.0 TDI             |
//! | 6  | Audi | A3     | Sportback | 2016-2020 | 2.0 TDI             |
//!
//! Vehicles 5 and 6 both match `Audi/A3/Sportback/2017/2.0 TDI`.

use std::fs;
use std::path::Path;

use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::{open_database, DbPool, MEMORY_DATABASE};
use crate::adapter::outbound::sqlite::database::model::{EngineRow, VehicleEngineRow, VehicleRow};
use crate::adapter::outbound::sqlite::database::schema::{engine, vehicle_base, vehicle_engine};
use crate::adapter::outbound::sqlite::SqliteVehicleCatalog;

/// Vehicle rows of the fixture as `(id, make, model, listing, from, to)`.
pub const VEHICLES: &[(i64, &str, &str, &str, f64, f64)] = &[
    (1, "Ford", "Focus", "Hatchback", 2015.0, 2018.0),
    (2, "Ford", "Focus", "Hatchback", 2011.0, 2014.0),
    (3, "Ford", "Focus", "Estate", 2015.0, 2018.0),
    (4, "Ford", "Fiesta", "Hatchback", 2013.0, 2017.0),
    (5, "Audi", "A3", "Sportback", 2012.0, 2020.0),
    (6, "Audi", "A3", "Sportback", 2016.0, 2020.0),
];

/// Engine rows of the fixture as `(id, code)`.
pub const ENGINES: &[(i64, &str)] = &[
    (10, "TDCI"),
    (11, "1.0 EcoBoost"),
    (12, "1.6 Ti-VCT"),
    (13, "2.0 TDI"),
];

/// Vehicle/engine links of the fixture.
pub const LINKS: &[(i64, i64)] = &[(1, 10), (1, 11), (2, 12), (3, 10), (4, 11), (5, 13), (6, 13)];

/// In-memory database with migrations applied and the fixture loaded.
///
/// # Panics
/// Panics if the database cannot be created or seeded.
#[must_use]
pub fn seeded_pool() -> DbPool {
    let pool = open_database(MEMORY_DATABASE).expect("open in-memory database");
    seed(&pool);
    pool
}

/// Catalog adapter over [`seeded_pool`].
#[must_use]
pub fn seeded_catalog() -> SqliteVehicleCatalog {
    SqliteVehicleCatalog::new(seeded_pool())
}

/// Load the fixture into an existing database.
///
/// # Panics
/// Panics if any insert fails.
pub fn seed(pool: &DbPool) {
    let mut conn = pool.get().expect("pooled connection");

    let vehicles: Vec<VehicleRow> = VEHICLES
        .iter()
        .map(|&(vehicle_id, make, model, listing, year_from, year_to)| VehicleRow {
            vehicle_id,
            make: make.to_string(),
            model: model.to_string(),
            listing: listing.to_string(),
            year_from,
            year_to,
        })
        .collect();
    let engines: Vec<EngineRow> = ENGINES
        .iter()
        .map(|&(engine_id, code)| EngineRow {
            engine_id,
            engine_code: code.to_string(),
        })
        .collect();
    let links: Vec<VehicleEngineRow> = LINKS
        .iter()
        .map(|&(vehicle_id, engine_id)| VehicleEngineRow {
            vehicle_id,
            engine_id,
        })
        .collect();

    diesel::insert_into(vehicle_base::table)
        .values(&vehicles)
        .execute(&mut conn)
        .expect("seed vehicles");
    diesel::insert_into(engine::table)
        .values(&engines)
        .execute(&mut conn)
        .expect("seed engines");
    diesel::insert_into(vehicle_engine::table)
        .values(&links)
        .execute(&mut conn)
        .expect("seed links");
}

/// Write the fixture as the three import CSV files into `dir`.
///
/// # Panics
/// Panics if a file cannot be written.
pub fn write_fixture_csv(dir: &Path) {
    let mut vehicles = String::from("vehicle_id,make,model,listing,year_from,year_to\n");
    for (id, make, model, listing, from, to) in VEHICLES {
        vehicles.push_str(&format!("{id},{make},{model},{listing},{from:.1},{to:.1}\n"));
    }
    let mut engines = String::from("engine_id,engine_code\n");
    for (id, code) in ENGINES {
        engines.push_str(&format!("{id},{code}\n"));
    }
    let mut links = String::from("vehicle_id,engine_id\n");
    for (vehicle_id, engine_id) in LINKS {
        links.push_str(&format!("{vehicle_id},{engine_id}\n"));
    }

    fs::write(dir.join("vehicle_base.csv"), vehicles).expect("write vehicle_base.csv");
    fs::write(dir.join("engine_table.csv"), engines).expect("write engine_table.csv");
    fs::write(dir.join("vehicle_engine.csv"), links).expect("write vehicle_engine.csv");
}

//! SQLite vehicle catalog.
//!
//! Serves the narrowing queries of the cascading filter from the
//! `vehicle_base`, `engine`, and `vehicle_engine` tables.

use std::collections::BTreeSet;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::schema::{engine, vehicle_base, vehicle_engine};
use crate::domain::{VehicleId, YearRange};
use crate::error::{Error, Result};
use crate::port::outbound::catalog::{CatalogCounts, VehicleCatalog};

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed vehicle catalog.
#[derive(Clone)]
pub struct SqliteVehicleCatalog {
    pool: DbPool,
}

impl SqliteVehicleCatalog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<Conn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }
}

impl VehicleCatalog for SqliteVehicleCatalog {
    fn distinct_makes(&self) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        let makes = vehicle_base::table
            .select(vehicle_base::make)
            .distinct()
            .order(vehicle_base::make.asc())
            .load(&mut conn)?;
        Ok(makes)
    }

    fn distinct_models(&self, make: &str) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        let models = vehicle_base::table
            .filter(vehicle_base::make.eq(make))
            .select(vehicle_base::model)
            .distinct()
            .order(vehicle_base::model.asc())
            .load(&mut conn)?;
        Ok(models)
    }

    fn distinct_listings(&self, make: &str, model: &str) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        let listings = vehicle_base::table
            .filter(vehicle_base::make.eq(make))
            .filter(vehicle_base::model.eq(model))
            .select(vehicle_base::listing)
            .distinct()
            .order(vehicle_base::listing.asc())
            .load(&mut conn)?;
        Ok(listings)
    }

    fn year_ranges(&self, make: &str, model: &str, listing: &str) -> Result<Vec<YearRange>> {
        let mut conn = self.conn()?;
        let rows: Vec<(f64, f64)> = vehicle_base::table
            .filter(vehicle_base::make.eq(make))
            .filter(vehicle_base::model.eq(model))
            .filter(vehicle_base::listing.eq(listing))
            .select((vehicle_base::year_from, vehicle_base::year_to))
            .order(vehicle_base::vehicle_id.asc())
            .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(from, to)| YearRange::from_stored(from, to))
            .collect())
    }

    fn vehicle_ids(
        &self,
        make: &str,
        model: &str,
        listing: &str,
        year: i32,
    ) -> Result<BTreeSet<VehicleId>> {
        let mut conn = self.conn()?;
        let year = f64::from(year);
        let ids: Vec<i64> = vehicle_base::table
            .filter(vehicle_base::make.eq(make))
            .filter(vehicle_base::model.eq(model))
            .filter(vehicle_base::listing.eq(listing))
            .filter(vehicle_base::year_from.le(year))
            .filter(vehicle_base::year_to.ge(year))
            .select(vehicle_base::vehicle_id)
            .load(&mut conn)?;
        Ok(ids.into_iter().map(VehicleId::new).collect())
    }

    fn engine_codes_for(&self, vehicle_ids: &BTreeSet<VehicleId>) -> Result<Vec<String>> {
        if vehicle_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = vehicle_ids.iter().map(|id| id.value()).collect();
        let mut conn = self.conn()?;
        let codes = vehicle_engine::table
            .inner_join(engine::table)
            .filter(vehicle_engine::vehicle_id.eq_any(ids))
            .select(engine::engine_code)
            .distinct()
            .order(engine::engine_code.asc())
            .load(&mut conn)?;
        Ok(codes)
    }

    fn resolve_vehicle_id(
        &self,
        make: &str,
        model: &str,
        listing: &str,
        year: i32,
        engine_code: &str,
    ) -> Result<Option<VehicleId>> {
        let mut conn = self.conn()?;
        let year = f64::from(year);
        let id: Option<i64> = vehicle_base::table
            .inner_join(vehicle_engine::table.inner_join(engine::table))
            .filter(vehicle_base::make.eq(make))
            .filter(vehicle_base::model.eq(model))
            .filter(vehicle_base::listing.eq(listing))
            .filter(vehicle_base::year_from.le(year))
            .filter(vehicle_base::year_to.ge(year))
            .filter(engine::engine_code.eq(engine_code))
            .select(vehicle_base::vehicle_id)
            .order(vehicle_base::vehicle_id.asc())
            .first(&mut conn)
            .optional()?;
        Ok(id.map(VehicleId::new))
    }

    fn counts(&self) -> Result<CatalogCounts> {
        let mut conn = self.conn()?;
        Ok(CatalogCounts {
            vehicles: vehicle_base::table.count().get_result(&mut conn)?,
            engines: engine::table.count().get_result(&mut conn)?,
            links: vehicle_engine::table.count().get_result(&mut conn)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{open_database, MEMORY_DATABASE};
    use crate::adapter::outbound::sqlite::database::model::{EngineRow, VehicleEngineRow, VehicleRow};

    fn vehicle(id: i64, make: &str, model: &str, listing: &str, from: f64, to: f64) -> VehicleRow {
        VehicleRow {
            vehicle_id: id,
            make: make.into(),
            model: model.into(),
            listing: listing.into(),
            year_from: from,
            year_to: to,
        }
    }

    fn seeded() -> SqliteVehicleCatalog {
        let pool = open_database(MEMORY_DATABASE).unwrap();
        let mut conn = pool.get().unwrap();

        diesel::insert_into(vehicle_base::table)
            .values(&vec![
                vehicle(10, "Ford", "Focus", "Hatchback", 2011.0, 2014.0),
                vehicle(11, "Ford", "Focus", "Hatchback", 2015.0, 2018.0),
                vehicle(12, "Ford", "Focus", "Estate", 2015.0, 2018.0),
                vehicle(13, "Ford", "Fiesta", "Hatchback", 2013.0, 2017.0),
                vehicle(20, "Audi", "A3", "Sportback", 2012.0, 2020.0),
                vehicle(21, "Audi", "A3", "Sportback", 2016.0, 2020.0),
            ])
            .execute(&mut conn)
            .unwrap();
        diesel::insert_into(engine::table)
            .values(&vec![
                EngineRow {
                    engine_id: 1,
                    engine_code: "1.6 TDCi".into(),
                },
                EngineRow {
                    engine_id: 2,
                    engine_code: "1.0 EcoBoost".into(),
                },
                EngineRow {
                    engine_id: 3,
                    engine_code: "2.0 TDI".into(),
                },
            ])
            .execute(&mut conn)
            .unwrap();
        let links = [(10, 1), (11, 1), (11, 2), (12, 2), (13, 2), (20, 3), (21, 3)]
            .into_iter()
            .map(|(vehicle_id, engine_id)| VehicleEngineRow {
                vehicle_id,
                engine_id,
            })
            .collect::<Vec<_>>();
        diesel::insert_into(vehicle_engine::table)
            .values(&links)
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        SqliteVehicleCatalog::new(pool)
    }

    #[test]
    fn makes_are_distinct_and_sorted() {
        let catalog = seeded();
        assert_eq!(catalog.distinct_makes().unwrap(), vec!["Audi", "Ford"]);
    }

    #[test]
    fn models_and_listings_narrow_by_parent() {
        let catalog = seeded();
        assert_eq!(catalog.distinct_models("Ford").unwrap(), vec!["Fiesta", "Focus"]);
        assert_eq!(
            catalog.distinct_listings("Ford", "Focus").unwrap(),
            vec!["Estate", "Hatchback"]
        );
    }

    #[test]
    fn unknown_values_yield_empty_results() {
        let catalog = seeded();
        assert!(catalog.distinct_models("Lada").unwrap().is_empty());
        assert!(catalog.distinct_listings("Ford", "Mondeo").unwrap().is_empty());
        assert!(catalog.year_ranges("Ford", "Focus", "Coupe").unwrap().is_empty());
    }

    #[test]
    fn year_ranges_cover_every_matching_record() {
        let catalog = seeded();
        assert_eq!(
            catalog.year_ranges("Ford", "Focus", "Hatchback").unwrap(),
            vec![YearRange::new(2011, 2014), YearRange::new(2015, 2018)]
        );
    }

    #[test]
    fn vehicle_ids_respect_inclusive_bounds() {
        let catalog = seeded();
        let ids = catalog.vehicle_ids("Ford", "Focus", "Hatchback", 2015).unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![VehicleId::new(11)]);

        let ids = catalog.vehicle_ids("Audi", "A3", "Sportback", 2016).unwrap();
        assert_eq!(ids.len(), 2);

        assert!(catalog.vehicle_ids("Ford", "Focus", "Hatchback", 2019).unwrap().is_empty());
    }

    #[test]
    fn engine_codes_union_linked_engines() {
        let catalog = seeded();
        let ids = BTreeSet::from([VehicleId::new(10), VehicleId::new(11)]);
        assert_eq!(
            catalog.engine_codes_for(&ids).unwrap(),
            vec!["1.0 EcoBoost", "1.6 TDCi"]
        );
        assert!(catalog.engine_codes_for(&BTreeSet::new()).unwrap().is_empty());
    }

    #[test]
    fn resolve_joins_all_five_criteria() {
        let catalog = seeded();
        assert_eq!(
            catalog
                .resolve_vehicle_id("Ford", "Focus", "Hatchback", 2016, "1.0 EcoBoost")
                .unwrap(),
            Some(VehicleId::new(11))
        );
        assert_eq!(
            catalog
                .resolve_vehicle_id("Ford", "Focus", "Hatchback", 2012, "1.0 EcoBoost")
                .unwrap(),
            None
        );
    }

    #[test]
    fn resolve_prefers_smallest_vehicle_id() {
        let catalog = seeded();
        assert_eq!(
            catalog
                .resolve_vehicle_id("Audi", "A3", "Sportback", 2017, "2.0 TDI")
                .unwrap(),
            Some(VehicleId::new(20))
        );
    }

    #[test]
    fn counts_report_each_table() {
        let catalog = seeded();
        assert_eq!(
            catalog.counts().unwrap(),
            CatalogCounts {
                vehicles: 6,
                engines: 3,
                links: 7
            }
        );
    }
}

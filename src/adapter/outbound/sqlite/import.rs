//! Bulk catalog import from CSV exports.
//!
//! Loads `vehicle_base.csv`, `engine_table.csv`, and `vehicle_engine.csv`
//! from a directory. An import resets the catalog: all three tables are
//! cleared and reloaded in one transaction, so a failed import leaves the
//! previous catalog untouched.

use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{EngineRow, VehicleEngineRow, VehicleRow};
use crate::adapter::outbound::sqlite::database::schema::{engine, vehicle_base, vehicle_engine};
use crate::domain::error::DomainError;
use crate::domain::{EngineId, EngineRecord, VehicleEngineLink, VehicleId, VehicleRecord};
use crate::error::{Error, FilterError, Result};

pub const VEHICLE_FILE: &str = "vehicle_base.csv";
pub const ENGINE_FILE: &str = "engine_table.csv";
pub const LINK_FILE: &str = "vehicle_engine.csv";

/// Rows written per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub vehicles: usize,
    pub engines: usize,
    pub links: usize,
    /// Vehicle rows without a make, model, or listing.
    pub skipped_rows: usize,
    /// Links pointing at a skipped vehicle row.
    pub skipped_links: usize,
    /// Expected files that were not present.
    pub skipped_files: Vec<String>,
}

/// One CSV row with its file name and line number for error reporting.
struct Row<'a> {
    file: &'a str,
    line: u64,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    fn invalid(&self, field: &str, reason: impl std::fmt::Display) -> Error {
        Error::Filter(FilterError::invalid(
            field,
            format!("{} line {}: {reason}", self.file, self.line),
        ))
    }

    fn text(&self, index: usize, field: &str) -> Result<String> {
        self.record
            .get(index)
            .map(|value| value.trim().to_string())
            .ok_or_else(|| self.invalid(field, "missing column"))
    }

    fn integer(&self, index: usize, field: &str) -> Result<i64> {
        let value = self.text(index, field)?;
        value
            .parse::<i64>()
            .map_err(|_| self.invalid(field, format!("`{value}` is not a whole number")))
    }

    fn number(&self, index: usize, field: &str) -> Result<f64> {
        let value = self.text(index, field)?;
        value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.invalid(field, format!("`{value}` is not a number")))
    }

    /// A number, or `default` when the column is absent or blank.
    fn number_or(&self, index: usize, field: &str, default: f64) -> Result<f64> {
        match self.record.get(index).map(str::trim) {
            None | Some("") => Ok(default),
            Some(_) => self.number(index, field),
        }
    }
}

/// Rows parsed from the export files, ready to be written.
#[derive(Default)]
struct Parsed {
    vehicles: Vec<VehicleRow>,
    engines: Vec<EngineRow>,
    links: Vec<(u64, VehicleEngineRow)>,
}

/// Loads catalog CSV exports into the SQLite store.
pub struct CatalogImporter {
    pool: DbPool,
    current_year: i32,
}

impl CatalogImporter {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            current_year: Utc::now().year(),
        }
    }

    /// Year used to close vehicle ranges with an empty `year_to`.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Replace the catalog with the files found in `dir`.
    ///
    /// Every file is parsed and validated before anything is written. The
    /// three tables are then cleared and reloaded in a single transaction;
    /// a missing file leaves its table empty. Vehicle rows with a blank
    /// make, model, or listing are skipped along with their links, and an
    /// empty `year_to` means the range is still open (current year).
    ///
    /// # Errors
    /// Returns [`Error::Filter`] with an invalid-argument error naming the
    /// file and line for malformed rows, implausible or inverted year
    /// ranges, and links to unknown vehicles or engines; database and CSV
    /// errors otherwise.
    pub fn import_directory(&self, dir: &Path) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let mut parsed = Parsed::default();
        let mut skipped_vehicles = HashSet::new();

        match read_rows(&dir.join(VEHICLE_FILE))? {
            Some(records) => {
                parsed.vehicles =
                    self.parse_vehicles(&records, &mut skipped_vehicles, &mut report)?;
            }
            None => skip(&mut report, VEHICLE_FILE),
        }
        match read_rows(&dir.join(ENGINE_FILE))? {
            Some(records) => parsed.engines = parse_engines(&records)?,
            None => skip(&mut report, ENGINE_FILE),
        }
        match read_rows(&dir.join(LINK_FILE))? {
            Some(records) => {
                parsed.links = parse_links(&records, &skipped_vehicles, &mut report)?;
            }
            None => skip(&mut report, LINK_FILE),
        }

        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        conn.transaction::<_, Error, _>(|conn| {
            let cleared = diesel::delete(vehicle_engine::table).execute(conn)?
                + diesel::delete(vehicle_base::table).execute(conn)?
                + diesel::delete(engine::table).execute(conn)?;
            debug!(rows = cleared, "Cleared previous catalog");

            report.vehicles = write_vehicles(conn, &parsed.vehicles)?;
            report.engines = write_engines(conn, &parsed.engines)?;
            report.links = write_links(conn, &parsed.links)?;
            Ok(())
        })?;

        info!(
            vehicles = report.vehicles,
            engines = report.engines,
            links = report.links,
            skipped_rows = report.skipped_rows,
            skipped_links = report.skipped_links,
            skipped_files = report.skipped_files.len(),
            "Catalog import complete"
        );
        Ok(report)
    }

    fn parse_vehicles(
        &self,
        records: &[(u64, csv::StringRecord)],
        skipped: &mut HashSet<i64>,
        report: &mut ImportReport,
    ) -> Result<Vec<VehicleRow>> {
        let mut rows = Vec::with_capacity(records.len());
        for (line, record) in records {
            let row = Row {
                file: VEHICLE_FILE,
                line: *line,
                record,
            };
            let vehicle_id = row.integer(0, "vehicle_id")?;
            let make = row.text(1, "make")?;
            let model = row.text(2, "model")?;
            let listing = row.text(3, "listing")?;
            if make.is_empty() || model.is_empty() || listing.is_empty() {
                warn!(
                    file = VEHICLE_FILE,
                    line = *line,
                    vehicle_id,
                    "Vehicle row has blank text, skipping"
                );
                skipped.insert(vehicle_id);
                report.skipped_rows += 1;
                continue;
            }

            let vehicle = VehicleRecord::try_new(
                VehicleId::new(vehicle_id),
                make,
                model,
                listing,
                row.number(4, "year_from")?,
                row.number_or(5, "year_to", f64::from(self.current_year))?,
            )
            .map_err(|e| row.invalid(vehicle_field(&e), e))?;
            rows.push(VehicleRow::from(&vehicle));
        }
        Ok(rows)
    }
}

fn vehicle_field(err: &DomainError) -> &'static str {
    match err {
        DomainError::InvertedYearRange { .. } => "year_from",
        other => other.field(),
    }
}

fn parse_engines(records: &[(u64, csv::StringRecord)]) -> Result<Vec<EngineRow>> {
    records
        .iter()
        .map(|(line, record)| {
            let row = Row {
                file: ENGINE_FILE,
                line: *line,
                record,
            };
            let engine = EngineRecord::try_new(
                EngineId::new(row.integer(0, "engine_id")?),
                row.text(1, "engine_code")?,
            )
            .map_err(|e| row.invalid("engine_code", e))?;
            Ok(EngineRow::from(&engine))
        })
        .collect()
}

fn parse_links(
    records: &[(u64, csv::StringRecord)],
    skipped_vehicles: &HashSet<i64>,
    report: &mut ImportReport,
) -> Result<Vec<(u64, VehicleEngineRow)>> {
    let mut rows = Vec::with_capacity(records.len());
    for (line, record) in records {
        let row = Row {
            file: LINK_FILE,
            line: *line,
            record,
        };
        let link = VehicleEngineLink {
            vehicle_id: VehicleId::new(row.integer(0, "vehicle_id")?),
            engine_id: EngineId::new(row.integer(1, "engine_id")?),
        };
        if skipped_vehicles.contains(&link.vehicle_id.value()) {
            report.skipped_links += 1;
            continue;
        }
        rows.push((*line, VehicleEngineRow::from(&link)));
    }
    Ok(rows)
}

fn write_vehicles(conn: &mut SqliteConnection, rows: &[VehicleRow]) -> Result<usize> {
    for row in rows {
        diesel::insert_into(vehicle_base::table)
            .values(row)
            .on_conflict(vehicle_base::vehicle_id)
            .do_update()
            .set(row)
            .execute(conn)?;
    }
    debug!(rows = rows.len(), file = VEHICLE_FILE, "Imported vehicles");
    Ok(rows.len())
}

fn write_engines(conn: &mut SqliteConnection, rows: &[EngineRow]) -> Result<usize> {
    for row in rows {
        diesel::insert_into(engine::table)
            .values(row)
            .on_conflict(engine::engine_id)
            .do_update()
            .set(row)
            .execute(conn)?;
    }
    debug!(rows = rows.len(), file = ENGINE_FILE, "Imported engines");
    Ok(rows.len())
}

fn write_links(conn: &mut SqliteConnection, rows: &[(u64, VehicleEngineRow)]) -> Result<usize> {
    for (line, row) in rows {
        let inserted = diesel::insert_or_ignore_into(vehicle_engine::table)
            .values(row)
            .execute(conn);
        match inserted {
            Ok(_) => {}
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                return Err(Error::Filter(FilterError::invalid(
                    "vehicle_engine",
                    format!(
                        "{LINK_FILE} line {line}: vehicle {} or engine {} does not exist",
                        row.vehicle_id, row.engine_id
                    ),
                )));
            }
            Err(e) => return Err(e.into()),
        }
    }
    debug!(rows = rows.len(), file = LINK_FILE, "Imported links");
    Ok(rows.len())
}

fn skip(report: &mut ImportReport, file: &str) {
    warn!(file = %file, "Catalog file not found, skipping");
    report.skipped_files.push(file.to_string());
}

/// Read every data row of a CSV file with its 1-based line number.
///
/// Returns `None` when the file does not exist.
fn read_rows(path: &Path) -> Result<Option<Vec<(u64, csv::StringRecord)>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map_or(index as u64 + 2, csv::Position::line);
        rows.push((line, record));
    }
    Ok(Some(rows))
}

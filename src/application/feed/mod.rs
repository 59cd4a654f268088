//! Supplier feed preparation.
//!
//! Turns a raw supplier export (one row per vehicle fitment of a part) into
//! the catalog import files and a part-number map. Rows describing the same
//! vehicle are merged onto the first vehicle id seen for them.

pub mod parse;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, FilterError, Result};
use parse::{collapse_whitespace, decode, normalize_text, parse_vehicle_id, parse_year_range, split_engines};

/// Column positions in the supplier export.
mod column {
    pub const VEHICLE_ID: usize = 0;
    pub const BRAND: usize = 2;
    pub const MODEL: usize = 3;
    pub const LISTING: usize = 4;
    pub const DATE_RANGE: usize = 5;
    pub const ENGINES: usize = 7;
    pub const PART_NUMBER: usize = 10;
}

pub const PART_MAP_FILE: &str = "part_vehicle_map.csv";

/// Summary of a feed preparation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub duplicates_merged: usize,
    pub vehicles: usize,
    pub engines: usize,
    pub links: usize,
    pub parts: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VehicleDraft {
    make: String,
    model: String,
    listing: String,
    year_from: i32,
    year_to: i32,
}

impl VehicleDraft {
    fn absorb(&mut self, other: &VehicleDraft) {
        for (mine, theirs) in [
            (&mut self.make, &other.make),
            (&mut self.model, &other.model),
            (&mut self.listing, &other.listing),
        ] {
            if mine.is_empty() && !theirs.is_empty() {
                mine.clone_from(theirs);
            }
        }
        self.year_from = self.year_from.min(other.year_from);
        self.year_to = self.year_to.max(other.year_to);
    }
}

type Signature = (String, String, String, i32, i32);

/// Tables accumulated from supplier rows.
#[derive(Debug, Default)]
pub struct FeedTables {
    current_year: i32,
    vehicles: BTreeMap<i64, VehicleDraft>,
    signatures: HashMap<Signature, i64>,
    engine_ids: HashMap<String, i64>,
    engine_codes: Vec<String>,
    links: BTreeMap<i64, BTreeSet<i64>>,
    parts: BTreeMap<String, BTreeSet<i64>>,
    rows_read: usize,
    rows_skipped: usize,
    duplicates_merged: usize,
}

impl FeedTables {
    /// Empty tables; open-ended date ranges run to `current_year`.
    #[must_use]
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            ..Self::default()
        }
    }

    /// Fold one supplier row into the tables.
    pub fn add_row(&mut self, record: &csv::StringRecord) {
        self.rows_read += 1;
        let field = |index: usize| record.get(index).map(str::trim).unwrap_or_default();

        let Some(raw_id) = parse_vehicle_id(field(column::VEHICLE_ID)) else {
            self.rows_skipped += 1;
            return;
        };

        let (year_from, year_to) = parse_year_range(field(column::DATE_RANGE), self.current_year);
        let draft = VehicleDraft {
            make: field(column::BRAND).to_string(),
            model: field(column::MODEL).to_string(),
            listing: field(column::LISTING).to_string(),
            year_from,
            year_to,
        };
        let signature = (
            normalize_text(&draft.make),
            normalize_text(&draft.model),
            normalize_text(&draft.listing),
            year_from,
            year_to,
        );
        let vehicle_id = *self.signatures.entry(signature).or_insert(raw_id);
        if vehicle_id != raw_id {
            self.duplicates_merged += 1;
        }

        match self.vehicles.get_mut(&vehicle_id) {
            Some(existing) => existing.absorb(&draft),
            None => {
                self.vehicles.insert(vehicle_id, draft);
            }
        }

        for engine in split_engines(field(column::ENGINES)) {
            let engine_id = self.engine_id(engine);
            self.links.entry(vehicle_id).or_default().insert(engine_id);
        }

        let part_number = field(column::PART_NUMBER);
        if !part_number.is_empty() {
            self.parts
                .entry(part_number.to_string())
                .or_default()
                .insert(vehicle_id);
        }
    }

    /// Identifier for an engine code, assigned in first-seen order of the
    /// case-insensitive code. The first spelling seen is kept.
    fn engine_id(&mut self, code: String) -> i64 {
        let key = code.to_lowercase();
        if let Some(id) = self.engine_ids.get(&key) {
            return *id;
        }
        self.engine_codes.push(code);
        let id = i64::try_from(self.engine_codes.len()).unwrap_or(i64::MAX);
        self.engine_ids.insert(key, id);
        id
    }

    /// Write the four output files into `out_dir`.
    ///
    /// # Errors
    /// Returns an error if the directory or a file cannot be written.
    pub fn write(&self, out_dir: &Path) -> Result<FeedReport> {
        fs::create_dir_all(out_dir)?;
        let mut files = Vec::new();

        let path = out_dir.join("vehicle_base.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["vehicle_id", "make", "model", "listing", "year_from", "year_to"])?;
        for (id, v) in &self.vehicles {
            writer.write_record([
                id.to_string(),
                v.make.clone(),
                v.model.clone(),
                v.listing.clone(),
                format!("{:.1}", f64::from(v.year_from)),
                format!("{:.1}", f64::from(v.year_to)),
            ])?;
        }
        writer.flush()?;
        files.push(path);

        let path = out_dir.join("engine_table.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["engine_id", "engine_code"])?;
        for (index, code) in self.engine_codes.iter().enumerate() {
            writer.write_record([(index + 1).to_string(), code.clone()])?;
        }
        writer.flush()?;
        files.push(path);

        let path = out_dir.join("vehicle_engine.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["vehicle_id", "engine_id"])?;
        let mut links = 0;
        for (vehicle_id, engine_ids) in &self.links {
            for engine_id in engine_ids {
                writer.write_record([vehicle_id.to_string(), engine_id.to_string()])?;
                links += 1;
            }
        }
        writer.flush()?;
        files.push(path);

        let path = out_dir.join(PART_MAP_FILE);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["part_number", "vehicle_ids"])?;
        for (part_number, vehicle_ids) in &self.parts {
            let ids = vehicle_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writer.write_record([part_number.as_str(), ids.as_str()])?;
        }
        writer.flush()?;
        files.push(path);

        for file in &files {
            debug!(file = %file.display(), "Wrote feed table");
        }

        Ok(FeedReport {
            rows_read: self.rows_read,
            rows_skipped: self.rows_skipped,
            duplicates_merged: self.duplicates_merged,
            vehicles: self.vehicles.len(),
            engines: self.engine_codes.len(),
            links,
            parts: self.parts.len(),
            files,
        })
    }
}

/// Prepare catalog import files from a supplier export.
///
/// # Errors
/// Returns an invalid-argument error for an empty input file; IO and CSV
/// errors otherwise.
pub fn prepare_feed(input: &Path, out_dir: &Path, current_year: i32) -> Result<FeedReport> {
    let text = decode(&fs::read(input)?);
    if text.trim().is_empty() {
        return Err(Error::Filter(FilterError::invalid(
            "input",
            format!("{} is empty", input.display()),
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut tables = FeedTables::new(current_year);
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|f| collapse_whitespace(f).is_empty()) {
            continue;
        }
        tables.add_row(&record);
    }

    let report = tables.write(out_dir)?;
    info!(
        rows = report.rows_read,
        skipped = report.rows_skipped,
        merged = report.duplicates_merged,
        vehicles = report.vehicles,
        engines = report.engines,
        links = report.links,
        parts = report.parts,
        "Prepared supplier feed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,sku,brand,model,listing,dates,notes,engines,fuel,type,part\n";

    fn run(body: &str) -> (tempfile::TempDir, FeedReport) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feed.csv");
        fs::write(&input, format!("{HEADER}{body}")).unwrap();
        let report = prepare_feed(&input, &dir.path().join("out"), 2026).unwrap();
        (dir, report)
    }

    fn read(dir: &tempfile::TempDir, name: &str) -> String {
        fs::read_to_string(dir.path().join("out").join(name)).unwrap()
    }

    #[test]
    fn writes_tables_with_float_years() {
        let (dir, report) = run("1,x,Ford,Focus,Hatchback,2015-2018,,1.6 TDCi / 1.0 EcoBoost,,,OF-100\n");
        assert_eq!(report.vehicles, 1);
        assert_eq!(report.engines, 2);
        assert_eq!(
            read(&dir, "vehicle_base.csv"),
            "vehicle_id,make,model,listing,year_from,year_to\n1,Ford,Focus,Hatchback,2015.0,2018.0\n"
        );
        assert_eq!(
            read(&dir, "engine_table.csv"),
            "engine_id,engine_code\n1,1.6 TDCi\n2,1.0 EcoBoost\n"
        );
        assert_eq!(read(&dir, "vehicle_engine.csv"), "vehicle_id,engine_id\n1,1\n1,2\n");
        assert_eq!(read(&dir, PART_MAP_FILE), "part_number,vehicle_ids\nOF-100,1\n");
    }

    #[test]
    fn duplicate_signature_maps_to_first_vehicle_id() {
        let (dir, report) = run(
            "5,x,Ford,Focus,Hatchback,2015-2018,,1.6 TDCi,,,OF-100\n\
             9,x,ford , focus,HATCHBACK,2015 to 2018,,1.0 EcoBoost,,,BP-200\n\
             7,x,Ford,Fiesta,Hatchback,2013-2017,,1.0 ecoboost,,,BP-200\n",
        );
        assert_eq!(report.duplicates_merged, 1);
        assert_eq!(report.vehicles, 2);
        assert_eq!(
            read(&dir, "engine_table.csv"),
            "engine_id,engine_code\n1,1.6 TDCi\n2,1.0 EcoBoost\n"
        );
        assert_eq!(
            read(&dir, "vehicle_engine.csv"),
            "vehicle_id,engine_id\n5,1\n5,2\n7,2\n"
        );
        assert_eq!(
            read(&dir, PART_MAP_FILE),
            "part_number,vehicle_ids\nBP-200,\"5, 7\"\nOF-100,5\n"
        );
    }

    #[test]
    fn reused_id_fills_gaps_and_widens_years() {
        let (dir, _) = run(
            "3,x,Ford,,Hatchback,2015-2016,,,,,\n\
             3,x,Ford,Focus,Hatchback,2014-2018,,,,,\n",
        );
        assert_eq!(
            read(&dir, "vehicle_base.csv"),
            "vehicle_id,make,model,listing,year_from,year_to\n3,Ford,Focus,Hatchback,2014.0,2018.0\n"
        );
    }

    #[test]
    fn rows_without_numeric_id_are_skipped() {
        let (_, report) = run(
            ",x,Ford,Focus,Hatchback,2015,,,,,\n\
             abc,x,Ford,Focus,Hatchback,2015,,,,,\n\
             4.0,x,Ford,Focus,Hatchback,2015,,,,,\n",
        );
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(report.vehicles, 1);
    }

    #[test]
    fn open_ended_range_runs_to_current_year() {
        let (dir, _) = run("1,x,Ford,Kuga,SUV,2020 onwards,,,,,\n");
        assert!(read(&dir, "vehicle_base.csv").contains("1,Ford,Kuga,SUV,2020.0,2026.0"));
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feed.csv");
        fs::write(&input, "").unwrap();
        let err = prepare_feed(&input, dir.path(), 2026).unwrap_err();
        assert!(matches!(err, Error::Filter(FilterError::InvalidArgument { .. })));
    }
}

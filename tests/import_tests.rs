//! Catalog import and supplier feed preparation against a file database.

use std::fs;
use std::sync::Arc;

use fitment::adapter::outbound::sqlite::database::open_database;
use fitment::adapter::outbound::sqlite::{CatalogImporter, SqliteProductCatalog, SqliteVehicleCatalog};
use fitment::application::{prepare_feed, CompatibilityFilter, VehicleResolver};
use fitment::domain::{FilterCriteria, VehicleId};
use fitment::error::{Error, FilterError};
use fitment::port::outbound::catalog::{CatalogCounts, VehicleCatalog};
use fitment::testkit::catalog::write_fixture_csv;

const FEED: &str = "\
ID,SKU,Brand,Model,Listing,Dates,Notes,Engines,Fuel,Type,Part Number
1,x,Ford,Focus,Hatchback,2015 - 2018,,1.6 TDCi / 1.0 EcoBoost,Diesel,Car,OF-100
2,x,ford,FOCUS,hatchback,2015-2018,,1.6 TDCi,Diesel,Car,BP-200
3,x,Ford,Focus,Estate,2015 - 2018,,1.6 TDCi,Diesel,Car,BP-200
4,x,Audi,A3,Sportback,2016 onwards,,2.0 TDI,Diesel,Car,TB-400
,x,Audi,A3,Sportback,2016,,2.0 TDI,Diesel,Car,TB-400
";

#[test]
fn fixture_files_import_into_file_database() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_csv(dir.path());
    let db = dir.path().join("fitment.db");
    let pool = open_database(db.to_str().unwrap()).unwrap();

    let report = CatalogImporter::new(pool.clone())
        .import_directory(dir.path())
        .unwrap();
    assert_eq!((report.vehicles, report.engines, report.links), (6, 4, 7));
    assert!(report.skipped_files.is_empty());

    let catalog = SqliteVehicleCatalog::new(pool);
    assert_eq!(
        catalog.counts().unwrap(),
        CatalogCounts {
            vehicles: 6,
            engines: 4,
            links: 7,
        }
    );
}

#[test]
fn reopened_database_keeps_imported_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_csv(dir.path());
    let db = dir.path().join("fitment.db");
    let url = db.to_str().unwrap().to_string();

    {
        let pool = open_database(&url).unwrap();
        CatalogImporter::new(pool).import_directory(dir.path()).unwrap();
    }

    let pool = open_database(&url).unwrap();
    let resolver = VehicleResolver::new(Arc::new(SqliteVehicleCatalog::new(pool)));
    assert_eq!(resolver.makes().unwrap(), vec!["Audi", "Ford"]);
}

#[test]
fn prepared_feed_imports_and_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("feed.csv");
    let out = dir.path().join("catalog");
    fs::write(&input, FEED).unwrap();

    let feed = prepare_feed(&input, &out, 2026).unwrap();
    assert_eq!(feed.rows_read, 5);
    assert_eq!(feed.rows_skipped, 1);
    assert_eq!(feed.duplicates_merged, 1);
    assert_eq!(feed.vehicles, 3);
    assert_eq!(feed.engines, 3);

    let pool = open_database(dir.path().join("fitment.db").to_str().unwrap()).unwrap();
    let report = CatalogImporter::new(pool.clone()).import_directory(&out).unwrap();
    assert_eq!(report.vehicles, 3);

    let resolver = VehicleResolver::new(Arc::new(SqliteVehicleCatalog::new(pool.clone())));
    assert_eq!(
        resolver.years("Audi", "A3", "Sportback").unwrap(),
        (2016..=2026).collect::<Vec<_>>()
    );
    assert_eq!(
        resolver.engines("Ford", "Focus", "Hatchback", 2017).unwrap(),
        vec!["1.0 EcoBoost", "1.6 TDCi"]
    );
    let criteria = FilterCriteria::new()
        .make("Ford")
        .model("Focus")
        .listing("Hatchback")
        .year(2017)
        .engine("1.6 TDCi");
    assert_eq!(resolver.resolve_id(&criteria).unwrap(), Some(VehicleId::new(1)));

    fs::write(
        dir.path().join("products.csv"),
        "id,sku,title,link,image,price\n\
         11,OF-100,Oil filter,https://shop.example/11,,8.99\n\
         12,BP-200,Brake pads,https://shop.example/12,,31.00\n",
    )
    .unwrap();
    let filter = CompatibilityFilter::new(Arc::new(SqliteProductCatalog::new(pool)));
    assert_eq!(filter.import_products(&dir.path().join("products.csv")).unwrap(), 2);

    let tagging = filter.tag_from_part_map(&out.join("part_vehicle_map.csv")).unwrap();
    assert_eq!(tagging.unknown_parts, vec!["TB-400"]);

    let estate = filter.filter_by_vehicle(Some(VehicleId::new(3))).unwrap();
    assert_eq!(estate.len(), 1);
    assert_eq!(estate[0].title, "Brake pads");
    let hatchback = filter.filter_by_vehicle(Some(VehicleId::new(1))).unwrap();
    assert_eq!(hatchback.len(), 2);
}

#[test]
fn inverted_range_aborts_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("vehicle_base.csv"),
        "vehicle_id,make,model,listing,year_from,year_to\n7,Ford,Ka,Hatchback,2019.0,2009.0\n",
    )
    .unwrap();
    let pool = open_database(dir.path().join("fitment.db").to_str().unwrap()).unwrap();

    let err = CatalogImporter::new(pool.clone())
        .import_directory(dir.path())
        .unwrap_err();
    match err {
        Error::Filter(FilterError::InvalidArgument { reason, .. }) => {
            assert!(reason.contains("vehicle_base.csv line 2"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(SqliteVehicleCatalog::new(pool).counts().unwrap().vehicles, 0);
}

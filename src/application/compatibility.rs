//! Compatibility filter service.
//!
//! Restricts the storefront catalog to products tagged for a resolved
//! vehicle, and maintains those tags from part-number maps.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{CompatibilityTag, ProductId, ProductSummary, VehicleId};
use crate::error::{Error, FilterError, Result};
use crate::port::outbound::product::ProductCatalog;

/// Outcome of applying a part-number map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaggingReport {
    /// Part numbers read from the map.
    pub parts: usize,
    /// Product/tag pairs written.
    pub tags_applied: usize,
    /// Part numbers with no product of that SKU.
    pub unknown_parts: Vec<String>,
}

/// One row of a storefront product export.
#[derive(Debug, Deserialize)]
struct ProductCsvRow {
    id: i64,
    #[serde(default)]
    sku: Option<String>,
    title: String,
    link: String,
    #[serde(default)]
    image: Option<String>,
    price: String,
}

/// Product filtering by vehicle compatibility.
pub struct CompatibilityFilter {
    products: Arc<dyn ProductCatalog>,
}

impl CompatibilityFilter {
    pub fn new(products: Arc<dyn ProductCatalog>) -> Self {
        Self { products }
    }

    /// Products compatible with `vehicle_id`, or the whole catalog when no
    /// vehicle is given. No tagged product is an empty list, not an error.
    pub fn filter_by_vehicle(&self, vehicle_id: Option<VehicleId>) -> Result<Vec<ProductSummary>> {
        let products = match vehicle_id {
            Some(id) => self.products.query_by_tag(&CompatibilityTag::for_vehicle(id))?,
            None => self.products.list_all()?,
        };
        debug!(vehicle_id = ?vehicle_id, count = products.len(), "Filtered products");
        Ok(products)
    }

    /// Tag products from a `part_number,vehicle_ids` map.
    ///
    /// Each part number is matched against product SKUs; every matching
    /// product is tagged with every listed vehicle. Unknown part numbers are
    /// reported and skipped.
    ///
    /// # Errors
    /// Returns an invalid-argument error naming the line when a vehicle id
    /// is not a whole number; CSV and store errors otherwise.
    pub fn tag_from_part_map(&self, path: &Path) -> Result<TaggingReport> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let mut report = TaggingReport::default();

        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let part_number = record.get(0).map(str::trim).unwrap_or_default();
            if part_number.is_empty() {
                continue;
            }
            let vehicle_ids = parse_vehicle_ids(record.get(1).unwrap_or_default(), line)?;
            report.parts += 1;

            let products = self.products.find_by_sku(part_number)?;
            if products.is_empty() {
                debug!(part_number = %part_number, "No product for part number");
                report.unknown_parts.push(part_number.to_string());
                continue;
            }
            for product_id in &products {
                for vehicle_id in &vehicle_ids {
                    self.products
                        .tag_product(*product_id, &CompatibilityTag::for_vehicle(*vehicle_id))?;
                    report.tags_applied += 1;
                }
            }
        }

        if !report.unknown_parts.is_empty() {
            warn!(count = report.unknown_parts.len(), "Part numbers without a matching product");
        }
        info!(
            parts = report.parts,
            tags = report.tags_applied,
            unknown = report.unknown_parts.len(),
            "Applied part map"
        );
        Ok(report)
    }

    /// Load a storefront product export (`id,sku,title,link,image,price`).
    ///
    /// Existing products with the same id are replaced.
    pub fn import_products(&self, path: &Path) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut count = 0;
        for row in reader.deserialize::<ProductCsvRow>() {
            let row = row?;
            let product = ProductSummary {
                id: ProductId::new(row.id),
                title: row.title,
                link: row.link,
                image: row.image.filter(|image| !image.is_empty()),
                price: row.price,
            };
            let sku = row.sku.as_deref().filter(|sku| !sku.is_empty());
            self.products.upsert_product(&product, sku)?;
            count += 1;
        }
        info!(count, "Imported products");
        Ok(count)
    }
}

/// Parse `"1, 2, 3"` into vehicle ids.
fn parse_vehicle_ids(raw: &str, line: u64) -> Result<Vec<VehicleId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<VehicleId>().map_err(|_| {
                Error::Filter(FilterError::invalid(
                    "vehicle_ids",
                    format!("line {line}: `{id}` is not a whole number"),
                ))
            })
        })
        .collect()
}

//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{engine, product_tags, products, vehicle_base, vehicle_engine};
use crate::domain::{
    EngineId, EngineRecord, ProductId, ProductSummary, VehicleEngineLink, VehicleId,
    VehicleRecord,
};

/// Database row for a vehicle base record.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = vehicle_base, primary_key(vehicle_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VehicleRow {
    pub vehicle_id: i64,
    pub make: String,
    pub model: String,
    pub listing: String,
    pub year_from: f64,
    pub year_to: f64,
}

impl From<&VehicleRecord> for VehicleRow {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            vehicle_id: record.vehicle_id.value(),
            make: record.make.clone(),
            model: record.model.clone(),
            listing: record.listing.clone(),
            year_from: record.year_from,
            year_to: record.year_to,
        }
    }
}

impl From<VehicleRow> for VehicleRecord {
    fn from(row: VehicleRow) -> Self {
        Self {
            vehicle_id: VehicleId::new(row.vehicle_id),
            make: row.make,
            model: row.model,
            listing: row.listing,
            year_from: row.year_from,
            year_to: row.year_to,
        }
    }
}

/// Database row for an engine code.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = engine, primary_key(engine_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EngineRow {
    pub engine_id: i64,
    pub engine_code: String,
}

impl From<&EngineRecord> for EngineRow {
    fn from(record: &EngineRecord) -> Self {
        Self {
            engine_id: record.engine_id.value(),
            engine_code: record.engine_code.clone(),
        }
    }
}

/// Database row for a vehicle/engine link.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = vehicle_engine)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VehicleEngineRow {
    pub vehicle_id: i64,
    pub engine_id: i64,
}

impl From<&VehicleEngineLink> for VehicleEngineRow {
    fn from(link: &VehicleEngineLink) -> Self {
        Self {
            vehicle_id: link.vehicle_id.value(),
            engine_id: link.engine_id.value(),
        }
    }
}

impl From<VehicleEngineRow> for VehicleEngineLink {
    fn from(row: VehicleEngineRow) -> Self {
        Self {
            vehicle_id: VehicleId::new(row.vehicle_id),
            engine_id: EngineId::new(row.engine_id),
        }
    }
}

/// Database row for a storefront product.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = products, treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductRow {
    pub id: i64,
    pub sku: Option<String>,
    pub title: String,
    pub link: String,
    pub image: Option<String>,
    pub price: String,
}

impl ProductRow {
    #[must_use]
    pub fn new(product: &ProductSummary, sku: Option<&str>) -> Self {
        Self {
            id: product.id.value(),
            sku: sku.map(ToOwned::to_owned),
            title: product.title.clone(),
            link: product.link.clone(),
            image: product.image.clone(),
            price: product.price.clone(),
        }
    }
}

impl From<ProductRow> for ProductSummary {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            link: row.link,
            image: row.image,
            price: row.price,
        }
    }
}

/// Database row for a product tag.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = product_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductTagRow {
    pub product_id: i64,
    pub tag: String,
}

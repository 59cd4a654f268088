//! SQLite product catalog and tag index.

use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{ProductRow, ProductTagRow};
use crate::adapter::outbound::sqlite::database::schema::{product_tags, products};
use crate::domain::{CompatibilityTag, ProductId, ProductSummary};
use crate::error::{Error, Result};
use crate::port::outbound::product::ProductCatalog;

/// SQLite-backed storefront product catalog.
#[derive(Clone)]
pub struct SqliteProductCatalog {
    pool: DbPool,
}

impl SqliteProductCatalog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductCatalog for SqliteProductCatalog {
    fn list_all(&self) -> Result<Vec<ProductSummary>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<ProductRow> = products::table
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(ProductSummary::from).collect())
    }

    fn query_by_tag(&self, tag: &CompatibilityTag) -> Result<Vec<ProductSummary>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<ProductRow> = products::table
            .inner_join(product_tags::table)
            .filter(product_tags::tag.eq(tag.as_str()))
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(ProductSummary::from).collect())
    }

    fn tag_product(&self, product_id: ProductId, tag: &CompatibilityTag) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_or_ignore_into(product_tags::table)
            .values(&ProductTagRow {
                product_id: product_id.value(),
                tag: tag.as_str().to_string(),
            })
            .execute(&mut conn)?;

        Ok(())
    }

    fn upsert_product(&self, product: &ProductSummary, sku: Option<&str>) -> Result<()> {
        let row = ProductRow::new(product, sku);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_into(products::table)
            .values(&row)
            .on_conflict(products::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)?;

        Ok(())
    }

    fn find_by_sku(&self, sku: &str) -> Result<Vec<ProductId>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let ids: Vec<i64> = products::table
            .filter(products::sku.eq(sku))
            .select(products::id)
            .order(products::id.asc())
            .load(&mut conn)?;

        Ok(ids.into_iter().map(ProductId::new).collect())
    }
}

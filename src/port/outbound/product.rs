//! Product catalog port.
//!
//! The storefront owns products and their tag index; the compatibility
//! filter only needs to list, query by tag, and attach tags.

use crate::domain::{CompatibilityTag, ProductId, ProductSummary};
use crate::error::Result;

/// Narrow view of the storefront's product catalog and tag index.
pub trait ProductCatalog: Send + Sync {
    /// Every product, ordered by identifier.
    fn list_all(&self) -> Result<Vec<ProductSummary>>;

    /// Products carrying `tag`, ordered by identifier.
    fn query_by_tag(&self, tag: &CompatibilityTag) -> Result<Vec<ProductSummary>>;

    /// Attach `tag` to a product. Tagging twice is a no-op.
    fn tag_product(&self, product_id: ProductId, tag: &CompatibilityTag) -> Result<()>;

    /// Insert or replace a product.
    fn upsert_product(&self, product: &ProductSummary, sku: Option<&str>) -> Result<()>;

    /// Products whose SKU equals `sku`.
    fn find_by_sku(&self, sku: &str) -> Result<Vec<ProductId>>;
}

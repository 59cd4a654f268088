//! In-memory product catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::domain::{CompatibilityTag, ProductId, ProductSummary, VehicleId};
use crate::error::{Error, Result};
use crate::port::outbound::product::ProductCatalog;

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductId, (ProductSummary, Option<String>)>,
    tags: BTreeSet<(String, ProductId)>,
}

/// [`ProductCatalog`] backed by ordered maps.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    inner: Mutex<Inner>,
}

impl InMemoryProductCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding [`sample_products`] tagged for the seeded vehicles:
    /// 101 fits vehicle 1, 102 fits vehicles 1 and 3, 104 fits vehicle 5,
    /// and 103 fits nothing.
    ///
    /// # Panics
    /// Panics if seeding fails.
    #[must_use]
    pub fn seeded() -> Self {
        let catalog = Self::new();
        for (product, sku) in sample_products() {
            catalog
                .upsert_product(&product, Some(sku))
                .expect("seed product");
        }
        for (product, vehicle) in [(101, 1), (102, 1), (102, 3), (104, 5)] {
            catalog
                .tag_product(
                    ProductId::new(product),
                    &CompatibilityTag::for_vehicle(VehicleId::new(vehicle)),
                )
                .expect("seed tag");
        }
        catalog
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Build a product summary with predictable fields.
#[must_use]
pub fn product(id: i64, title: &str) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(id),
        title: title.to_string(),
        link: format!("https://shop.example/product/{id}"),
        image: Some(format!("https://shop.example/img/{id}.jpg")),
        price: "24.99".to_string(),
    }
}

/// Four products with their SKUs.
#[must_use]
pub fn sample_products() -> Vec<(ProductSummary, &'static str)> {
    vec![
        (product(101, "Oil filter"), "OF-100"),
        (product(102, "Brake pads"), "BP-200"),
        (product(103, "Wiper blade"), "WB-300"),
        (product(104, "Timing belt kit"), "TB-400"),
    ]
}

impl ProductCatalog for InMemoryProductCatalog {
    fn list_all(&self) -> Result<Vec<ProductSummary>> {
        Ok(self
            .lock()
            .products
            .values()
            .map(|(product, _)| product.clone())
            .collect())
    }

    fn query_by_tag(&self, tag: &CompatibilityTag) -> Result<Vec<ProductSummary>> {
        let inner = self.lock();
        Ok(inner
            .tags
            .iter()
            .filter(|(name, _)| name == tag.as_str())
            .filter_map(|(_, id)| inner.products.get(id).map(|(p, _)| p.clone()))
            .collect())
    }

    fn tag_product(&self, product_id: ProductId, tag: &CompatibilityTag) -> Result<()> {
        let mut inner = self.lock();
        if !inner.products.contains_key(&product_id) {
            return Err(Error::Database(format!("unknown product {product_id}")));
        }
        inner.tags.insert((tag.as_str().to_string(), product_id));
        Ok(())
    }

    fn upsert_product(&self, product: &ProductSummary, sku: Option<&str>) -> Result<()> {
        self.lock().products.insert(
            product.id,
            (product.clone(), sku.map(ToOwned::to_owned)),
        );
        Ok(())
    }

    fn find_by_sku(&self, sku: &str) -> Result<Vec<ProductId>> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|(_, (_, stored))| stored.as_deref() == Some(sku))
            .map(|(id, _)| *id)
            .collect())
    }
}

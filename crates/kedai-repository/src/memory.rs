//! In-memory product repository.
//!
//! Used when Redis is disabled and in tests. Expiry is tracked beside each
//! record and applied lazily on access.

use crate::traits::{reported_ttl, ProductRepository, StoredProduct};
use async_trait::async_trait;
use kedai_core::{KedaiResult, Product, ProductId, ValidateExt};
use parking_lot::Mutex;
use shaku::Component;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct Record {
    product: Product,
    expires_at: Option<Instant>,
}

impl Record {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn expires_in(&self, now: Instant) -> Option<Duration> {
        self.expires_at.map(|at| at.saturating_duration_since(now))
    }

    /// The stored product with `ttl` set to the remaining whole seconds, rounded up.
    fn snapshot(&self, now: Instant) -> Product {
        let mut product = self.product.clone();
        product.ttl = self.expires_in(now).map(reported_ttl);
        product
    }
}

/// In-memory product repository.
#[derive(Component, Default)]
#[shaku(interface = ProductRepository)]
pub struct InMemoryProductRepository {
    #[shaku(default)]
    records: Mutex<HashMap<ProductId, Record>>,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` over the live records after dropping expired ones.
    fn with_live<T>(&self, f: impl FnOnce(&mut HashMap<ProductId, Record>, Instant) -> T) -> T {
        let now = Instant::now();
        let mut records = self.records.lock();
        records.retain(|_, record| !record.is_expired(now));
        f(&mut records, now)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_stored(&self, id: &ProductId) -> KedaiResult<Option<StoredProduct>> {
        debug!("Finding product by id: {}", id);
        Ok(self.with_live(|records, now| {
            records.get(id).map(|record| StoredProduct {
                product: record.snapshot(now),
                expires_in: record.expires_in(now),
            })
        }))
    }

    async fn save(&self, product: &Product) -> KedaiResult<Product> {
        product.validate_request()?;
        debug!(product_id = %product.id, ttl = ?product.ttl, "Saving product");

        let now = Instant::now();
        let record = Record {
            product: product.clone(),
            expires_at: product.ttl.map(|secs| now + Duration::from_secs(secs)),
        };
        self.records.lock().insert(product.id.clone(), record);
        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> KedaiResult<bool> {
        Ok(self.with_live(|records, _| records.remove(id).is_some()))
    }

    async fn exists(&self, id: &ProductId) -> KedaiResult<bool> {
        Ok(self.with_live(|records, _| records.contains_key(id)))
    }

    async fn find_all(&self) -> KedaiResult<Vec<Product>> {
        let mut products = self.with_live(|records, now| {
            records
                .values()
                .map(|record| record.snapshot(now))
                .collect::<Vec<_>>()
        });
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    async fn count(&self) -> KedaiResult<u64> {
        Ok(self.with_live(|records, _| records.len() as u64))
    }
}

impl std::fmt::Debug for InMemoryProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryProductRepository")
            .field("records", &self.records.lock().len())
            .finish()
    }
}

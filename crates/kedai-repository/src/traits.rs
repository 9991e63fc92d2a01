//! Repository trait definitions.

use async_trait::async_trait;
use kedai_core::{Interface, KedaiResult, Product, ProductId};
use std::time::Duration;

/// A product read back together with the exact lifetime its record has left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProduct {
    /// The product, with `ttl` rounded up to whole seconds.
    pub product: Product,
    /// Time until the record expires. `None` for records without a TTL.
    pub expires_in: Option<Duration>,
}

/// Whole seconds reported in `Product::ttl` for a live record.
pub(crate) fn reported_ttl(remaining: Duration) -> u64 {
    (remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)).max(1)
}

/// Product repository trait.
///
/// A record saved with a `ttl` disappears from every read once it expires.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product and its precise remaining lifetime.
    async fn find_stored(&self, id: &ProductId) -> KedaiResult<Option<StoredProduct>>;

    /// Finds a product by ID. Expired records are `None`.
    ///
    /// The returned `ttl` is the remaining lifetime, not the original one.
    async fn find_by_id(&self, id: &ProductId) -> KedaiResult<Option<Product>> {
        Ok(self.find_stored(id).await?.map(|stored| stored.product))
    }

    /// Saves a product, replacing any existing record with the same ID.
    async fn save(&self, product: &Product) -> KedaiResult<Product>;

    /// Deletes a product by ID. Returns true if it existed.
    async fn delete(&self, id: &ProductId) -> KedaiResult<bool>;

    /// Checks if a live record exists.
    async fn exists(&self, id: &ProductId) -> KedaiResult<bool>;

    /// Finds all live products, ordered by ID.
    async fn find_all(&self) -> KedaiResult<Vec<Product>>;

    /// Counts live products.
    async fn count(&self) -> KedaiResult<u64>;
}

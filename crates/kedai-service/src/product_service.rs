//! Product service trait definition.

use async_trait::async_trait;
use kedai_core::{Interface, KedaiResult, Product, ProductId};

/// Cache-aside access to products.
///
/// Reads go through the `products` cache region and fall back to the
/// repository on a miss. Writes always hit the repository and invalidate the
/// cached copy.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Gets a product, populating the cache on a miss.
    ///
    /// Absence is not cached: an unknown ID asks the repository every time.
    async fn get_product(&self, id: &ProductId) -> KedaiResult<Option<Product>>;

    /// Saves a product and evicts its cache entry.
    async fn save(&self, product: &Product) -> KedaiResult<Product>;

    /// Evicts a product from the cache. The stored record is kept.
    async fn remove(&self, id: &ProductId) -> KedaiResult<()>;
}

//! Product service implementation.

use crate::cache::{CacheManagerInterface, CacheRegion};
use crate::product_service::ProductService;
use async_trait::async_trait;
use kedai_core::{KedaiResult, Product, ProductId};
use kedai_repository::ProductRepository;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Cache region holding products.
pub const PRODUCTS_REGION: &str = "products";

/// Product service component for DI.
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceImpl {
    #[shaku(inject)]
    product_repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    cache_manager: Arc<dyn CacheManagerInterface>,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    #[must_use]
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        cache_manager: Arc<dyn CacheManagerInterface>,
    ) -> Self {
        Self {
            product_repository,
            cache_manager,
        }
    }

    fn region(&self) -> CacheRegion {
        self.cache_manager.region(PRODUCTS_REGION)
    }
}

/// A cached copy must not outlive the stored record.
///
/// `record_left` is the record's remaining lifetime measured from now.
fn cache_ttl(region_ttl: Option<Duration>, record_left: Option<Duration>) -> Option<Duration> {
    match (region_ttl, record_left) {
        (Some(region), Some(record)) => Some(region.min(record)),
        (region, record) => region.or(record),
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn get_product(&self, id: &ProductId) -> KedaiResult<Option<Product>> {
        let region = self.region();

        if let Some(cached) = region.get::<Product>(id.as_str()).await? {
            debug!(product_id = %id, "Product served from cache");
            return Ok(Some(cached));
        }

        let started = Instant::now();
        let Some(stored) = self.product_repository.find_stored(id).await? else {
            debug!(product_id = %id, "Product not found");
            return Ok(None);
        };
        let product = stored.product;

        // The lifetime was measured during the read; whatever has elapsed since it began is gone
        let record_left = stored
            .expires_in
            .map(|left| left.saturating_sub(started.elapsed()));
        if record_left.is_some_and(|left| left.is_zero()) {
            debug!(product_id = %id, "Product expires too soon to cache");
            return Ok(Some(product));
        }

        let ttl = cache_ttl(region.ttl(), record_left);
        if let Err(e) = region.put_with_ttl(id.as_str(), &product, ttl).await {
            warn!(product_id = %id, "Failed to cache product: {}", e);
        }

        Ok(Some(product))
    }

    async fn save(&self, product: &Product) -> KedaiResult<Product> {
        let saved = self.product_repository.save(product).await?;

        // Invalidate rather than refresh so the next read sees storage truth
        self.region().evict(saved.id.as_str()).await?;

        info!(product_id = %saved.id, "Product saved");
        Ok(saved)
    }

    async fn remove(&self, id: &ProductId) -> KedaiResult<()> {
        let evicted = self.region().evict(id.as_str()).await?;
        debug!(product_id = %id, evicted, "Product evicted from cache");
        Ok(())
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl").finish_non_exhaustive()
    }
}

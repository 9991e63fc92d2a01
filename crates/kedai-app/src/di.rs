//! Dependency injection module using Shaku.
//!
//! Two module shapes exist:
//! - `RedisModule`: Redis-backed store, repository and cache
//! - `InMemoryModule`: process-local repository and cache for when Redis is disabled

use kedai_config::AppConfig;
use kedai_repository::{InMemoryProductRepository, ProductRepository, RedisProductRepository};
use kedai_service::{
    CacheManager, CacheManagerInterface, CacheManagerParameters, MemoryCacheService,
    ProductService, ProductServiceImpl, RedisCacheService,
};
use kedai_store::{RedisStore, RedisStoreParameters, StorePoolInterface};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

// Redis-backed module.
// - Pooled store
// - Hash-per-product repository
// - Redis cache regions
// - Cache-aside product service
module! {
    pub RedisModule {
        components = [
            RedisStore,
            RedisProductRepository,
            RedisCacheService,
            CacheManager,
            ProductServiceImpl,
        ],
        providers = [],
    }
}

// Module used when Redis is disabled.
module! {
    pub InMemoryModule {
        components = [
            InMemoryProductRepository,
            MemoryCacheService,
            CacheManager,
            ProductServiceImpl,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// The module chosen for the current configuration.
#[derive(Clone)]
pub enum KedaiModule {
    /// Everything lives in Redis.
    Redis(Arc<RedisModule>),
    /// Nothing leaves the process.
    InMemory(Arc<InMemoryModule>),
}

impl KedaiModule {
    /// Resolves the product service.
    #[must_use]
    pub fn product_service(&self) -> Arc<dyn ProductService> {
        match self {
            Self::Redis(module) => module.resolve(),
            Self::InMemory(module) => module.resolve(),
        }
    }

    /// Resolves the product repository.
    #[must_use]
    pub fn product_repository(&self) -> Arc<dyn ProductRepository> {
        match self {
            Self::Redis(module) => module.resolve(),
            Self::InMemory(module) => module.resolve(),
        }
    }

    /// Resolves the cache manager.
    #[must_use]
    pub fn cache_manager(&self) -> Arc<dyn CacheManagerInterface> {
        match self {
            Self::Redis(module) => module.resolve(),
            Self::InMemory(module) => module.resolve(),
        }
    }

    /// Resolves the store. `None` for the in-memory module.
    #[must_use]
    pub fn store(&self) -> Option<Arc<dyn StorePoolInterface>> {
        match self {
            Self::Redis(module) => Some(module.resolve()),
            Self::InMemory(_) => None,
        }
    }

    /// Returns true if the module is backed by Redis.
    #[must_use]
    pub const fn is_redis(&self) -> bool {
        matches!(self, Self::Redis(_))
    }
}

impl std::fmt::Debug for KedaiModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis(_) => f.write_str("KedaiModule::Redis"),
            Self::InMemory(_) => f.write_str("KedaiModule::InMemory"),
        }
    }
}

/// Builds the module for a connected store.
///
/// A disabled store selects the in-memory module.
#[must_use]
pub fn build_module(config: &AppConfig, store: &RedisStore) -> KedaiModule {
    let cache_parameters = CacheManagerParameters {
        config: config.cache.clone(),
    };

    match (store.pool(), store.redis_client()) {
        (Some(pool), Some(client)) => {
            info!("Using Redis-backed repository and cache");
            let module = RedisModule::builder()
                .with_component_parameters::<RedisStore>(RedisStoreParameters {
                    pool: Some(pool),
                    client: Some(client),
                })
                .with_component_parameters::<CacheManager>(cache_parameters)
                .build();
            KedaiModule::Redis(Arc::new(module))
        }
        _ => {
            info!("Using in-memory repository and cache");
            let module = InMemoryModule::builder()
                .with_component_parameters::<CacheManager>(cache_parameters)
                .build();
            KedaiModule::InMemory(Arc::new(module))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kedai_core::{Product, ProductId};
    use kedai_service::PRODUCTS_REGION;
    use std::time::Duration;

    #[test]
    fn test_modules_provide_components() {
        fn _assert_has_product_service<T: HasComponent<dyn ProductService>>() {}
        fn _assert_has_product_repository<T: HasComponent<dyn ProductRepository>>() {}
        fn _assert_has_cache_manager<T: HasComponent<dyn CacheManagerInterface>>() {}
        fn _assert_has_store<T: HasComponent<dyn StorePoolInterface>>() {}

        _assert_has_product_service::<RedisModule>();
        _assert_has_product_repository::<RedisModule>();
        _assert_has_cache_manager::<RedisModule>();
        _assert_has_store::<RedisModule>();

        _assert_has_product_service::<InMemoryModule>();
        _assert_has_product_repository::<InMemoryModule>();
        _assert_has_cache_manager::<InMemoryModule>();
    }

    #[test]
    fn test_disabled_store_selects_in_memory_module() {
        let module = build_module(&AppConfig::default(), &RedisStore::disabled());

        assert!(!module.is_redis());
        assert!(module.store().is_none());
        assert!(module.cache_manager().is_enabled());
    }

    #[test]
    fn test_cache_config_reaches_regions() {
        let mut config = AppConfig::default();
        config.cache.regions.insert(PRODUCTS_REGION.to_string(), 42);

        let module = build_module(&config, &RedisStore::disabled());
        let region = module.cache_manager().region(PRODUCTS_REGION);

        assert_eq!(region.ttl(), Some(Duration::from_secs(42)));
    }

    #[tokio::test]
    async fn test_in_memory_service_shares_repository() {
        let module = build_module(&AppConfig::default(), &RedisStore::disabled());
        let service = module.product_service();
        let repository = module.product_repository();
        let product = Product::new(ProductId::new("P-002").unwrap(), "Sample");

        service.save(&product).await.unwrap();

        assert_eq!(repository.find_by_id(&product.id).await.unwrap(), Some(product.clone()));
        assert_eq!(service.get_product(&product.id).await.unwrap(), Some(product));
    }
}

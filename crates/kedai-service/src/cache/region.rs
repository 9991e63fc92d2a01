//! Named cache regions.

use super::cache_keys::{region_key, region_pattern};
use super::{CacheInterface, JsonCache};
use kedai_config::CacheConfig;
use kedai_core::KedaiResult;
use serde::{de::DeserializeOwned, Serialize};
use shaku::{Component, Interface};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A namespace inside the cache backend with its own TTL.
///
/// Entries are stored under `{name}::{key}` so that two regions never see
/// each other's keys and a region can be cleared in one call.
#[derive(Clone)]
pub struct CacheRegion {
    name: String,
    cache: Arc<dyn CacheInterface>,
    ttl: Option<Duration>,
}

impl CacheRegion {
    /// Creates a region over a backend.
    #[must_use]
    pub fn new(name: impl Into<String>, cache: Arc<dyn CacheInterface>, ttl: Option<Duration>) -> Self {
        Self {
            name: name.into(),
            cache,
            ttl,
        }
    }

    /// Region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// TTL applied by [`put`](Self::put). `None` keeps entries until evicted.
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Backend key of an entry.
    #[must_use]
    pub fn key(&self, key: &str) -> String {
        region_key(&self.name, key)
    }

    /// Reads an entry.
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> KedaiResult<Option<T>> {
        self.cache.get(&self.key(key)).await
    }

    /// Writes an entry with the region TTL.
    pub async fn put<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> KedaiResult<()> {
        self.put_with_ttl(key, value, self.ttl).await
    }

    /// Writes an entry with an explicit TTL.
    pub async fn put_with_ttl<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> KedaiResult<()> {
        self.cache.set(&self.key(key), value, ttl).await
    }

    /// Removes an entry. Returns `true` if it was cached.
    pub async fn evict(&self, key: &str) -> KedaiResult<bool> {
        self.cache.delete(&self.key(key)).await
    }

    /// Removes every entry of the region.
    pub async fn clear(&self) -> KedaiResult<u64> {
        let deleted = self.cache.delete_pattern(&region_pattern(&self.name)).await?;
        debug!(region = %self.name, deleted, "Cleared cache region");
        Ok(deleted)
    }
}

impl std::fmt::Debug for CacheRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegion")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Hands out cache regions configured from [`CacheConfig`].
pub trait CacheManagerInterface: Interface + Send + Sync {
    /// Returns the region with the given name.
    ///
    /// Unknown names get the default TTL.
    fn region(&self, name: &str) -> CacheRegion;

    /// Whether the backend actually stores anything.
    fn is_enabled(&self) -> bool;
}

/// Cache manager component.
#[derive(Component)]
#[shaku(interface = CacheManagerInterface)]
pub struct CacheManager {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    config: CacheConfig,
}

impl CacheManager {
    /// Creates a manager over a backend.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, config: CacheConfig) -> Self {
        Self { cache, config }
    }
}

impl CacheManagerInterface for CacheManager {
    fn region(&self, name: &str) -> CacheRegion {
        CacheRegion::new(name, Arc::clone(&self.cache), self.config.ttl_for(name))
    }

    fn is_enabled(&self) -> bool {
        self.cache.is_enabled()
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use kedai_core::{KedaiError, KedaiResult};
use kedai_store::StorePoolInterface;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 100;

/// Redis-based cache service.
///
/// Shares the connection pool of the injected store. When the store is
/// disabled every read is a miss and every write is a no-op.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    #[shaku(inject)]
    store: Arc<dyn StorePoolInterface>,
}

impl RedisCacheService {
    /// Create a new Redis cache service on top of a store.
    #[must_use]
    pub fn new(store: Arc<dyn StorePoolInterface>) -> Self {
        Self { store }
    }

}

/// Connection and timeout failures keep their own kind; only command
/// rejections become `Cache` errors.
fn cache_error(context: String, err: redis::RedisError) -> KedaiError {
    match KedaiError::from(err) {
        KedaiError::Store(message) => KedaiError::Cache(format!("{}: {}", context, message)),
        other => other,
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    async fn get_raw(&self, key: &str) -> KedaiResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.store.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| cache_error(format!("Failed to get key '{}'", key), e))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> KedaiResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        // Whole milliseconds, rounded down, so the entry never outlives `ttl`
        let millis = ttl.map(|ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX));
        if millis == Some(0) {
            debug!("Skipping cache write for key '{}' with no lifetime left", key);
            return Ok(());
        }

        let mut conn = self.store.get_conn().await?;
        let result = match millis {
            Some(millis) => conn.pset_ex::<_, _, ()>(key, value, millis).await,
            None => conn.set::<_, _, ()>(key, value).await,
        };
        result.map_err(|e| cache_error(format!("Failed to set key '{}'", key), e))?;

        debug!("Cached key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> KedaiResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.store.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| cache_error(format!("Failed to delete key '{}'", key), e))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> KedaiResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.store.get_conn().await?;
        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| cache_error(format!("Failed to check key '{}'", key), e))?;

        Ok(exists)
    }

    async fn delete_pattern(&self, pattern: &str) -> KedaiResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.store.get_conn().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // SCAN instead of KEYS so a large keyspace does not block the server
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| cache_error("Failed to scan keys".to_string(), e))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| cache_error("Failed to delete keys".to_string(), e))?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

//! Redis connection pool management.

use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use kedai_config::RedisConfig;
use kedai_core::{HealthCheck, HealthStatus, Interface, KedaiError, KedaiResult};
use shaku::Component;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ops::{
    HashOps, HyperLogLogOps, KeyOps, ListOps, PubSubOps, SetOps, StreamOps, ValueOps, ZSetOps,
};

/// Interface for Redis pool operations.
///
/// This trait abstracts the connection pool for dependency injection.
/// Typed command families hang off `dyn StorePoolInterface`, so anything
/// holding an `Arc<dyn StorePoolInterface>` can write `store.lists()`.
#[async_trait]
pub trait StorePoolInterface: Interface + Send + Sync {
    /// Checks out a pooled connection.
    async fn get_conn(&self) -> KedaiResult<Connection>;

    /// Returns the client used for dedicated (pub/sub) connections.
    fn client(&self) -> KedaiResult<&redis::Client>;

    /// Returns true if Redis is configured.
    fn is_enabled(&self) -> bool;

    /// Checks if Redis answers `PING`.
    async fn health_check(&self) -> KedaiResult<()>;
}

impl dyn StorePoolInterface {
    /// Key-level commands (DEL, EXISTS, EXPIRE, TTL).
    #[must_use]
    pub fn keys(&self) -> KeyOps<'_> {
        KeyOps::new(self)
    }

    /// String value commands.
    #[must_use]
    pub fn values(&self) -> ValueOps<'_> {
        ValueOps::new(self)
    }

    /// List commands.
    #[must_use]
    pub fn lists(&self) -> ListOps<'_> {
        ListOps::new(self)
    }

    /// Set commands.
    #[must_use]
    pub fn sets(&self) -> SetOps<'_> {
        SetOps::new(self)
    }

    /// Sorted set commands.
    #[must_use]
    pub fn zsets(&self) -> ZSetOps<'_> {
        ZSetOps::new(self)
    }

    /// Hash commands.
    #[must_use]
    pub fn hashes(&self) -> HashOps<'_> {
        HashOps::new(self)
    }

    /// HyperLogLog commands.
    #[must_use]
    pub fn hyperloglog(&self) -> HyperLogLogOps<'_> {
        HyperLogLogOps::new(self)
    }

    /// Stream and consumer group commands.
    #[must_use]
    pub fn streams(&self) -> StreamOps<'_> {
        StreamOps::new(self)
    }

    /// Publishing side of pub/sub.
    #[must_use]
    pub fn pubsub(&self) -> PubSubOps<'_> {
        PubSubOps::new(self)
    }
}

/// Redis pool wrapper.
#[derive(Component)]
#[shaku(interface = StorePoolInterface)]
pub struct RedisStore {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
    /// Client for connections that leave the pool (pub/sub).
    client: Option<redis::Client>,
}

impl RedisStore {
    /// Creates a new Redis store from configuration and verifies it with `PING`.
    ///
    /// Returns a disabled store when `config.enabled` is false.
    pub async fn connect(config: &RedisConfig) -> KedaiResult<Self> {
        if !config.enabled {
            warn!("Redis is disabled; store operations will fail with StoreUnavailable");
            return Ok(Self::disabled());
        }

        info!(pool_size = config.pool_size, "Creating Redis connection pool...");

        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| KedaiError::Configuration(format!("Invalid Redis URL: {}", e)))?;

        let timeout = config.connect_timeout();
        let pool = Config::from_url(config.url.as_str())
            .builder()
            .map_err(|e| KedaiError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| KedaiError::Configuration(format!("Failed to create pool: {}", e)))?;

        let store = Self::with_pool(Arc::new(pool), client);
        store.ping().await.map_err(|e| {
            warn!("Failed to connect to Redis: {}", e);
            e
        })?;

        info!("Redis connection pool established");
        Ok(store)
    }

    /// Creates a store from a pre-existing pool (for Shaku injection and tests).
    #[must_use]
    pub fn with_pool(pool: Arc<Pool>, client: redis::Client) -> Self {
        Self {
            pool: Some(pool),
            client: Some(client),
        }
    }

    /// Creates a store with no backing Redis.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            client: None,
        }
    }

    /// Returns the underlying pool, if any.
    #[must_use]
    pub fn pool(&self) -> Option<Arc<Pool>> {
        self.pool.clone()
    }

    /// Returns the client, if any.
    #[must_use]
    pub fn redis_client(&self) -> Option<redis::Client> {
        self.client.clone()
    }

    async fn checkout(&self) -> KedaiResult<Connection> {
        match &self.pool {
            Some(pool) => Ok(pool.get().await?),
            None => Err(KedaiError::store_unavailable("Redis is disabled")),
        }
    }

    async fn ping(&self) -> KedaiResult<()> {
        let mut conn = self.checkout().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl StorePoolInterface for RedisStore {
    async fn get_conn(&self) -> KedaiResult<Connection> {
        self.checkout().await
    }

    fn client(&self) -> KedaiResult<&redis::Client> {
        self.client
            .as_ref()
            .ok_or_else(|| KedaiError::store_unavailable("Redis is disabled"))
    }

    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn health_check(&self) -> KedaiResult<()> {
        self.ping().await
    }
}

#[async_trait]
impl HealthCheck for RedisStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> HealthStatus {
        if !StorePoolInterface::is_enabled(self) {
            return HealthStatus::Degraded("Redis is disabled".to_string());
        }

        match self.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("enabled", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

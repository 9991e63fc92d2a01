//! Common test infrastructure for Redis integration tests.

use kedai_config::RedisConfig;
use kedai_store::{RedisStore, StorePoolInterface};
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::{Redis, REDIS_PORT};
use uuid::Uuid;

/// Set to use an existing Redis instead of starting a container.
pub const REDIS_URL_ENV: &str = "KEDAI_TEST_REDIS_URL";

/// Test Redis wrapper.
///
/// Manages a Redis testcontainer lifecycle (unless `KEDAI_TEST_REDIS_URL`
/// points at a running server) and hands out keys under a per-test prefix
/// so tests can share one server.
pub struct TestRedis {
    _container: Option<ContainerAsync<Redis>>,
    store: Arc<dyn StorePoolInterface>,
    url: String,
    prefix: String,
}

impl TestRedis {
    /// Starts Redis, or returns `None` (after saying why) when neither Docker
    /// nor `KEDAI_TEST_REDIS_URL` is available.
    pub async fn start() -> Option<Self> {
        let (container, url) = match std::env::var(REDIS_URL_ENV) {
            Ok(url) => (None, url),
            Err(_) => {
                let container = match Redis::default().start().await {
                    Ok(container) => container,
                    Err(e) => {
                        eprintln!("Skipping test: Redis container unavailable: {}", e);
                        return None;
                    }
                };
                let port = container
                    .get_host_port_ipv4(REDIS_PORT)
                    .await
                    .expect("Failed to get Redis port");
                (Some(container), format!("redis://127.0.0.1:{}", port))
            }
        };

        let config = RedisConfig {
            url: url.clone(),
            pool_size: 4,
            enabled: true,
            connect_timeout_secs: 5,
        };
        let store = Self::connect_with_retry(&config, 30).await;

        Some(Self {
            _container: container,
            store: Arc::new(store),
            url,
            prefix: format!("test:{}", Uuid::new_v4().simple()),
        })
    }

    /// Returns the store.
    pub fn store(&self) -> Arc<dyn StorePoolInterface> {
        Arc::clone(&self.store)
    }

    /// Returns the Redis URL.
    #[allow(dead_code)]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `name` namespaced to this test.
    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }

    /// Connects with retry logic while the server boots.
    async fn connect_with_retry(config: &RedisConfig, max_attempts: u32) -> RedisStore {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match RedisStore::connect(config).await {
                Ok(store) => return store,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!(
                            "Failed to connect to Redis after {} attempts: {}",
                            max_attempts, e
                        );
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}

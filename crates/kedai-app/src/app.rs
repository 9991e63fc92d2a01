//! Application lifecycle.

use crate::di::{build_module, KedaiModule};
use crate::startup::print_startup_info;
use kedai_config::{AppConfig, ListenerConfig};
use kedai_core::{HealthCheck, KedaiResult};
use kedai_store::{ListenerContainer, ListenerHandle, LoggingListener, RedisStore, StorePoolInterface};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Connection attempts made before startup gives up.
const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);

/// A running Kedai instance.
pub struct App {
    config: AppConfig,
    module: KedaiModule,
    listener: Option<ListenerHandle>,
}

impl App {
    /// Connects to Redis, builds the DI module and starts the channel listener.
    pub async fn start(config: AppConfig) -> KedaiResult<Self> {
        let store = connect_store(&config).await?;

        let health = store.check().await;
        info!(component = store.name(), status = ?health, "Health check");

        let module = build_module(&config, &store);
        let listener = match module.store() {
            Some(store) if config.listener.enabled => {
                Some(start_listener(store.as_ref(), &config.listener).await?)
            }
            _ => {
                info!("Channel listener not started");
                None
            }
        };

        print_startup_info(&config, module.is_redis(), listener.is_some());

        Ok(Self {
            config,
            module,
            listener,
        })
    }

    /// Returns the configuration the app was started with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the DI module.
    #[must_use]
    pub fn module(&self) -> &KedaiModule {
        &self.module
    }

    /// Returns true while the channel listener is running.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the channel listener.
    pub async fn shutdown(self) -> KedaiResult<()> {
        if let Some(handle) = self.listener {
            if handle.is_finished() {
                warn!("Channel listener had already stopped");
            }
            handle.shutdown().await?;
        }
        info!("Shutdown complete");
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("module", &self.module)
            .field("listening", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

/// Connects to Redis, retrying while the failure is transient.
async fn connect_store(config: &AppConfig) -> KedaiResult<RedisStore> {
    let mut attempt = 1;
    loop {
        match RedisStore::connect(&config.redis).await {
            Ok(store) => return Ok(store),
            Err(e) if e.is_retriable() && attempt < CONNECT_ATTEMPTS => {
                warn!(
                    attempt,
                    error_code = e.error_code(),
                    "Redis not reachable, retrying: {}",
                    e
                );
                tokio::time::sleep(CONNECT_BACKOFF * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn start_listener(
    store: &dyn StorePoolInterface,
    config: &ListenerConfig,
) -> KedaiResult<ListenerHandle> {
    let listener = Arc::new(LoggingListener);
    let mut container = ListenerContainer::from_store(store)?;

    for channel in &config.channels {
        container.add_channel_listener(channel.clone(), listener.clone());
    }
    for pattern in &config.patterns {
        container.add_pattern_listener(pattern.clone(), listener.clone());
    }

    let handle = container.start().await?;
    info!(
        channels = ?config.channels,
        patterns = ?config.patterns,
        "Channel listener started"
    );
    Ok(handle)
}

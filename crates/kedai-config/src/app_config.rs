//! Application configuration structures.

use kedai_core::telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Pub/sub listener configuration.
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: TelemetryConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "kedai".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: usize,
    /// Enable Redis (can be disabled for local development).
    pub enabled: bool,
    /// Seconds to wait for a pooled connection or a new connection.
    pub connect_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            enabled: true,
            connect_timeout_secs: 5,
        }
    }
}

impl RedisConfig {
    /// Returns the connection timeout as a `Duration`.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default TTL for cache entries, in seconds. `0` keeps entries until evicted.
    pub default_ttl_secs: u64,
    /// Per-region TTL overrides, in seconds. Must be positive.
    pub regions: HashMap<String, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 600,
            regions: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Returns the TTL for a region, falling back to the default.
    ///
    /// `None` means entries never expire on their own.
    #[must_use]
    pub fn ttl_for(&self, region: &str) -> Option<Duration> {
        let secs = self
            .regions
            .get(region)
            .copied()
            .unwrap_or(self.default_ttl_secs);
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Returns the default TTL.
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        (self.default_ttl_secs > 0).then(|| Duration::from_secs(self.default_ttl_secs))
    }
}

/// Pub/sub listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Start the channel listener on boot.
    pub enabled: bool,
    /// Channels to subscribe to.
    pub channels: Vec<String>,
    /// Glob patterns to subscribe to.
    pub patterns: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: vec!["my-channel".to_string()],
            patterns: Vec::new(),
        }
    }
}

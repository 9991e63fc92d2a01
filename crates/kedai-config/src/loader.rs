//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use kedai_core::KedaiError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Environment variable prefix for overrides, e.g. `KEDAI_REDIS__URL`.
pub const ENV_PREFIX: &str = "KEDAI";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `KEDAI_` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, KedaiError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, KedaiError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The previous configuration stays active if the new one fails to load.
    pub async fn reload(&self) -> Result<(), KedaiError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, KedaiError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("KEDAI_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // Not committed to version control
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("listener.channels")
                .with_list_parse_key("listener.patterns")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_kedai_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_kedai_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration, reporting every problem at once.
    fn validate_config(config: &AppConfig) -> Result<(), KedaiError> {
        if !config.redis.enabled {
            warn!("Redis is disabled; caching and storage will be unavailable");
        }

        ConfigValidator::validate(config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            KedaiError::Configuration(message)
        })
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_kedai_error(err: ConfigError) -> KedaiError {
    KedaiError::Configuration(err.to_string())
}

//! Configuration validation module.
//!
//! Collects every problem in the configuration at once instead of failing
//! on the first bad value at runtime.

use crate::AppConfig;
use kedai_core::telemetry::TelemetryConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Pool size must be at least one.
    EmptyPool,
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: usize, maximum: usize },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// A region, channel or pattern name is invalid.
    InvalidName { kind: String, value: String },
    /// A cache region TTL of zero would expire entries immediately.
    ZeroTtl { region: String },
    /// Listener enabled without anything to listen to.
    NoListenerTopics,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPool => write!(f, "Redis pool size must be at least 1"),
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidName { kind, value } => {
                write!(f, "Invalid {} name: '{}'", kind, value)
            }
            Self::ZeroTtl { region } => {
                write!(f, "Cache region '{}' has a zero TTL", region)
            }
            Self::NoListenerTopics => {
                write!(f, "Listener is enabled but no channels or patterns are configured")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: usize = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_listener(&config.listener, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates Redis configuration.
    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        match Url::parse(&config.url) {
            Ok(url) if url.scheme() == "redis" || url.scheme() == "rediss" => {}
            Ok(_) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: e.to_string(),
            }),
        }

        if config.pool_size == 0 {
            errors.push(ConfigValidationError::EmptyPool);
        } else if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    /// Validates cache regions.
    fn validate_cache(config: &crate::CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        let mut regions: Vec<_> = config.regions.iter().collect();
        regions.sort();

        for (region, ttl) in regions {
            if kedai_core::rules::valid_name(region).is_err() {
                errors.push(ConfigValidationError::InvalidName {
                    kind: "cache region".to_string(),
                    value: region.clone(),
                });
            }
            if *ttl == 0 {
                errors.push(ConfigValidationError::ZeroTtl {
                    region: region.clone(),
                });
            }
        }
    }

    /// Validates listener topics.
    fn validate_listener(config: &crate::ListenerConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        if config.channels.is_empty() && config.patterns.is_empty() {
            errors.push(ConfigValidationError::NoListenerTopics);
        }

        for channel in &config.channels {
            if kedai_core::rules::valid_name(channel).is_err() {
                errors.push(ConfigValidationError::InvalidName {
                    kind: "channel".to_string(),
                    value: channel.clone(),
                });
            }
        }

        for pattern in &config.patterns {
            if pattern.trim().is_empty() {
                errors.push(ConfigValidationError::InvalidName {
                    kind: "pattern".to_string(),
                    value: pattern.clone(),
                });
            }
        }
    }

    /// Validates observability configuration.
    fn validate_observability(config: &TelemetryConfig, errors: &mut Vec<ConfigValidationError>) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

//! Tracing subscriber initialisation.

use crate::KedaiResult;
use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether to print the event target.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            with_target: default_with_target(),
        }
    }
}

impl TelemetryConfig {
    /// Returns the filter directive used when `RUST_LOG` is absent.
    #[must_use]
    pub fn default_directive(&self) -> String {
        format!("{},kedai=debug", self.log_level.to_lowercase())
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> KedaiResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let result = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target),
            )
            .try_init(),
    };

    result.map_err(|e| crate::KedaiError::Internal(format!("Failed to initialize tracing: {}", e)))?;

    tracing::debug!(
        log_level = %config.log_level,
        log_format = ?config.log_format,
        "Tracing initialized"
    );

    Ok(())
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> KedaiResult<()> {
    Ok(())
}

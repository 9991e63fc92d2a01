//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Kedai.
///
/// A record that is simply absent is never an error: lookups return
/// `Ok(None)`. Everything here is a fault the caller has to deal with.
#[derive(Error, Debug)]
pub enum KedaiError {
    // ============ Domain Errors ============
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// The key-value store could not be reached (refused, dropped, pool exhausted).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The key-value store rejected a command.
    #[error("Store error: {0}")]
    Store(String),

    /// Cache backend error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Stored data does not match the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KedaiError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Store(_) => "STORE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization<T: Into<String>>(message: T) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a store-unavailable error.
    #[must_use]
    pub fn store_unavailable<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if retrying the same call could succeed.
    ///
    /// Only connectivity failures qualify; a rejected command fails again.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Timeout(_))
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for KedaiError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
            Self::StoreUnavailable(err.to_string())
        } else {
            Self::Store(err.to_string())
        }
    }
}

#[cfg(feature = "redis")]
impl From<deadpool_redis::PoolError> for KedaiError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        Self::StoreUnavailable(format!("Failed to get Redis connection: {}", err))
    }
}

impl From<serde_json::Error> for KedaiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON serialization error: {}", err))
    }
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

//! Backend-neutral cache contract.
//!
//! Backends store opaque strings; [`JsonCache`] layers serde on top so the
//! trait object stays usable behind `Arc<dyn CacheInterface>`.

use async_trait::async_trait;
use kedai_core::KedaiResult;
use serde::{de::DeserializeOwned, Serialize};
use shaku::Interface;
use std::time::Duration;

/// A key/value cache with optional per-entry expiry.
///
/// A disabled backend misses on every read and accepts writes as no-ops.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Reads an entry. Expired entries read as `None`.
    async fn get_raw(&self, key: &str) -> KedaiResult<Option<String>>;

    /// Writes an entry. With `ttl` of `None` it stays until evicted.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> KedaiResult<()>;

    /// Removes an entry, reporting whether one was present.
    async fn delete(&self, key: &str) -> KedaiResult<bool>;

    async fn exists(&self, key: &str) -> KedaiResult<bool>;

    /// Removes every key matching a glob (`*` and `?`) and returns how many went.
    async fn delete_pattern(&self, pattern: &str) -> KedaiResult<u64>;

    fn is_enabled(&self) -> bool;
}

/// JSON encoding over any [`CacheInterface`].
#[async_trait]
pub trait JsonCache: CacheInterface {
    /// Reads and decodes an entry. A value that fails to decode is a
    /// `Serialization` error, not a miss.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> KedaiResult<Option<T>> {
        self.get_raw(key)
            .await?
            .map(|json| serde_json::from_str(&json).map_err(Into::into))
            .transpose()
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> KedaiResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<C: CacheInterface + ?Sized> JsonCache for C {}

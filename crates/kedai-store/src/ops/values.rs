//! String value commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

/// String value commands.
pub struct ValueOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> ValueOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Sets a value with no expiry.
    pub async fn set(&self, key: &str, value: &str) -> KedaiResult<()> {
        let mut conn = self.store.get_conn().await?;
        conn.set::<_, _, ()>(key, value).await?;
        debug!(key, "SET");
        Ok(())
    }

    /// Sets a value that expires after `ttl` (whole seconds, at least one).
    pub async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> KedaiResult<()> {
        let secs = ttl.as_secs().max(1);
        let mut conn = self.store.get_conn().await?;
        conn.set_ex::<_, _, ()>(key, value, secs).await?;
        debug!(key, ttl_secs = secs, "SETEX");
        Ok(())
    }

    /// Gets a value; `None` if the key is absent or expired.
    pub async fn get(&self, key: &str) -> KedaiResult<Option<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.get(key).await?)
    }

    /// Atomically adds `by` to an integer value, creating it at zero.
    pub async fn increment(&self, key: &str, by: i64) -> KedaiResult<i64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.incr(key, by).await?)
    }
}

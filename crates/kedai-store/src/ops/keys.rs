//! Key-level commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

/// Remaining lifetime of a key, as reported by `PTTL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist.
    Missing,
    /// The key exists and has no expiry.
    Persistent,
    /// The key expires after this long.
    Expires(Duration),
}

impl KeyTtl {
    fn from_reply(millis: i64) -> Self {
        match millis {
            -2 => Self::Missing,
            millis if millis < 0 => Self::Persistent,
            millis => Self::Expires(Duration::from_millis(millis.unsigned_abs())),
        }
    }

    /// Returns the expiry, if the key has one.
    #[must_use]
    pub const fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Expires(d) => Some(*d),
            Self::Missing | Self::Persistent => None,
        }
    }
}

/// Key-level commands.
pub struct KeyOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> KeyOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Deletes keys, returning how many existed.
    pub async fn delete(&self, keys: &[&str]) -> KedaiResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.store.get_conn().await?;
        let deleted: u64 = conn.del(keys).await?;
        debug!(requested = keys.len(), deleted, "Deleted keys");
        Ok(deleted)
    }

    /// Returns true if the key exists.
    pub async fn exists(&self, key: &str) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.exists(key).await?)
    }

    /// Sets a key's time to live. Returns false if the key does not exist.
    ///
    /// Durations are rounded down to whole seconds, with a floor of one.
    pub async fn expire(&self, key: &str, ttl: Duration) -> KedaiResult<bool> {
        let secs = i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX);
        let mut conn = self.store.get_conn().await?;
        Ok(conn.expire(key, secs).await?)
    }

    /// Returns a key's remaining time to live, to the millisecond.
    pub async fn ttl(&self, key: &str) -> KedaiResult<KeyTtl> {
        let mut conn = self.store.get_conn().await?;
        let reply: i64 = conn.pttl(key).await?;
        Ok(KeyTtl::from_reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_reply_mapping() {
        assert_eq!(KeyTtl::from_reply(-2), KeyTtl::Missing);
        assert_eq!(KeyTtl::from_reply(-1), KeyTtl::Persistent);
        assert_eq!(
            KeyTtl::from_reply(2_950),
            KeyTtl::Expires(Duration::from_millis(2_950))
        );
        assert_eq!(KeyTtl::from_reply(0).remaining(), Some(Duration::ZERO));
        assert_eq!(KeyTtl::Persistent.remaining(), None);
    }
}

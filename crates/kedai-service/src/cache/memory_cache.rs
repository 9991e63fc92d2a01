//! In-memory cache implementation.
//!
//! Used when Redis is disabled and in unit tests. Expiry is lazy: an
//! expired entry is dropped the next time it is touched.

use super::CacheInterface;
use async_trait::async_trait;
use kedai_core::KedaiResult;
use parking_lot::Mutex;
use shaku::Component;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: String, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// Process-local cache backed by a mutex-guarded map.
#[derive(Component, Default)]
#[shaku(interface = CacheInterface)]
pub struct MemoryCacheService {
    #[shaku(default)]
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheService {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| !entry.is_expired());
        entries.len()
    }

    /// Returns true if no live entry is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheInterface for MemoryCacheService {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> KedaiResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> KedaiResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> KedaiResult<bool> {
        let removed = self.entries.lock().remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }

    async fn exists(&self, key: &str) -> KedaiResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> KedaiResult<u64> {
        let mut entries = self.entries.lock();
        let before = entries.len();
        let mut expired = 0;
        entries.retain(|key, entry| {
            if entry.is_expired() {
                expired += 1;
                false
            } else {
                !glob_matches(pattern, key)
            }
        });
        let deleted = (before - entries.len() - expired) as u64;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}

impl std::fmt::Debug for MemoryCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheService")
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}

/// Redis-style glob match supporting `*`, `?` and backslash escapes.
fn glob_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();
    matches_from(&pattern, &key)
}

fn matches_from(pattern: &[char], key: &[char]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some(('*', rest)) => (0..=key.len()).any(|skip| matches_from(rest, &key[skip..])),
        Some(('?', rest)) => !key.is_empty() && matches_from(rest, &key[1..]),
        Some(('\\', rest)) if !rest.is_empty() => {
            key.first() == Some(&rest[0]) && matches_from(&rest[1..], &key[1..])
        }
        Some((c, rest)) => key.first() == Some(c) && matches_from(rest, &key[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::JsonCache;

    #[test]
    fn test_glob_matches() {
        assert!(glob_matches("*", "anything"));
        assert!(glob_matches("products::*", "products::P-001"));
        assert!(!glob_matches("products::*", "scores::P-001"));
        assert!(glob_matches("user:?", "user:1"));
        assert!(!glob_matches("user:?", "user:12"));
        assert!(glob_matches("a\\*b::*", "a*b::x"));
        assert!(!glob_matches("a\\*b::*", "aXb::x"));
        assert!(glob_matches("exact", "exact"));
        assert!(!glob_matches("exact", "exact2"));
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCacheService::new();

        cache.set("k", &"value".to_string(), None).await.unwrap();
        assert_eq!(cache.get::<String>("k").await.unwrap().as_deref(), Some("value"));
        assert!(cache.exists("k").await.unwrap());

        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert_eq!(cache.get::<String>("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = MemoryCacheService::new();
        cache
            .set_raw("short", "1", Some(Duration::from_secs(2)))
            .await
            .unwrap();
        cache.set_raw("forever", "2", None).await.unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;

        assert_eq!(cache.get_raw("short").await.unwrap(), None);
        assert_eq!(cache.get_raw("forever").await.unwrap().as_deref(), Some("2"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_pattern_only_touches_matches() {
        let cache = MemoryCacheService::new();
        cache.set_raw("products::1", "a", None).await.unwrap();
        cache.set_raw("products::2", "b", None).await.unwrap();
        cache.set_raw("scores::1", "c", None).await.unwrap();

        assert_eq!(cache.delete_pattern("products::*").await.unwrap(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.exists("scores::1").await.unwrap());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_serialization_error() {
        let cache = MemoryCacheService::new();
        cache.set_raw("n", "not json", None).await.unwrap();

        let err = cache.get::<u32>("n").await.unwrap_err();
        assert!(matches!(err, kedai_core::KedaiError::Serialization(_)));
    }
}

//! Collection views bound to a single Redis key.
//!
//! Each view owns its key and a handle to the store, so it can be passed
//! around like a collection without repeating the key at every call.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A Redis list seen as an append-only sequence.
#[derive(Clone)]
pub struct RedisList {
    store: Arc<dyn StorePoolInterface>,
    key: String,
}

impl RedisList {
    /// Binds a list view to `key`.
    pub fn new(store: Arc<dyn StorePoolInterface>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The bound key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends an element.
    pub async fn push(&self, value: &str) -> KedaiResult<u64> {
        self.store.lists().right_push(&self.key, &[value]).await
    }

    /// Appends several elements in order.
    pub async fn extend(&self, values: &[&str]) -> KedaiResult<u64> {
        if values.is_empty() {
            return self.len().await;
        }
        self.store.lists().right_push(&self.key, values).await
    }

    /// Returns the element at `index`.
    pub async fn get(&self, index: isize) -> KedaiResult<Option<String>> {
        self.store.lists().index(&self.key, index).await
    }

    /// Removes and returns the first element.
    pub async fn pop_front(&self) -> KedaiResult<Option<String>> {
        self.store.lists().left_pop(&self.key).await
    }

    /// Number of elements.
    pub async fn len(&self) -> KedaiResult<u64> {
        self.store.lists().len(&self.key).await
    }

    /// Returns true if the list is empty or absent.
    pub async fn is_empty(&self) -> KedaiResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Every element, head first.
    pub async fn to_vec(&self) -> KedaiResult<Vec<String>> {
        self.store.lists().range(&self.key, 0, -1).await
    }

    /// Deletes the list.
    pub async fn clear(&self) -> KedaiResult<()> {
        self.store.keys().delete(&[self.key.as_str()]).await?;
        Ok(())
    }
}

/// A Redis set seen as a set of strings.
#[derive(Clone)]
pub struct RedisSet {
    store: Arc<dyn StorePoolInterface>,
    key: String,
}

impl RedisSet {
    /// Binds a set view to `key`.
    pub fn new(store: Arc<dyn StorePoolInterface>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The bound key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds a member. Returns false if it was already present.
    pub async fn insert(&self, member: &str) -> KedaiResult<bool> {
        Ok(self.store.sets().add(&self.key, &[member]).await? > 0)
    }

    /// Removes a member. Returns true if it was present.
    pub async fn remove(&self, member: &str) -> KedaiResult<bool> {
        Ok(self.store.sets().remove(&self.key, &[member]).await? > 0)
    }

    /// Membership test.
    pub async fn contains(&self, member: &str) -> KedaiResult<bool> {
        self.store.sets().is_member(&self.key, member).await
    }

    /// Number of members.
    pub async fn len(&self) -> KedaiResult<u64> {
        self.store.sets().card(&self.key).await
    }

    /// Every member.
    pub async fn members(&self) -> KedaiResult<HashSet<String>> {
        self.store.sets().members(&self.key).await
    }

    /// Deletes the set.
    pub async fn clear(&self) -> KedaiResult<()> {
        self.store.keys().delete(&[self.key.as_str()]).await?;
        Ok(())
    }
}

/// A Redis sorted set seen as a set of scored members.
#[derive(Clone)]
pub struct RedisZSet {
    store: Arc<dyn StorePoolInterface>,
    key: String,
}

impl RedisZSet {
    /// Binds a sorted set view to `key`.
    pub fn new(store: Arc<dyn StorePoolInterface>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The bound key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds a member or updates its score.
    pub async fn insert(&self, member: &str, score: f64) -> KedaiResult<bool> {
        self.store.zsets().add(&self.key, member, score).await
    }

    /// Removes a member.
    pub async fn remove(&self, member: &str) -> KedaiResult<bool> {
        self.store.zsets().remove(&self.key, member).await
    }

    /// A member's score.
    pub async fn score(&self, member: &str) -> KedaiResult<Option<f64>> {
        self.store.zsets().score(&self.key, member).await
    }

    /// Removes and returns the lowest-scored member.
    pub async fn pop_first(&self) -> KedaiResult<Option<(String, f64)>> {
        self.store.zsets().pop_min(&self.key).await
    }

    /// Removes and returns the highest-scored member.
    pub async fn pop_last(&self) -> KedaiResult<Option<(String, f64)>> {
        self.store.zsets().pop_max(&self.key).await
    }

    /// Number of members.
    pub async fn len(&self) -> KedaiResult<u64> {
        self.store.zsets().card(&self.key).await
    }

    /// Every member in ascending score order.
    pub async fn members(&self) -> KedaiResult<Vec<String>> {
        self.store.zsets().range(&self.key, 0, -1).await
    }

    /// Deletes the sorted set.
    pub async fn clear(&self) -> KedaiResult<()> {
        self.store.keys().delete(&[self.key.as_str()]).await?;
        Ok(())
    }
}

/// A Redis hash seen as a string map.
#[derive(Clone)]
pub struct RedisMap {
    store: Arc<dyn StorePoolInterface>,
    key: String,
}

impl RedisMap {
    /// Binds a map view to `key`.
    pub fn new(store: Arc<dyn StorePoolInterface>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The bound key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sets a field. Returns true if the field is new.
    pub async fn insert(&self, field: &str, value: &str) -> KedaiResult<bool> {
        self.store.hashes().put(&self.key, field, value).await
    }

    /// Gets a field.
    pub async fn get(&self, field: &str) -> KedaiResult<Option<String>> {
        self.store.hashes().get(&self.key, field).await
    }

    /// Removes a field. Returns true if it existed.
    pub async fn remove(&self, field: &str) -> KedaiResult<bool> {
        self.store.hashes().delete(&self.key, field).await
    }

    /// Returns true if the field exists.
    pub async fn contains_key(&self, field: &str) -> KedaiResult<bool> {
        Ok(self.get(field).await?.is_some())
    }

    /// Number of fields.
    pub async fn len(&self) -> KedaiResult<u64> {
        self.store.hashes().len(&self.key).await
    }

    /// Every field and value.
    pub async fn entries(&self) -> KedaiResult<HashMap<String, String>> {
        self.store.hashes().entries(&self.key).await
    }

    /// Deletes the hash.
    pub async fn clear(&self) -> KedaiResult<()> {
        self.store.keys().delete(&[self.key.as_str()]).await?;
        Ok(())
    }
}

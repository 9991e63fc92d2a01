//! Set commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;
use std::collections::HashSet;

/// Set commands.
pub struct SetOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> SetOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Adds members, returning how many were not already present.
    pub async fn add(&self, key: &str, members: &[&str]) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.sadd(key, members).await?)
    }

    /// Removes members, returning how many were present.
    pub async fn remove(&self, key: &str, members: &[&str]) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.srem(key, members).await?)
    }

    /// Returns all members.
    pub async fn members(&self, key: &str) -> KedaiResult<HashSet<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.smembers(key).await?)
    }

    /// Returns true if `member` is in the set.
    pub async fn is_member(&self, key: &str, member: &str) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.sismember(key, member).await?)
    }

    /// Returns the number of members.
    pub async fn card(&self, key: &str) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.scard(key).await?)
    }
}

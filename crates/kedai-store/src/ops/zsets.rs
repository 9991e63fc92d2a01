//! Sorted set commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;

/// Sorted set commands.
pub struct ZSetOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> ZSetOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Adds a member or updates its score. Returns true if the member is new.
    pub async fn add(&self, key: &str, member: &str, score: f64) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        let added: u64 = conn.zadd(key, member, score).await?;
        Ok(added > 0)
    }

    /// Removes a member. Returns true if it was present.
    pub async fn remove(&self, key: &str, member: &str) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        let removed: u64 = conn.zrem(key, member).await?;
        Ok(removed > 0)
    }

    /// Removes and returns the highest-scored member.
    pub async fn pop_max(&self, key: &str) -> KedaiResult<Option<(String, f64)>> {
        let mut conn = self.store.get_conn().await?;
        let popped: Vec<(String, f64)> = conn.zpopmax(key, 1).await?;
        Ok(popped.into_iter().next())
    }

    /// Removes and returns the lowest-scored member.
    pub async fn pop_min(&self, key: &str) -> KedaiResult<Option<(String, f64)>> {
        let mut conn = self.store.get_conn().await?;
        let popped: Vec<(String, f64)> = conn.zpopmin(key, 1).await?;
        Ok(popped.into_iter().next())
    }

    /// Returns members by ascending score between two inclusive ranks.
    pub async fn range(&self, key: &str, start: isize, stop: isize) -> KedaiResult<Vec<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.zrange(key, start, stop).await?)
    }

    /// Like [`range`](Self::range), with scores.
    pub async fn range_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> KedaiResult<Vec<(String, f64)>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.zrange_withscores(key, start, stop).await?)
    }

    /// Returns a member's score.
    pub async fn score(&self, key: &str, member: &str) -> KedaiResult<Option<f64>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.zscore(key, member).await?)
    }

    /// Returns the number of members.
    pub async fn card(&self, key: &str) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.zcard(key).await?)
    }
}

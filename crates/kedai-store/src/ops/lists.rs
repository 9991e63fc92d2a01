//! List commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;

/// List commands.
pub struct ListOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> ListOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Appends values to the tail, returning the new length.
    pub async fn right_push(&self, key: &str, values: &[&str]) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.rpush(key, values).await?)
    }

    /// Prepends values to the head, returning the new length.
    ///
    /// Values are pushed one after another, so the last one ends up first.
    pub async fn left_push(&self, key: &str, values: &[&str]) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.lpush(key, values).await?)
    }

    /// Removes and returns the head.
    pub async fn left_pop(&self, key: &str) -> KedaiResult<Option<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.lpop(key, None).await?)
    }

    /// Removes and returns the tail.
    pub async fn right_pop(&self, key: &str) -> KedaiResult<Option<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.rpop(key, None).await?)
    }

    /// Returns elements between two inclusive indices; negative indices count from the tail.
    pub async fn range(&self, key: &str, start: isize, stop: isize) -> KedaiResult<Vec<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.lrange(key, start, stop).await?)
    }

    /// Returns the element at `index`.
    pub async fn index(&self, key: &str, index: isize) -> KedaiResult<Option<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.lindex(key, index).await?)
    }

    /// Returns the list length; zero when absent.
    pub async fn len(&self, key: &str) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.llen(key).await?)
    }
}

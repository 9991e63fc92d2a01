//! Hash commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;
use std::collections::HashMap;

/// Hash commands.
pub struct HashOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> HashOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Sets one field. Returns true if the field is new.
    pub async fn put(&self, key: &str, field: &str, value: &str) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        let added: u64 = conn.hset(key, field, value).await?;
        Ok(added > 0)
    }

    /// Sets several fields at once.
    pub async fn put_all(&self, key: &str, fields: &[(&str, &str)]) -> KedaiResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.store.get_conn().await?;
        conn.hset_multiple::<_, _, _, ()>(key, fields).await?;
        Ok(())
    }

    /// Gets one field.
    pub async fn get(&self, key: &str, field: &str) -> KedaiResult<Option<String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.hget(key, field).await?)
    }

    /// Gets every field; empty when the key is absent.
    pub async fn entries(&self, key: &str) -> KedaiResult<HashMap<String, String>> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.hgetall(key).await?)
    }

    /// Deletes one field. Returns true if it existed.
    pub async fn delete(&self, key: &str, field: &str) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        let removed: u64 = conn.hdel(key, field).await?;
        Ok(removed > 0)
    }

    /// Returns the number of fields.
    pub async fn len(&self, key: &str) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.hlen(key).await?)
    }
}

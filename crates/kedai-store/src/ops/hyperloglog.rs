//! HyperLogLog commands.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;

/// HyperLogLog commands.
pub struct HyperLogLogOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> HyperLogLogOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Adds elements. Returns true if the estimate changed.
    pub async fn add(&self, key: &str, elements: &[&str]) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.pfadd(key, elements).await?)
    }

    /// Estimates the cardinality of the union of `keys`.
    pub async fn count(&self, keys: &[&str]) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.pfcount(keys).await?)
    }

    /// Merges `sources` into `destination`.
    pub async fn merge(&self, destination: &str, sources: &[&str]) -> KedaiResult<()> {
        let mut conn = self.store.get_conn().await?;
        conn.pfmerge::<_, _, ()>(destination, sources).await?;
        Ok(())
    }
}

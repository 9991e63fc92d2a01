//! Publishing side of pub/sub.

use crate::StorePoolInterface;
use kedai_core::KedaiResult;
use redis::AsyncCommands;
use tracing::debug;

/// Publishing side of pub/sub. Subscribing lives in [`ListenerContainer`].
///
/// [`ListenerContainer`]: crate::ListenerContainer
pub struct PubSubOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> PubSubOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Publishes a message, returning how many subscribers received it.
    pub async fn publish(&self, channel: &str, message: &str) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        let receivers: u64 = conn.publish(channel, message).await?;
        debug!(channel, receivers, "Published message");
        Ok(receivers)
    }
}

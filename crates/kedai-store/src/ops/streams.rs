//! Stream and consumer group commands.

use crate::StorePoolInterface;
use kedai_core::{KedaiError, KedaiResult};
use redis::streams::{StreamId, StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::debug;

/// Where a new consumer group starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupStart {
    /// Only entries appended after the group is created (`$`).
    #[default]
    Latest,
    /// Every entry already in the stream (`0`).
    Beginning,
}

impl GroupStart {
    const fn as_id(self) -> &'static str {
        match self {
            Self::Latest => "$",
            Self::Beginning => "0",
        }
    }
}

/// One stream entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Entry id, e.g. `1700000000000-0`.
    pub id: String,
    /// Field/value pairs.
    pub fields: HashMap<String, String>,
}

impl TryFrom<StreamId> for StreamRecord {
    type Error = KedaiError;

    fn try_from(entry: StreamId) -> Result<Self, Self::Error> {
        let fields = entry
            .map
            .iter()
            .map(|(field, value)| {
                redis::from_redis_value::<String>(value)
                    .map(|value| (field.clone(), value))
                    .map_err(|e| {
                        KedaiError::serialization(format!(
                            "Stream field '{}' of entry {} is not a string: {}",
                            field, entry.id, e
                        ))
                    })
            })
            .collect::<KedaiResult<HashMap<_, _>>>()?;

        Ok(Self {
            id: entry.id,
            fields,
        })
    }
}

/// Stream and consumer group commands.
pub struct StreamOps<'a> {
    store: &'a dyn StorePoolInterface,
}

impl<'a> StreamOps<'a> {
    pub(crate) fn new(store: &'a dyn StorePoolInterface) -> Self {
        Self { store }
    }

    /// Appends an entry with a server-assigned id and returns the id.
    pub async fn add(&self, key: &str, fields: &[(&str, &str)]) -> KedaiResult<String> {
        if fields.is_empty() {
            return Err(KedaiError::validation("A stream entry needs at least one field"));
        }
        let mut conn = self.store.get_conn().await?;
        let id: String = conn.xadd(key, "*", fields).await?;
        debug!(key, id = %id, "XADD");
        Ok(id)
    }

    /// Creates a consumer group, creating the stream if needed.
    ///
    /// Returns false when the group already exists.
    pub async fn create_group(&self, key: &str, group: &str, start: GroupStart) -> KedaiResult<bool> {
        let mut conn = self.store.get_conn().await?;
        let result: redis::RedisResult<()> = conn
            .xgroup_create_mkstream(key, group, start.as_id())
            .await;

        match result {
            Ok(()) => {
                debug!(key, group, "Created consumer group");
                Ok(true)
            }
            Err(e) if e.code() == Some("BUSYGROUP") => {
                debug!(key, group, "Consumer group already exists");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads up to `count` entries never delivered to `group`, on behalf of `consumer`.
    ///
    /// Entries stay pending until [`ack`](Self::ack)ed.
    pub async fn read_group(
        &self,
        key: &str,
        group: &str,
        consumer: &str,
        count: usize,
    ) -> KedaiResult<Vec<StreamRecord>> {
        let options = StreamReadOptions::default().group(group, consumer).count(count);
        let mut conn = self.store.get_conn().await?;
        let reply: Option<StreamReadReply> = conn.xread_options(&[key], &[">"], &options).await?;

        let records = reply
            .into_iter()
            .flat_map(|reply| reply.keys)
            .flat_map(|stream| stream.ids)
            .map(StreamRecord::try_from)
            .collect::<KedaiResult<Vec<_>>>()?;

        debug!(key, group, consumer, read = records.len(), "XREADGROUP");
        Ok(records)
    }

    /// Acknowledges entries for a group, returning how many were pending.
    pub async fn ack(&self, key: &str, group: &str, ids: &[&str]) -> KedaiResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.store.get_conn().await?;
        Ok(conn.xack(key, group, ids).await?)
    }

    /// Returns the number of entries.
    pub async fn len(&self, key: &str) -> KedaiResult<u64> {
        let mut conn = self.store.get_conn().await?;
        Ok(conn.xlen(key).await?)
    }
}

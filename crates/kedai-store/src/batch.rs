//! Pipelined and transactional command batches.

use crate::StorePoolInterface;
use kedai_core::{KedaiError, KedaiResult};
use redis::{Pipeline, Value};
use std::time::Duration;
use tracing::debug;

/// How a batch is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// One round trip, no isolation.
    Pipeline,
    /// Wrapped in MULTI/EXEC: other clients never see a partial batch.
    Transaction,
}

/// A queue of write commands executed in one round trip.
///
/// ```ignore
/// let statuses = Batch::pipeline()
///     .set_ex("a", "1", Duration::from_secs(2))
///     .set_ex("b", "2", Duration::from_secs(2))
///     .execute(store.as_ref())
///     .await?;
/// ```
pub struct Batch {
    pipe: Pipeline,
    mode: BatchMode,
    queued: usize,
}

impl Batch {
    /// Starts a plain pipeline.
    #[must_use]
    pub fn pipeline() -> Self {
        Self::with_mode(BatchMode::Pipeline)
    }

    /// Starts a MULTI/EXEC transaction.
    #[must_use]
    pub fn transaction() -> Self {
        Self::with_mode(BatchMode::Transaction)
    }

    fn with_mode(mode: BatchMode) -> Self {
        let mut pipe = redis::pipe();
        if mode == BatchMode::Transaction {
            pipe.atomic();
        }
        Self {
            pipe,
            mode,
            queued: 0,
        }
    }

    /// Returns the batch mode.
    #[must_use]
    pub const fn mode(&self) -> BatchMode {
        self.mode
    }

    /// Number of queued commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.queued
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.queued == 0
    }

    /// Queues `SET`.
    #[must_use]
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.pipe.set(key, value);
        self.queued += 1;
        self
    }

    /// Queues `SETEX`.
    #[must_use]
    pub fn set_ex(mut self, key: &str, value: &str, ttl: Duration) -> Self {
        self.pipe.set_ex(key, value, ttl.as_secs().max(1));
        self.queued += 1;
        self
    }

    /// Queues `DEL`.
    #[must_use]
    pub fn delete(mut self, key: &str) -> Self {
        self.pipe.del(key);
        self.queued += 1;
        self
    }

    /// Queues `RPUSH`.
    #[must_use]
    pub fn right_push(mut self, key: &str, value: &str) -> Self {
        self.pipe.rpush(key, value);
        self.queued += 1;
        self
    }

    /// Queues `SADD`.
    #[must_use]
    pub fn add_to_set(mut self, key: &str, member: &str) -> Self {
        self.pipe.sadd(key, member);
        self.queued += 1;
        self
    }

    /// Queues `SREM`.
    #[must_use]
    pub fn remove_from_set(mut self, key: &str, member: &str) -> Self {
        self.pipe.srem(key, member);
        self.queued += 1;
        self
    }

    /// Queues `HSET` of several fields.
    #[must_use]
    pub fn hash_put(mut self, key: &str, fields: &[(&str, &str)]) -> Self {
        self.pipe.hset_multiple(key, fields);
        self.queued += 1;
        self
    }

    /// Queues `EXPIRE`.
    #[must_use]
    pub fn expire(mut self, key: &str, ttl: Duration) -> Self {
        let secs = i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX);
        self.pipe.expire(key, secs);
        self.queued += 1;
        self
    }

    /// Sends the batch and returns one status per queued command.
    ///
    /// A status is `true` for an `OK` reply or a positive integer reply.
    pub async fn execute(self, store: &dyn StorePoolInterface) -> KedaiResult<Vec<bool>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = store.get_conn().await?;
        let replies: Vec<Value> = self.pipe.query_async(&mut conn).await?;

        if replies.len() != self.queued {
            return Err(KedaiError::Store(format!(
                "Batch of {} commands returned {} replies",
                self.queued,
                replies.len()
            )));
        }

        let statuses: Vec<bool> = replies.iter().map(reply_status).collect();
        debug!(
            mode = ?self.mode,
            commands = self.queued,
            succeeded = statuses.iter().filter(|ok| **ok).count(),
            "Executed batch"
        );
        Ok(statuses)
    }
}

fn reply_status(reply: &Value) -> bool {
    match reply {
        Value::Okay => true,
        Value::SimpleString(s) => s.eq_ignore_ascii_case("OK"),
        Value::Int(n) => *n > 0,
        Value::Boolean(b) => *b,
        _ => false,
    }
}

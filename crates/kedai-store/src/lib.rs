//! # Kedai Store
//!
//! Redis access for Kedai: a pooled [`RedisStore`] behind the injectable
//! [`StorePoolInterface`], typed command families for every Redis data type,
//! pipelined and transactional [`Batch`]es, single-key collection views and a
//! pub/sub [`ListenerContainer`].

mod batch;
mod collections;
mod listener;
pub mod ops;
mod store;

pub use batch::{Batch, BatchMode};
pub use collections::{RedisList, RedisMap, RedisSet, RedisZSet};
pub use listener::{
    ForwardingListener, ListenerContainer, ListenerHandle, LoggingListener, Message,
    MessageListener,
};
pub use ops::{GroupStart, KeyTtl, StreamRecord};
pub use store::{RedisStore, RedisStoreParameters, StorePoolInterface};

// Re-export the pool types used in the public interface
pub use deadpool_redis::{Connection, Pool};

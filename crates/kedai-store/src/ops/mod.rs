//! Typed command families.
//!
//! Each family is a cheap borrowing view over a [`StorePoolInterface`]; every
//! call checks a connection out of the pool and returns it when done.
//!
//! [`StorePoolInterface`]: crate::StorePoolInterface

mod hashes;
mod hyperloglog;
mod keys;
mod lists;
mod pubsub;
mod sets;
mod streams;
mod values;
mod zsets;

pub use hashes::HashOps;
pub use hyperloglog::HyperLogLogOps;
pub use keys::{KeyOps, KeyTtl};
pub use lists::ListOps;
pub use pubsub::PubSubOps;
pub use sets::SetOps;
pub use streams::{GroupStart, StreamOps, StreamRecord};
pub use values::ValueOps;
pub use zsets::ZSetOps;

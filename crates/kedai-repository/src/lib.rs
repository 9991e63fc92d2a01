//! # Kedai Repository
//!
//! Product storage behind the [`ProductRepository`] trait.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository>
//! RedisProductRepository         (one hash per product, TTL as key expiry)
//!   ↓  Arc<dyn StorePoolInterface>
//! Redis
//! ```
//!
//! [`InMemoryProductRepository`] implements the same contract without Redis.

pub mod memory;
pub mod redis_impl;
pub mod traits;

pub use memory::InMemoryProductRepository;
pub use redis_impl::{ProductKeys, RedisProductRepository};
pub use traits::*;

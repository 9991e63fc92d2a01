//! Caching infrastructure for the service layer.
//!
//! A [`CacheInterface`] backend (Redis or in-memory) stores JSON strings.
//! [`CacheManager`] hands out named [`CacheRegion`]s on top of it, each with
//! its own key prefix and TTL.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;
mod region;

pub use cache_interface::{CacheInterface, JsonCache};
pub use memory_cache::MemoryCacheService;
pub use redis_cache::RedisCacheService;
pub use region::{CacheManager, CacheManagerInterface, CacheManagerParameters, CacheRegion};

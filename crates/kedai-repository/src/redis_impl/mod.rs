//! Redis-backed repository implementation.
//!
//! Each product is a hash at `products:{id}` with fields `id`, `name` and
//! (when set) `price`. A product's `ttl` becomes the expiry of its hash, and
//! the `products` set indexes every saved id.

mod codec;
mod product_repository;

pub use codec::ProductKeys;
pub use product_repository::RedisProductRepository;

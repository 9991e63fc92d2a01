//! # Kedai Service
//!
//! Cache abstraction and the cache-aside [`ProductService`].

pub mod cache;
pub mod product_service;
pub mod r#impl;

pub use cache::*;
pub use product_service::*;
pub use r#impl::{ProductServiceImpl, PRODUCTS_REGION};

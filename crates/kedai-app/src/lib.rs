//! # Kedai Application
//!
//! Wires the store, repository, cache and product service together with
//! Shaku and owns the lifecycle of the pub/sub channel listener.

pub mod app;
pub mod di;
pub mod startup;

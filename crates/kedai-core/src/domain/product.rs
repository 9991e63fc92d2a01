//! Product entity.

use crate::ProductId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// A sellable item.
///
/// `ttl` is not data about the product itself: when present, the stored
/// record expires `ttl` seconds after it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Product {
    /// Unique identifier, also the storage and cache key.
    pub id: ProductId,

    /// Display name.
    #[validate(length(max = 255))]
    pub name: String,

    /// Price in the smallest currency unit.
    #[validate(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,

    /// Time-to-live of the stored record, in seconds.
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl Product {
    /// Creates a product with no price and no expiry.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: None,
            ttl: None,
        }
    }

    /// Sets the price.
    #[must_use]
    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the record time-to-live in seconds.
    #[must_use]
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl = Some(ttl_secs);
        self
    }

    /// Returns the record time-to-live as a `Duration`.
    #[must_use]
    pub fn ttl_duration(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_secs)
    }

    /// Renames the product.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Changes or clears the price.
    pub fn change_price(&mut self, price: Option<i64>) {
        self.price = price;
    }
}

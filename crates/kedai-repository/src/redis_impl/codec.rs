//! Product hash layout.

use kedai_core::{KedaiError, KedaiResult, Product, ProductId};
use std::collections::HashMap;

const FIELD_ID: &str = "id";
const FIELD_NAME: &str = "name";
const FIELD_PRICE: &str = "price";

/// Redis key builder for product records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductKeys {
    keyspace: String,
}

impl ProductKeys {
    /// Create a new key builder with the given keyspace.
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
        }
    }

    /// Hash key of one product.
    #[must_use]
    pub fn record(&self, id: &ProductId) -> String {
        format!("{}:{}", self.keyspace, id)
    }

    /// Set of every saved product id.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.keyspace
    }
}

impl Default for ProductKeys {
    fn default() -> Self {
        Self::new("products")
    }
}

/// Flattens a product into hash fields. `ttl` is not a field.
pub(crate) fn to_fields(product: &Product) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        (FIELD_ID, product.id.to_string()),
        (FIELD_NAME, product.name.clone()),
    ];
    if let Some(price) = product.price {
        fields.push((FIELD_PRICE, price.to_string()));
    }
    fields
}

/// Rebuilds a product from hash fields and the key's remaining lifetime.
pub(crate) fn from_fields(
    mut fields: HashMap<String, String>,
    ttl: Option<u64>,
) -> KedaiResult<Product> {
    let id = fields
        .remove(FIELD_ID)
        .ok_or_else(|| KedaiError::serialization("Stored product has no 'id' field"))?;
    let id = ProductId::new(id)
        .map_err(|e| KedaiError::serialization(format!("Stored product id is invalid: {}", e)))?;

    let name = fields.remove(FIELD_NAME).ok_or_else(|| {
        KedaiError::serialization(format!("Stored product '{}' has no 'name' field", id))
    })?;

    let price = fields
        .remove(FIELD_PRICE)
        .map(|raw| {
            raw.parse::<i64>().map_err(|e| {
                KedaiError::serialization(format!(
                    "Stored product '{}' has a non-integer price '{}': {}",
                    id, raw, e
                ))
            })
        })
        .transpose()?;

    Ok(Product {
        id,
        name,
        price,
        ttl,
    })
}

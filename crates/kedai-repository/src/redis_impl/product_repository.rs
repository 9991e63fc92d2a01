//! Redis product repository implementation.

use super::codec::{from_fields, to_fields, ProductKeys};
use crate::traits::{reported_ttl, ProductRepository, StoredProduct};
use async_trait::async_trait;
use kedai_core::{KedaiError, KedaiResult, Product, ProductId, ValidateExt};
use kedai_store::{Batch, KeyTtl, StorePoolInterface};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// Redis product repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct RedisProductRepository {
    #[shaku(inject)]
    store: Arc<dyn StorePoolInterface>,
    #[shaku(default)]
    keys: ProductKeys,
}

impl RedisProductRepository {
    /// Creates a new Redis product repository using the `products` keyspace.
    #[must_use]
    pub fn new(store: Arc<dyn StorePoolInterface>) -> Self {
        Self::with_keys(store, ProductKeys::default())
    }

    /// Creates a repository under a custom keyspace.
    #[must_use]
    pub fn with_keys(store: Arc<dyn StorePoolInterface>, keys: ProductKeys) -> Self {
        Self { store, keys }
    }

    /// Returns the key builder.
    #[must_use]
    pub fn keys(&self) -> &ProductKeys {
        &self.keys
    }

    /// Index members whose record still exists; stale ids are pruned.
    async fn live_ids(&self) -> KedaiResult<Vec<ProductId>> {
        let members = self.store.sets().members(self.keys.index()).await?;
        let mut ids = Vec::with_capacity(members.len());

        for member in members {
            let id = ProductId::new_unchecked(member);
            if self.store.keys().exists(&self.keys.record(&id)).await? {
                ids.push(id);
            } else {
                self.prune(&id).await;
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Drops an expired id from the index. Failure only leaves a stale id behind.
    async fn prune(&self, id: &ProductId) {
        if let Err(e) = self
            .store
            .sets()
            .remove(self.keys.index(), &[id.as_str()])
            .await
        {
            warn!(product_id = %id, "Failed to prune expired product from index: {}", e);
        }
    }
}

#[async_trait]
impl ProductRepository for RedisProductRepository {
    async fn find_stored(&self, id: &ProductId) -> KedaiResult<Option<StoredProduct>> {
        debug!("Finding product by id: {}", id);

        let key = self.keys.record(id);
        let fields = self.store.hashes().entries(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        let expires_in = match self.store.keys().ttl(&key).await? {
            // Expired between the two reads
            KeyTtl::Missing => return Ok(None),
            KeyTtl::Persistent => None,
            KeyTtl::Expires(remaining) => Some(remaining),
        };

        let product = from_fields(fields, expires_in.map(reported_ttl))?;
        Ok(Some(StoredProduct {
            product,
            expires_in,
        }))
    }

    async fn save(&self, product: &Product) -> KedaiResult<Product> {
        product.validate_request()?;
        debug!(product_id = %product.id, ttl = ?product.ttl, "Saving product");

        let key = self.keys.record(&product.id);
        let fields = to_fields(product);
        let field_refs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
            .collect();

        // DEL first so fields removed from the product do not linger
        let mut batch = Batch::transaction()
            .delete(&key)
            .hash_put(&key, &field_refs);
        if let Some(ttl) = product.ttl_duration() {
            batch = batch.expire(&key, ttl);
        }
        batch = batch.add_to_set(self.keys.index(), product.id.as_str());

        let statuses = batch.execute(self.store.as_ref()).await?;
        // statuses[0] is the DEL, which is false for a new product
        if !statuses.get(1).copied().unwrap_or(false) {
            return Err(KedaiError::Store(format!(
                "Failed to write product '{}'",
                product.id
            )));
        }

        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> KedaiResult<bool> {
        debug!("Deleting product: {}", id);

        let statuses = Batch::transaction()
            .delete(&self.keys.record(id))
            .remove_from_set(self.keys.index(), id.as_str())
            .execute(self.store.as_ref())
            .await?;

        Ok(statuses.first().copied().unwrap_or(false))
    }

    async fn exists(&self, id: &ProductId) -> KedaiResult<bool> {
        self.store.keys().exists(&self.keys.record(id)).await
    }

    async fn find_all(&self) -> KedaiResult<Vec<Product>> {
        let mut products = Vec::new();
        for id in self.live_ids().await? {
            // Can still expire after the existence check
            if let Some(product) = self.find_by_id(&id).await? {
                products.push(product);
            }
        }
        Ok(products)
    }

    async fn count(&self) -> KedaiResult<u64> {
        Ok(self.live_ids().await?.len() as u64)
    }
}

impl std::fmt::Debug for RedisProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisProductRepository")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

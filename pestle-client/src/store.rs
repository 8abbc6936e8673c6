//! Cached product store and write-invalidation contract
//!
//! Single source of truth for the product collection. Collections are
//! cached by fetch route; a successful mutation invalidates every
//! collection entry (coarse-grained — no partial patching), and updates
//! and deletes additionally drop the entity entry. Invalidation marks
//! the cache stale; the refetch happens on the next read. Mutation
//! responses are returned to the caller but never written into the
//! cache, so cache contents always originate from a server read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use validator::Validate;

use shared::{Product, ProductCreate, ProductUpdate};

use crate::api::InventoryApi;
use crate::error::{ClientError, ClientResult};

/// Server-side fetch route a cached collection was produced by.
/// Client-side predicates never shape the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    All,
    LowStock,
    Expiring,
}

/// Cached product store over an [`InventoryApi`]
pub struct ProductStore {
    api: Arc<dyn InventoryApi>,
    collections: RwLock<HashMap<CollectionKey, Vec<Product>>>,
    entities: RwLock<HashMap<i64, Product>>,
    categories: RwLock<Option<(Instant, Vec<String>)>>,
    category_ttl: Duration,
}

impl ProductStore {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self {
            api,
            collections: RwLock::new(HashMap::new()),
            entities: RwLock::new(HashMap::new()),
            categories: RwLock::new(None),
            category_ttl: Duration::from_secs(5 * 60),
        }
    }

    /// Override the category cache lifetime.
    pub fn with_category_ttl(mut self, ttl: Duration) -> Self {
        self.category_ttl = ttl;
        self
    }

    // ========== Reads ==========

    /// The product collection for a fetch route, from cache when fresh.
    pub async fn products(&self, key: CollectionKey) -> ClientResult<Vec<Product>> {
        if let Some(cached) = self.collections.read().await.get(&key) {
            tracing::debug!(?key, "collection cache hit");
            return Ok(cached.clone());
        }
        let fetched = match key {
            CollectionKey::All => self.api.list_products().await?,
            CollectionKey::LowStock => self.api.low_stock_products().await?,
            CollectionKey::Expiring => self.api.expiring_products().await?,
        };
        tracing::debug!(?key, count = fetched.len(), "collection fetched");
        self.collections.write().await.insert(key, fetched.clone());
        Ok(fetched)
    }

    /// A single product, from cache when fresh.
    pub async fn product(&self, id: i64) -> ClientResult<Product> {
        if let Some(cached) = self.entities.read().await.get(&id) {
            tracing::debug!(id, "entity cache hit");
            return Ok(cached.clone());
        }
        let fetched = self.api.get_product(id).await?;
        self.entities.write().await.insert(id, fetched.clone());
        Ok(fetched)
    }

    /// Category names for filter options. Slow-changing; served from
    /// cache within the TTL.
    pub async fn categories(&self) -> ClientResult<Vec<String>> {
        if let Some((fetched_at, cached)) = self.categories.read().await.as_ref() {
            if fetched_at.elapsed() < self.category_ttl {
                return Ok(cached.clone());
            }
        }
        let fetched = self.api.list_categories().await?;
        *self.categories.write().await = Some((Instant::now(), fetched.clone()));
        Ok(fetched)
    }

    // ========== Mutations ==========

    /// Create a product. The payload is validated locally first; an
    /// invalid payload never reaches the network.
    pub async fn create(&self, payload: &ProductCreate) -> ClientResult<Product> {
        payload
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        let created = self.api.create_product(payload).await?;
        tracing::info!(id = created.id, name = %created.name, "product created");
        self.invalidate_collections().await;
        Ok(created)
    }

    /// Update a product; invalidates the collections and the entity entry.
    pub async fn update(&self, id: i64, payload: &ProductUpdate) -> ClientResult<Product> {
        payload
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        let updated = self.api.update_product(id, payload).await?;
        tracing::info!(id, "product updated");
        self.invalidate_collections().await;
        self.invalidate_entity(id).await;
        Ok(updated)
    }

    /// Delete a product; invalidates the collections and the entity entry.
    /// A failed delete leaves every cache entry intact.
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.api.delete_product(id).await?;
        tracing::info!(id, "product deleted");
        self.invalidate_collections().await;
        self.invalidate_entity(id).await;
        Ok(())
    }

    // ========== Invalidation ==========

    /// Drop every cached collection; the next read refetches.
    pub async fn invalidate_collections(&self) {
        self.collections.write().await.clear();
        tracing::debug!("product collections invalidated");
    }

    /// Drop one cached entity entry.
    pub async fn invalidate_entity(&self, id: i64) {
        self.entities.write().await.remove(&id);
    }
}

//! Product service with cache-aside reads and write-invalidate updates.
//!
//! - Reads by id probe the cache first. A hit never touches the store. A miss
//!   reads the store and, if the product exists, caches it for the
//!   configured TTL. Missing products are not cached.
//! - Reads by model always go to the store.
//! - Create only writes the store. Update and delete write the store first,
//!   then delete the cache entry unconditionally.
//!
//! Backend failures are returned as-is; there is no retry and no fallback
//! from a failing cache to the store.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheClient, CacheConfig, CacheStats, CacheStatsSnapshot, PopulateGuard, cache_key};
use crate::database::{Product, ProductStore};
use crate::error::Result;

/// Coordinates a product store with a cache.
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    cache: Arc<dyn CacheClient>,
    ttl_secs: u64,
    guard: Option<PopulateGuard>,
    stats: CacheStats,
}

impl ProductService {
    /// Create a new service over the given store and cache.
    pub fn new(store: Arc<dyn ProductStore>, cache: Arc<dyn CacheClient>, config: &CacheConfig) -> Self {
        debug!(
            "Product service using {} store, {} cache, ttl={}s, populate_guard={}",
            store.name(),
            cache.name(),
            config.ttl_secs,
            config.populate_guard
        );

        Self {
            store,
            cache,
            ttl_secs: config.ttl_secs,
            guard: config
                .populate_guard
                .then(|| PopulateGuard::new(config.ttl())),
            stats: CacheStats::new(),
        }
    }

    /// Create a product. The cache is not touched.
    pub async fn create_product(&self, product: Product) -> Result<Product> {
        let saved = self.store.save(product).await?;
        debug!("Created product {:?}", saved.id);
        Ok(saved)
    }

    /// Get a product by id, reading through the cache.
    pub async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>> {
        let key = cache_key(id);

        if let Some(bytes) = self.cache.get(&key).await? {
            self.stats.record_hit();
            debug!("Cache hit for {}", key);
            return Ok(Some(serde_json::from_slice(&bytes)?));
        }

        self.stats.record_miss();
        let seen = self.guard.as_ref().map(|g| (g, g.observe()));

        let Some(product) = self.store.find_by_id(id).await? else {
            debug!("Product {} not found", id);
            return Ok(None);
        };

        if let Some((guard, epoch)) = seen
            && !guard.is_current(&key, epoch)
        {
            self.stats.record_skipped_populate();
            warn!("Skipping cache populate for {}: invalidated during read", key);
            return Ok(Some(product));
        }

        let bytes = serde_json::to_vec(&product)?;
        self.cache.set(&key, bytes, self.ttl_secs).await?;

        if let Some((guard, epoch)) = seen
            && !guard.is_current(&key, epoch)
        {
            // An invalidation may have landed before our write.
            self.cache.delete(&key).await?;
            self.stats.record_skipped_populate();
            warn!("Dropped cache populate for {}: invalidated during write", key);
            return Ok(Some(product));
        }

        self.stats.record_populate();
        debug!("Cached {} for {}s", key, self.ttl_secs);
        Ok(Some(product))
    }

    /// Get all products of a model. Always served by the store.
    pub async fn get_products_by_model(&self, model: &str) -> Result<Vec<Product>> {
        self.store.find_by_model(model).await
    }

    /// Replace the product stored under `id`.
    ///
    /// `id` wins over any id carried in `product`.
    pub async fn update_product(&self, id: &str, mut product: Product) -> Result<Product> {
        product.id = Some(id.to_string());
        let updated = self.store.save(product).await?;

        self.invalidate(id).await?;
        Ok(updated)
    }

    /// Delete a product. Deleting a missing product succeeds.
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.store.delete_by_id(id).await?;
        self.invalidate(id).await
    }

    /// Snapshot of cache counters.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    async fn invalidate(&self, id: &str) -> Result<()> {
        let key = cache_key(id);
        if let Some(guard) = &self.guard {
            guard.invalidate(&key);
        }

        self.cache.delete(&key).await?;
        self.stats.record_invalidation();
        debug!("Invalidated {}", key);
        Ok(())
    }
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("store", &self.store.name())
            .field("cache", &self.cache.name())
            .field("ttl_secs", &self.ttl_secs)
            .field("populate_guard", &self.guard.is_some())
            .finish()
    }
}

//! Test doubles for driving `ProductService` against observable backends.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};

use product_cache::cache::{CacheClient, CacheConfig, MokaCacheClient};
use product_cache::database::{MemoryProductStore, Product, ProductStore};
use product_cache::{Error, ProductService, Result};

// == Counting Store ==

/// In-memory store that counts calls and can refuse reads.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryProductStore,
    pub saves: AtomicUsize,
    pub find_by_id_calls: AtomicUsize,
    pub find_by_model_calls: AtomicUsize,
    pub deletes: AtomicUsize,
    refuse_reads: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `find_by_id` fail.
    pub fn refuse_reads(&self) {
        self.refuse_reads.store(true, Ordering::SeqCst);
    }

    pub fn find_by_id_count(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn find_by_model_count(&self) -> usize {
        self.find_by_model_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for CountingStore {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn save(&self, product: Product) -> Result<Product> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(product).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse_reads.load(Ordering::SeqCst) {
            return Err(Error::store("store must not be read"));
        }
        self.inner.find_by_id(id).await
    }

    async fn find_by_model(&self, model: &str) -> Result<Vec<Product>> {
        self.find_by_model_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_model(model).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }
}

// == Recording Cache ==

/// Moka-backed cache that records traffic and can be made to fail.
pub struct RecordingCache {
    inner: MokaCacheClient,
    pub gets: AtomicUsize,
    pub sets: Mutex<Vec<(String, Vec<u8>, u64)>>,
    pub deletes: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            inner: MokaCacheClient::new(1_000),
            gets: AtomicUsize::new(0),
            sets: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every later call fail with `CacheUnavailable`.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.lock().len()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::cache("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheClient for RecordingCache {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        self.check()?;
        self.sets.lock().push((key.to_string(), value.clone(), ttl_secs));
        self.inner.set(key, value, ttl_secs).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        self.deletes.lock().push(key.to_string());
        self.inner.delete(key).await
    }
}

// == Gated Store ==

/// Store whose next `find_by_id` snapshots the current value, then waits
/// for the test to open the gate before returning that snapshot.
pub struct GatedStore {
    pub inner: MemoryProductStore,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub entered: Notify,
}

impl GatedStore {
    /// Returns the store and the sender that opens the gate.
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let store = Self {
            inner: MemoryProductStore::new(),
            gate: Mutex::new(Some(rx)),
            entered: Notify::new(),
        };
        (store, tx)
    }
}

#[async_trait]
impl ProductStore for GatedStore {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn save(&self, product: Product) -> Result<Product> {
        self.inner.save(product).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let snapshot = self.inner.find_by_id(id).await?;

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            self.entered.notify_one();
            let _ = gate.await;
        }

        Ok(snapshot)
    }

    async fn find_by_model(&self, model: &str) -> Result<Vec<Product>> {
        self.inner.find_by_model(model).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.inner.delete_by_id(id).await
    }
}

// == Gated Cache ==

/// Cache whose next `set` waits for the test to open the gate before
/// writing, so an invalidation can land between the populate decision and
/// the write itself.
pub struct GatedCache {
    pub inner: MokaCacheClient,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub entered: Notify,
}

impl GatedCache {
    /// Returns the cache and the sender that opens the gate.
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let cache = Self {
            inner: MokaCacheClient::new(1_000),
            gate: Mutex::new(Some(rx)),
            entered: Notify::new(),
        };
        (cache, tx)
    }
}

#[async_trait]
impl CacheClient for GatedCache {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            self.entered.notify_one();
            let _ = gate.await;
        }

        self.inner.set(key, value, ttl_secs).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }
}

// == Helpers ==

pub const TEST_TTL: u64 = 300;

pub fn service_with(
    store: Arc<dyn ProductStore>,
    cache: Arc<dyn CacheClient>,
    config: CacheConfig,
) -> ProductService {
    ProductService::new(store, cache, &config)
}

pub fn laptop() -> Product {
    let specs = serde_json::json!({
        "processor": "Intel i9",
        "memory": {"size": "32GB", "type": "DDR5"},
        "ports": ["usb-c", "hdmi", {"thunderbolt": 4}]
    });
    let warranty = serde_json::json!({"years": 2, "coverage": {"accidental": false}});

    Product::new("laptop", "Workstation 16", 2499.99)
        .with_specs(specs.as_object().cloned().unwrap_or_default())
        .with_warranty(warranty.as_object().cloned().unwrap_or_default())
}

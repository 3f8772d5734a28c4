//! In-process cache client over Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::sync::Cache;

use super::CacheClient;
use crate::error::Result;

/// Stored bytes plus the TTL they were written with.
#[derive(Clone)]
struct CachedBytes {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

/// Expires each entry after the TTL given at write time.
///
/// Reads leave the deadline untouched.
struct WriteTimeExpiry;

impl Expiry<String, CachedBytes> for WriteTimeExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBytes,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedBytes,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache client backed by a `moka::sync::Cache`.
///
/// Cloning is cheap and shares the same underlying cache.
#[derive(Clone)]
pub struct MokaCacheClient {
    inner: Cache<String, CachedBytes>,
}

impl MokaCacheClient {
    /// Create a new cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(WriteTimeExpiry)
            .build();

        Self { inner }
    }

    /// Check if a key exists and hasn't expired.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Get the number of entries in the cache.
    ///
    /// Note: This may not be perfectly accurate due to concurrent operations.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

#[async_trait]
impl CacheClient for MokaCacheClient {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.get(key).map(|entry| entry.bytes.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        let entry = CachedBytes {
            bytes: value.into(),
            ttl: Duration::from_secs(ttl_secs),
        };
        self.inner.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.invalidate(key);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.inner.invalidate_all();
        Ok(())
    }
}

impl std::fmt::Debug for MokaCacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheClient")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

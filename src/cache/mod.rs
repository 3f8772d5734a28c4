//! Cache module - byte-level cache clients for the product service.
//!
//! ## Architecture
//!
//! - `CacheClient` - Capability consumed by `ProductService`: get/set/delete
//!   of opaque bytes with a per-write TTL in seconds
//! - `RedisCacheClient` - Shared Redis server (production)
//! - `MokaCacheClient` - In-process Moka cache (tests and local runs)
//! - `PopulateGuard` - Optional record of recent invalidations closing the
//!   read/write race
//! - `CacheStats` - Hit/miss/populate/invalidation counters
//!
//! Clients are constructed at startup, injected as `Arc<dyn CacheClient>`,
//! and closed explicitly at shutdown.

mod config;
mod guard;
mod memory;
mod redis_cache;
mod stats;

use async_trait::async_trait;

use crate::error::Result;

pub use config::{CACHE_KEY_PREFIX, CacheConfig, DEFAULT_MAX_CAPACITY, cache_key};
pub use guard::PopulateGuard;
pub use memory::MokaCacheClient;
pub use redis_cache::RedisCacheClient;
pub use stats::{CacheStats, CacheStatsSnapshot};

/// Key/value cache holding serialized values with a TTL.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Return the value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, expiring `ttl_secs` seconds from now.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Release the client's resources. Called once at shutdown.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

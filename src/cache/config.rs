//! Cache configuration.

use std::time::Duration;

/// Prefix joined with a product id to form its cache key.
pub const CACHE_KEY_PREFIX: &str = "product::";

/// Default capacity of the in-process cache backend.
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Build the cache key for a product id.
pub fn cache_key(id: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{id}")
}

/// Configuration for product caching.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for every cache entry, in seconds.
    /// Uniform across entries; never refreshed on a hit.
    pub ttl_secs: u64,

    /// Maximum number of entries held by the in-process backend.
    /// Ignored by Redis.
    pub max_capacity: u64,

    /// Skip or undo a populate that raced an update/delete of the same id.
    pub populate_guard: bool,
}

impl CacheConfig {
    /// Create a new cache config with the given TTL.
    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            max_capacity: DEFAULT_MAX_CAPACITY,
            populate_guard: true,
        }
    }

    /// Set max capacity for the in-process backend (builder pattern).
    #[must_use]
    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Enable or disable the populate guard.
    #[must_use]
    pub fn populate_guard(mut self, enabled: bool) -> Self {
        self.populate_guard = enabled;
        self
    }

    /// TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("65f0c0ffee"), "product::65f0c0ffee");
        assert_ne!(cache_key("a"), cache_key("b"));
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::with_ttl(60).max_capacity(5).populate_guard(false);
        assert_eq!(config.ttl(), Duration::from_secs(60));
        assert_eq!(config.max_capacity, 5);
        assert!(!config.populate_guard);
    }
}

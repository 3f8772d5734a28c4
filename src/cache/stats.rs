//! Cache statistics.
//!
//! Counters are updated lock-free by the product service and read as a
//! point-in-time snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Live counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    populates: AtomicU64,
    skipped_populates: AtomicU64,
    invalidations: AtomicU64,
}

/// Snapshot of [`CacheStats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStatsSnapshot {
    /// Reads served from the cache
    pub hits: u64,
    /// Reads that went to the store
    pub misses: u64,
    /// Cache entries written after a miss
    pub populates: u64,
    /// Populates dropped because an invalidation raced them
    pub skipped_populates: u64,
    /// Cache deletes issued by update/delete
    pub invalidations: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_populate(&self) {
        self.populates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_populate(&self) {
        self.skipped_populates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStatsSnapshot {
            hits,
            misses,
            populates: self.populates.load(Ordering::Relaxed),
            skipped_populates: self.skipped_populates.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

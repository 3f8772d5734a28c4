//! Populate guard.
//!
//! Detects a cache-miss read that raced an update or delete of the same
//! product, so the read does not leave its stale value behind. The protocol:
//!
//! - writers call [`PopulateGuard::invalidate`] after the store write and
//!   before deleting the cache entry;
//! - readers take an [`Epoch`] before reading the store, skip the populate
//!   if it is no longer current, and check again after writing the cache.
//!
//! Either the writer's invalidation is seen by the reader's final check, or
//! the writer's cache delete lands after the reader's populate. Only
//! invalidations issued through this process are observed.
//!
//! Invalidations are stamped from one process-wide counter and remembered
//! per key for a fixed window. A read that outlives the window is treated
//! as stale, so a forgotten invalidation can never pass for a current one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use moka::sync::Cache;

/// Point in time a reader observed the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    stamp: u64,
    at: Instant,
}

/// Recent invalidations, stamped and expired after `window`.
pub struct PopulateGuard {
    clock: AtomicU64,
    invalidated: Cache<String, u64>,
    window: Duration,
}

impl PopulateGuard {
    /// Create a guard that remembers each invalidation for `window`.
    pub fn new(window: Duration) -> Self {
        let invalidated = Cache::builder().time_to_live(window).build();

        Self {
            clock: AtomicU64::new(0),
            invalidated,
            window,
        }
    }

    /// Epoch to compare against once the store read returns.
    pub fn observe(&self) -> Epoch {
        Epoch {
            stamp: self.clock.load(Ordering::SeqCst),
            at: Instant::now(),
        }
    }

    /// Whether `key` was not invalidated since `seen` was observed.
    pub fn is_current(&self, key: &str, seen: Epoch) -> bool {
        // Past the window an invalidation may already be forgotten
        if seen.at.elapsed() >= self.window {
            return false;
        }

        match self.invalidated.get(key) {
            Some(stamp) => stamp <= seen.stamp,
            None => true,
        }
    }

    /// Record an invalidation of `key`.
    pub fn invalidate(&self, key: &str) {
        let stamp = self.clock.fetch_add(1, Ordering::SeqCst) + 1;

        // Concurrent writers may land out of order; keep the newest stamp.
        self.invalidated
            .entry(key.to_string())
            .and_upsert_with(|current| match current {
                Some(entry) => entry.into_value().max(stamp),
                None => stamp,
            });
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> u64 {
        self.invalidated.run_pending_tasks();
        self.invalidated.entry_count()
    }
}

impl std::fmt::Debug for PopulateGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopulateGuard")
            .field("window", &self.window)
            .field("tracked_keys", &self.invalidated.entry_count())
            .finish()
    }
}

//! Cache Statistics Module
//!
//! Tracks cache lookups, evictions, expirations and compaction passes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a fresh entry
    pub hits: u64,
    /// Number of lookups that returned nothing (absent or stale)
    pub misses: u64,
    /// Subset of misses where the entry was present but stale
    pub expired_misses: u64,
    /// Number of entries evicted by the LRU policy, including resize evictions
    pub evictions: u64,
    /// Number of stale entries removed by cleanup
    pub expirations: u64,
    /// Number of history compaction passes run
    pub aggregation_runs: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts a lookup that found a stale entry.
    pub fn record_expired_miss(&mut self) {
        self.misses += 1;
        self.expired_misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_aggregation(&mut self) {
        self.aggregation_runs += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

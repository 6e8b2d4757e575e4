//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and periodic history compaction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cache::{
    Aggregator, CacheEntry, CacheStats, Clock, EntityKey, LruTracker, MetricSample, SystemClock,
    DEFAULT_AGGREGATION_INTERVAL, DEFAULT_MAX_ENTRIES,
};

// == Cache Store ==
/// Per-entity metrics storage with LRU eviction and TTL support.
///
/// Not synchronized; see [`crate::cache::MetricsCache`] for the shared
/// handle.
#[derive(Debug)]
pub struct CacheStore {
    /// Entity -> cached metrics
    entries: HashMap<EntityKey, CacheEntry>,
    /// LRU access tracker, one node per entry
    lru: LruTracker<EntityKey>,
    /// History compaction scheduling
    aggregator: Aggregator,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum entry age before it is treated as stale
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore backed by the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries; 0 means the default
    /// * `ttl` - Maximum entry age before a lookup misses
    /// * `aggregation_interval` - Minimum spacing between compaction passes; zero means the default
    pub fn new(max_entries: usize, ttl: Duration, aggregation_interval: Duration) -> Self {
        Self::with_clock(max_entries, ttl, aggregation_interval, Arc::new(SystemClock))
    }

    /// Creates a new CacheStore with an explicit time source.
    pub fn with_clock(
        max_entries: usize,
        ttl: Duration,
        aggregation_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            aggregator: Aggregator::new(coerce_interval(aggregation_interval)),
            stats: CacheStats::new(),
            max_entries: coerce_capacity(max_entries),
            ttl,
            clock,
        }
    }

    // == Get ==
    /// Retrieves the cached metrics for `key`.
    ///
    /// Returns None if the key is absent or its entry is older than the TTL.
    /// A stale entry is left in place for [`CacheStore::clean_expired`].
    /// On a hit the entry becomes the most recently used.
    pub fn get(&mut self, key: &EntityKey) -> Option<CacheEntry> {
        let now = self.clock.now();
        let ttl = self.ttl;

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now, ttl) {
            self.stats.record_expired_miss();
            return None;
        }

        entry.last_accessed = now;
        let found = entry.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(found)
    }

    // == Set ==
    /// Records a fresh sample for `key`.
    ///
    /// Runs a compaction pass first when one is due. A new key arriving at
    /// capacity evicts the least recently used entry; an existing key has
    /// the sample appended to its history.
    pub fn set(&mut self, key: EntityKey, sample: MetricSample) {
        let now = self.clock.now();

        if self.aggregator.is_due(now) {
            self.aggregator.run(self.entries.values_mut(), now);
            self.stats.record_aggregation();
        }

        match self.entries.get_mut(&key) {
            Some(entry) => entry.apply(sample, now),
            None => {
                if self.entries.len() >= self.max_entries {
                    self.evict_lru();
                }
                let entry = CacheEntry::new(key.clone(), sample, now);
                self.entries.insert(key.clone(), entry);
            }
        }

        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear ==
    /// Drops every entry and all recency state.
    ///
    /// Returns the number of entries dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        dropped
    }

    // == Cleanup Expired ==
    /// Removes all entries older than the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn clean_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;

        let expired_keys: Vec<EntityKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Capacity ==
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Changes the capacity, evicting least recently used entries until the
    /// store fits. Zero is replaced by [`DEFAULT_MAX_ENTRIES`].
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = coerce_capacity(max_entries);

        let mut evicted = 0;
        while self.entries.len() > self.max_entries {
            if self.evict_lru().is_none() {
                break;
            }
            evicted += 1;
        }
        self.stats.set_total_entries(self.entries.len());

        info!(
            "Cache capacity set to {} ({} entries evicted)",
            self.max_entries, evicted
        );
    }

    // == Aggregation Interval ==
    pub fn aggregation_interval(&self) -> Duration {
        self.aggregator.interval()
    }

    /// Zero is replaced by [`DEFAULT_AGGREGATION_INTERVAL`].
    pub fn set_aggregation_interval(&mut self, interval: Duration) {
        let interval = coerce_interval(interval);
        self.aggregator.set_interval(interval);
        info!("Aggregation interval set to {:?}", interval);
    }

    pub fn last_aggregation_run(&self) -> Option<DateTime<Utc>> {
        self.aggregator.last_run()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks presence without touching recency or checking freshness.
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<EntityKey> {
        self.lru.iter().cloned().collect()
    }

    // == Eviction ==
    /// Removes the least recently used entry, if any.
    fn evict_lru(&mut self) -> Option<EntityKey> {
        let victim = self.lru.evict_oldest()?;
        self.entries.remove(&victim);
        self.stats.record_eviction();
        debug!("Evicted least recently used entry {}", victim);
        Some(victim)
    }
}

fn coerce_capacity(max_entries: usize) -> usize {
    if max_entries == 0 {
        DEFAULT_MAX_ENTRIES
    } else {
        max_entries
    }
}

fn coerce_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        DEFAULT_AGGREGATION_INTERVAL
    } else {
        interval
    }
}

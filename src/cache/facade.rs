//! Shared Cache Handle
//!
//! Thread-safe handle over [`CacheStore`] used by HTTP handlers and the
//! background tasks.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheStats, CacheStore, Clock, EntityKey, MetricSample};
use crate::error::Result;

// == Metrics Cache ==
/// Cheaply clonable handle to one cache instance.
///
/// A single lock orders every operation. `get` takes the write lock because
/// a hit reorders the LRU list. Compaction runs inside `set` while the write
/// lock is held.
#[derive(Debug, Clone)]
pub struct MetricsCache {
    inner: Arc<RwLock<CacheStore>>,
}

impl MetricsCache {
    // == Constructor ==
    pub fn new(max_entries: usize, ttl: Duration, aggregation_interval: Duration) -> Self {
        Self::from_store(CacheStore::new(max_entries, ttl, aggregation_interval))
    }

    pub fn with_clock(
        max_entries: usize,
        ttl: Duration,
        aggregation_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::from_store(CacheStore::with_clock(
            max_entries,
            ttl,
            aggregation_interval,
            clock,
        ))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Creates a cache from server configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.max_entries,
            config.ttl(),
            config.aggregation_interval(),
        )
    }

    // == Entry Operations ==
    /// Returns a snapshot of the entry, or None on a miss or stale entry.
    pub async fn get(&self, key: &EntityKey) -> Option<CacheEntry> {
        self.inner.write().await.get(key)
    }

    pub async fn set(&self, key: EntityKey, sample: MetricSample) {
        self.inner.write().await.set(key, sample);
    }

    /// Returns the number of entries dropped.
    pub async fn clear(&self) -> usize {
        let dropped = self.inner.write().await.clear();
        info!("Metrics cache cleared ({} entries dropped)", dropped);
        dropped
    }

    /// Returns the number of stale entries removed.
    pub async fn clean_expired(&self) -> usize {
        self.inner.write().await.clean_expired()
    }

    // == Introspection ==
    pub async fn size(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn ttl(&self) -> Duration {
        self.inner.read().await.ttl()
    }

    // == Configuration ==
    pub async fn max_entries(&self) -> usize {
        self.inner.read().await.max_entries()
    }

    pub async fn set_max_entries(&self, max_entries: usize) {
        self.inner.write().await.set_max_entries(max_entries);
    }

    pub async fn aggregation_interval(&self) -> Duration {
        self.inner.read().await.aggregation_interval()
    }

    pub async fn set_aggregation_interval(&self, interval: Duration) {
        self.inner.write().await.set_aggregation_interval(interval);
    }

    // == Persistence ==
    /// Reserved for persisting the cache. Currently a no-op.
    pub async fn save_to_storage(&self, path: impl AsRef<Path>) -> Result<()> {
        debug!(
            "Persistence not enabled, skipping save to {}",
            path.as_ref().display()
        );
        Ok(())
    }

    /// Reserved for restoring the cache. Currently a no-op.
    pub async fn load_from_storage(&self, path: impl AsRef<Path>) -> Result<()> {
        debug!(
            "Persistence not enabled, skipping load from {}",
            path.as_ref().display()
        );
        Ok(())
    }
}

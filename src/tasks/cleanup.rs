//! TTL Cleanup Task
//!
//! Background task that periodically removes stale cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{coerce_period, DEFAULT_CLEANUP_INTERVAL};
use crate::cache::MetricsCache;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs.
/// Each run takes the cache write lock for the duration of one sweep. A zero
/// interval is replaced by [`DEFAULT_CLEANUP_INTERVAL`].
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = MetricsCache::new(1000, Duration::from_secs(300), Duration::from_secs(3600));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: MetricsCache, interval: Duration) -> JoinHandle<()> {
    let interval = coerce_period("Cleanup", interval, DEFAULT_CLEANUP_INTERVAL);
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.clean_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

//! Metrics Collector Task
//!
//! Periodically pulls fresh samples from a metrics source and records them
//! in the cache. The cache never calls the source itself.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{coerce_period, DEFAULT_COLLECT_INTERVAL};
use crate::cache::{EntityKey, MetricSample, MetricsCache};
use crate::error::SourceError;

/// Produces a fresh reading for an entity from the monitored system.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_sample(&self, key: &EntityKey) -> Result<MetricSample, SourceError>;
}

/// Fetches one sample per key and records each success.
///
/// Returns the number of samples recorded. Failures are logged and skipped;
/// an entity the source no longer knows is only logged at debug level.
pub async fn collect_once(
    cache: &MetricsCache,
    source: &dyn MetricsSource,
    keys: &[EntityKey],
) -> usize {
    let mut recorded = 0;
    for key in keys {
        match source.fetch_sample(key).await {
            Ok(sample) => {
                cache.set(key.clone(), sample).await;
                recorded += 1;
            }
            Err(SourceError::EntityNotFound(entity)) => {
                debug!("Metrics source has no entity {}, skipping", entity)
            }
            Err(e) => warn!("Failed to fetch metrics for {}: {}", key, e),
        }
    }
    recorded
}

/// Spawns a background task that collects samples for `keys` every
/// `interval`, starting immediately. A zero interval is replaced by
/// [`DEFAULT_COLLECT_INTERVAL`].
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_collector_task(
    cache: MetricsCache,
    source: Arc<dyn MetricsSource>,
    keys: Vec<EntityKey>,
    interval: Duration,
) -> JoinHandle<()> {
    let interval = coerce_period("Collector", interval, DEFAULT_COLLECT_INTERVAL);
    tokio::spawn(async move {
        info!(
            "Starting metrics collector for {} entities with interval of {:?}",
            keys.len(),
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let recorded = collect_once(&cache, source.as_ref(), &keys).await;
            debug!("Collector recorded {}/{} samples", recorded, keys.len());
        }
    })
}

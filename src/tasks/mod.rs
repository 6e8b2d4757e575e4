//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes stale cache entries at configured intervals
//! - Collector: Pulls samples from a [`MetricsSource`] into the cache

use std::time::Duration;

use tracing::warn;

mod cleanup;
mod collector;

pub use cleanup::spawn_cleanup_task;
pub use collector::{collect_once, spawn_collector_task, MetricsSource};

/// Sweep period used when the cleanup task is given a zero interval.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Fetch period used when the collector task is given a zero interval.
pub const DEFAULT_COLLECT_INTERVAL: Duration = Duration::from_secs(30);

/// Replaces a zero period with `default`.
fn coerce_period(task: &str, interval: Duration, default: Duration) -> Duration {
    if interval.is_zero() {
        warn!(
            "{} interval of zero is not allowed, using {:?}",
            task, default
        );
        default
    } else {
        interval
    }
}

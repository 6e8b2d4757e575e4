//! Cache Module
//!
//! Per-entity metrics cache with bounded capacity, LRU eviction, TTL
//! expiration and multi-resolution history compaction.

mod aggregator;
mod clock;
mod entry;
mod facade;
mod lru;
mod series;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use aggregator::{
    band_of, compact_points, compact_series, AggregationReport, Aggregator, Band, Bucket,
    HOURLY_WINDOW_DAYS, MIN_POINTS_FOR_COMPACTION, RECENT_WINDOW_HOURS,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntityKey, MetricSample};
pub use facade::MetricsCache;
pub use lru::LruTracker;
pub use series::{MetricPoint, ResourceKind, Series};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Capacity used when a non-positive capacity is configured
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Entry TTL used when none is configured
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Compaction spacing used when a zero interval is configured
pub const DEFAULT_AGGREGATION_INTERVAL: Duration = Duration::from_secs(3600);

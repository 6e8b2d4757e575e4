//! Response DTOs for the metrics cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats, MetricPoint, MetricSample, ResourceKind};

/// Response body for GET /metrics/:namespace/:name
#[derive(Debug, Clone, Serialize)]
pub struct EntityMetricsResponse {
    pub namespace: String,
    pub name: String,
    pub current: MetricSample,
    pub history: BTreeMap<ResourceKind, Vec<MetricPoint>>,
    pub last_updated: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl From<CacheEntry> for EntityMetricsResponse {
    fn from(entry: CacheEntry) -> Self {
        Self {
            namespace: entry.key.namespace().to_string(),
            name: entry.key.name().to_string(),
            current: entry.current,
            history: entry
                .history
                .into_iter()
                .map(|(kind, series)| (kind, series.points().to_vec()))
                .collect(),
            last_updated: entry.last_updated,
            last_accessed: entry.last_accessed,
        }
    }
}

/// Response body for PUT /metrics/:namespace/:name
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub message: String,
    pub key: String,
}

impl RecordResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Sample recorded for '{}'", key),
            key,
        }
    }
}

/// Response body for DELETE /metrics and POST /metrics/cleanup
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn cleared(removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            removed,
        }
    }

    pub fn expired(removed: usize) -> Self {
        Self {
            message: format!("Removed {} expired entries", removed),
            removed,
        }
    }
}

/// Response body for GET /config and PUT /config
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub max_entries: usize,
    pub ttl_secs: u64,
    pub aggregation_interval_secs: u64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

//! Cache Entry Module
//!
//! Defines the entity key, the fresh sample produced by a metrics source and
//! the cached entry holding current usage plus history.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{MetricPoint, ResourceKind, Series};

// == Entity Key ==
/// Identifies one monitored entity by namespace and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    namespace: String,
    name: String,
}

impl EntityKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

// == Metric Sample ==
/// One reading of every dimension for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// RFC 3339 timestamp of the reading
    pub timestamp: String,
    /// Current usage per dimension
    pub usage: BTreeMap<ResourceKind, f64>,
}

impl MetricSample {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            usage: BTreeMap::new(),
        }
    }

    /// Creates an empty sample stamped with the given instant.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self::new(time.to_rfc3339())
    }

    /// Builder-style helper to add one dimension.
    pub fn with(mut self, kind: ResourceKind, value: f64) -> Self {
        self.usage.insert(kind, value);
        self
    }
}

// == Cache Entry ==
/// Cached state for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub key: EntityKey,
    /// Latest sample received
    pub current: MetricSample,
    /// History per dimension
    pub history: BTreeMap<ResourceKind, Series>,
    pub last_updated: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry whose history holds just the given sample.
    pub fn new(key: EntityKey, sample: MetricSample, now: DateTime<Utc>) -> Self {
        let mut entry = Self {
            key,
            current: MetricSample::new(sample.timestamp.clone()),
            history: BTreeMap::new(),
            last_updated: now,
            last_accessed: now,
        };
        entry.apply(sample, now);
        entry
    }

    // == Apply ==
    /// Appends every dimension of `sample` to its series and makes it the
    /// current reading.
    pub fn apply(&mut self, sample: MetricSample, now: DateTime<Utc>) {
        for (kind, value) in &sample.usage {
            self.history
                .entry(*kind)
                .or_default()
                .push(MetricPoint::new(sample.timestamp.clone(), *value));
        }
        self.current = sample;
        self.last_updated = now;
        self.last_accessed = now;
    }

    // == Is Expired ==
    /// An entry is stale once its age strictly exceeds `ttl`.
    ///
    /// A `last_updated` in the future (clock stepped back) counts as fresh.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: std::time::Duration) -> bool {
        (now - self.last_updated)
            .to_std()
            .map(|age| age > ttl)
            .unwrap_or(false)
    }

    /// Returns the history of one dimension, if any was recorded.
    pub fn series(&self, kind: ResourceKind) -> Option<&Series> {
        self.history.get(&kind)
    }

    /// Total number of points across all dimensions.
    pub fn point_count(&self) -> usize {
        self.history.values().map(Series::len).sum()
    }
}

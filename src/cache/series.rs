//! Series Module
//!
//! Scalar observations and the per-dimension history built from them.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// == Resource Kind ==
/// A resource dimension tracked for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cpu,
    Memory,
    Disk,
    Network,
}

// == Metric Point ==
/// A single observation for one resource dimension.
///
/// The timestamp is kept as the RFC 3339 text it was recorded with. Points
/// whose timestamp does not parse are still stored and carried through
/// compaction unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: String,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }

    /// Creates a point stamped with the given instant.
    pub fn at(time: DateTime<Utc>, value: f64) -> Self {
        Self::new(time.to_rfc3339(), value)
    }

    /// Parses the timestamp keeping the offset it was written with.
    pub fn recorded_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }

    /// Parses the timestamp, returning None when it is malformed.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.recorded_time().map(|t| t.with_timezone(&Utc))
    }
}

// == Series ==
/// Ordered history of one resource dimension.
///
/// Append-only for producers; the aggregator replaces the whole sequence
/// with a compacted one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    points: Vec<MetricPoint>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: MetricPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Swaps in a compacted sequence.
    pub(crate) fn replace(&mut self, points: Vec<MetricPoint>) {
        self.points = points;
    }
}

impl From<Vec<MetricPoint>> for Series {
    fn from(points: Vec<MetricPoint>) -> Self {
        Self { points }
    }
}

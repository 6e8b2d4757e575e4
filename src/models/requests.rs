//! Request DTOs for the metrics cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::cache::{MetricSample, ResourceKind};

/// Request body for recording a sample (PUT /metrics/:namespace/:name)
///
/// # Fields
/// - `timestamp`: Optional RFC 3339 reading time (defaults to now)
/// - `usage`: Value per resource dimension
#[derive(Debug, Clone, Deserialize)]
pub struct SampleRequest {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub usage: BTreeMap<ResourceKind, f64>,
}

impl SampleRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.usage.is_empty() {
            return Some("Usage must contain at least one resource".to_string());
        }
        if let Some((kind, value)) = self
            .usage
            .iter()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Some(format!(
                "Usage for {:?} must be a non-negative number, got {}",
                kind, value
            ));
        }
        if let Some(ts) = &self.timestamp {
            if DateTime::parse_from_rfc3339(ts).is_err() {
                return Some(format!("Timestamp '{}' is not RFC 3339", ts));
            }
        }
        None
    }

    /// Converts into a cache sample, stamping it with `now` if no timestamp
    /// was given.
    pub fn into_sample(self, now: DateTime<Utc>) -> MetricSample {
        MetricSample {
            timestamp: self.timestamp.unwrap_or_else(|| now.to_rfc3339()),
            usage: self.usage,
        }
    }
}

/// Request body for reconfiguring the cache (PUT /config)
///
/// Fields are signed so that non-positive values reach the cache, which
/// replaces them with its defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigRequest {
    #[serde(default)]
    pub max_entries: Option<i64>,
    #[serde(default)]
    pub aggregation_interval_secs: Option<i64>,
}

impl ConfigRequest {
    /// Requested capacity, with non-positive values mapped to zero.
    pub fn capacity(&self) -> Option<usize> {
        self.max_entries
            .map(|n| usize::try_from(n.max(0)).unwrap_or(usize::MAX))
    }

    /// Requested compaction interval, with non-positive values mapped to zero.
    pub fn aggregation_interval(&self) -> Option<Duration> {
        self.aggregation_interval_secs
            .map(|secs| Duration::from_secs(secs.max(0).unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sample_request_deserialize() {
        let json = r#"{"usage": {"cpu": 0.5, "memory": 1024}}"#;
        let req: SampleRequest = serde_json::from_str(json).unwrap();
        assert!(req.timestamp.is_none());
        assert_eq!(req.usage[&ResourceKind::Cpu], 0.5);
        assert_eq!(req.usage[&ResourceKind::Memory], 1024.0);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_sample_request_unknown_resource_rejected() {
        let json = r#"{"usage": {"gpu": 1.0}}"#;
        assert!(serde_json::from_str::<SampleRequest>(json).is_err());
    }

    #[test]
    fn test_validate_empty_usage() {
        let req = SampleRequest {
            timestamp: None,
            usage: BTreeMap::new(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_negative_value() {
        let req = SampleRequest {
            timestamp: None,
            usage: BTreeMap::from([(ResourceKind::Disk, -1.0)]),
        };
        assert!(req.validate().unwrap().contains("Disk"));
    }

    #[test]
    fn test_validate_bad_timestamp() {
        let req = SampleRequest {
            timestamp: Some("last tuesday".to_string()),
            usage: BTreeMap::from([(ResourceKind::Cpu, 1.0)]),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_into_sample_defaults_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let req = SampleRequest {
            timestamp: None,
            usage: BTreeMap::from([(ResourceKind::Cpu, 1.0)]),
        };

        let sample = req.into_sample(now);
        assert_eq!(sample.timestamp, now.to_rfc3339());
    }

    #[test]
    fn test_config_request_partial() {
        let req: ConfigRequest = serde_json::from_str(r#"{"max_entries": 5}"#).unwrap();
        assert_eq!(req.capacity(), Some(5));
        assert!(req.aggregation_interval().is_none());
    }

    #[test]
    fn test_config_request_non_positive_maps_to_zero() {
        let req: ConfigRequest =
            serde_json::from_str(r#"{"max_entries": -5, "aggregation_interval_secs": -1}"#)
                .unwrap();
        assert_eq!(req.capacity(), Some(0));
        assert_eq!(req.aggregation_interval(), Some(Duration::ZERO));

        let req: ConfigRequest =
            serde_json::from_str(r#"{"max_entries": 0, "aggregation_interval_secs": 90}"#)
                .unwrap();
        assert_eq!(req.capacity(), Some(0));
        assert_eq!(req.aggregation_interval(), Some(Duration::from_secs(90)));
    }
}

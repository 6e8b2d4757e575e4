//! Aggregator Module
//!
//! Compacts per-entity history into three resolution bands:
//! - points at most 24h old are kept as recorded
//! - points between 24h and 7 days old are averaged per calendar hour
//! - points older than 7 days are averaged per calendar day
//!
//! Calendar buckets are taken from each point's own timestamp, in the UTC
//! offset it was recorded with. Ages are measured against `now` in UTC.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::{debug, info};

use crate::cache::{CacheEntry, MetricPoint, Series};

// == Constants ==
/// Series at or below this length are left untouched.
pub const MIN_POINTS_FOR_COMPACTION: usize = 24;

/// Upper age bound of the full-resolution band, in hours.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Upper age bound of the hourly band, in days.
pub const HOURLY_WINDOW_DAYS: i64 = 7;

// == Bucket ==
/// Calendar bucket of a timestamp. Day buckets carry `hour == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl Bucket {
    pub fn hour_of(time: impl Datelike + Timelike) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
        }
    }

    pub fn day_of(time: impl Datelike + Timelike) -> Self {
        Self {
            hour: 0,
            ..Self::hour_of(time)
        }
    }
}

/// Running mean for one bucket, stamped with the first point seen.
#[derive(Debug)]
struct Group {
    timestamp: String,
    sum: f64,
    count: usize,
}

impl Group {
    fn add(groups: &mut BTreeMap<Bucket, Group>, bucket: Bucket, point: &MetricPoint) {
        let group = groups.entry(bucket).or_insert_with(|| Group {
            timestamp: point.timestamp.clone(),
            sum: 0.0,
            count: 0,
        });
        group.sum += point.value;
        group.count += 1;
    }

    fn into_point(self) -> MetricPoint {
        MetricPoint::new(self.timestamp, self.sum / self.count as f64)
    }
}

// == Band Of ==
/// Age band of a point relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Recent,
    Hourly(Bucket),
    Daily(Bucket),
}

/// Classifies a point. Unparsable and future timestamps fall in the recent
/// band so they are carried through unchanged.
pub fn band_of(point: &MetricPoint, now: DateTime<Utc>) -> Band {
    let Some(time) = point.recorded_time() else {
        return Band::Recent;
    };
    let age = now - time.with_timezone(&Utc);
    if age <= chrono::Duration::hours(RECENT_WINDOW_HOURS) {
        Band::Recent
    } else if age <= chrono::Duration::days(HOURLY_WINDOW_DAYS) {
        Band::Hourly(Bucket::hour_of(time))
    } else {
        Band::Daily(Bucket::day_of(time))
    }
}

// == Compact Points ==
/// Returns the compacted form of `points`: daily means, then hourly means,
/// then the recent points in their original order.
pub fn compact_points(points: &[MetricPoint], now: DateTime<Utc>) -> Vec<MetricPoint> {
    let mut daily = BTreeMap::new();
    let mut hourly = BTreeMap::new();
    let mut recent = Vec::new();

    for point in points {
        match band_of(point, now) {
            Band::Recent => recent.push(point.clone()),
            Band::Hourly(bucket) => Group::add(&mut hourly, bucket, point),
            Band::Daily(bucket) => Group::add(&mut daily, bucket, point),
        }
    }

    let mut compacted = Vec::with_capacity(daily.len() + hourly.len() + recent.len());
    compacted.extend(daily.into_values().map(Group::into_point));
    compacted.extend(hourly.into_values().map(Group::into_point));
    compacted.extend(recent);
    compacted
}

/// Compacts a series in place. Returns false when the series was too short
/// to be worth compacting.
pub fn compact_series(series: &mut Series, now: DateTime<Utc>) -> bool {
    if series.len() <= MIN_POINTS_FOR_COMPACTION {
        return false;
    }
    let compacted = compact_points(series.points(), now);
    series.replace(compacted);
    true
}

// == Aggregation Report ==
/// Summary of one compaction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub entries: usize,
    pub series_compacted: usize,
    pub points_before: usize,
    pub points_after: usize,
}

// == Aggregator ==
/// Decides when a compaction pass is due and runs it.
#[derive(Debug)]
pub struct Aggregator {
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

impl Aggregator {
    /// Creates an aggregator whose first pass is due immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    /// A pass is due once `interval` has elapsed since the last one. A last
    /// run in the future (clock stepped back) is never due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_run {
            None => true,
            Some(last) => (now - last)
                .to_std()
                .map(|elapsed| elapsed >= self.interval)
                .unwrap_or(false),
        }
    }

    // == Run ==
    /// Compacts every series of every entry. The last-run marker is updated
    /// before any work is done.
    pub fn run<'a>(
        &mut self,
        entries: impl Iterator<Item = &'a mut CacheEntry>,
        now: DateTime<Utc>,
    ) -> AggregationReport {
        self.last_run = Some(now);

        let mut report = AggregationReport::default();
        for entry in entries {
            report.entries += 1;
            for (kind, series) in entry.history.iter_mut() {
                let before = series.len();
                report.points_before += before;
                if compact_series(series, now) {
                    report.series_compacted += 1;
                    debug!(
                        "Compacted {} {:?} history: {} -> {} points",
                        entry.key,
                        kind,
                        before,
                        series.len()
                    );
                }
                report.points_after += series.len();
            }
        }

        info!(
            "Aggregation pass: {} entries, {} series compacted, {} -> {} points",
            report.entries, report.series_compacted, report.points_before, report.points_after
        );
        report
    }
}

//! Metric data model: families, series values, and point-in-time snapshots.
//!
//! A family is declared once with a fixed label-name schema; series under it
//! are created lazily the first time a label-value combination is written and
//! live for the process lifetime. A histogram's bucket counts, sum, and count
//! sit in one value so they can only move together under the family guard.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Declared kind of a metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
    Histogram,
}

impl MetricKind {
    /// Name used in `# TYPE` exposition lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared family: fixed schema plus its lazily-created series.
pub(crate) struct MetricFamily {
    pub kind: MetricKind,
    pub help: String,
    pub label_names: Vec<String>,
    /// Ascending upper bounds; empty unless `kind == Histogram`.
    pub bucket_bounds: Vec<f64>,
    /// Series keyed by label values in schema order. The mutex is the
    /// per-family guard: every read, write, and lazy creation goes through
    /// it, so a snapshot never sees a half-applied update.
    series: Mutex<HashMap<Vec<String>, SeriesValue>>,
}

impl MetricFamily {
    pub fn new(
        kind: MetricKind,
        help: String,
        label_names: Vec<String>,
        bucket_bounds: Vec<f64>,
    ) -> Self {
        Self {
            kind,
            help,
            label_names,
            bucket_bounds,
            series: Mutex::new(HashMap::new()),
        }
    }

    /// Take the family guard, recovering from poison (a panicked writer
    /// cannot leave a torn value behind: writes complete before release).
    pub fn lock_series(&self) -> MutexGuard<'_, HashMap<Vec<String>, SeriesValue>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current value of one series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Gauge(f64),
    Counter(f64),
    Histogram(HistogramValue),
}

/// Histogram state for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramValue {
    /// Cumulative count per bound, parallel to the family's `bucket_bounds`.
    pub buckets: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramValue {
    pub(crate) fn new(bucket_len: usize) -> Self {
        Self {
            buckets: vec![0; bucket_len],
            sum: 0.0,
            count: 0,
        }
    }

    /// Record one sample: every bucket whose bound admits the sample is
    /// incremented, along with the total count and running sum.
    pub(crate) fn observe(&mut self, bounds: &[f64], sample: f64) {
        for (bucket, &bound) in self.buckets.iter_mut().zip(bounds) {
            if sample <= bound {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum += sample;
    }
}

/// Immutable copy of one family, produced by `Registry::snapshot`.
#[derive(Debug, Clone)]
pub struct FamilySnapshot {
    pub name: String,
    pub kind: MetricKind,
    pub help: String,
    pub label_names: Vec<String>,
    pub bucket_bounds: Vec<f64>,
    /// Series as (label values, value), sorted by label values.
    pub series: Vec<(Vec<String>, SeriesValue)>,
}

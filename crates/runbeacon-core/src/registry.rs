//! Process-wide metric registry.
//!
//! Families are declared once at startup and never removed. After that the
//! registry sees exactly two classes of callers: the updater task writing
//! values and scrape handlers taking snapshots. Each family carries its own
//! guard, so writers and snapshotters contend per family, never globally.

use std::sync::{Mutex, PoisonError};

use dashmap::mapref::one::Ref;
use dashmap::DashMap;

use crate::error::{Result, RunbeaconError};
use crate::model::{FamilySnapshot, HistogramValue, MetricFamily, MetricKind, SeriesValue};

/// Registry of all declared metric families.
///
/// Explicitly owned and passed by `Arc` to the updater and the HTTP state;
/// tests build as many independent registries as they like.
pub struct Registry {
    families: DashMap<String, MetricFamily>,
    /// Declaration order, so exposition output is stable scrape-to-scrape.
    order: Mutex<Vec<String>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            families: DashMap::new(),
            order: Mutex::new(Vec::new()),
        }
    }

    /// Declare a gauge or counter family. Histograms go through
    /// [`Registry::declare_histogram`] since they need bucket bounds.
    pub fn declare_family(
        &self,
        name: &str,
        kind: MetricKind,
        help: &str,
        label_names: &[&str],
    ) -> Result<()> {
        if kind == MetricKind::Histogram {
            return Err(RunbeaconError::InvalidBuckets {
                family: name.to_string(),
                reason: "histogram families must be declared with bucket bounds",
            });
        }
        self.insert_family(name, kind, help, label_names, Vec::new())
    }

    /// Declare a histogram family with fixed, strictly ascending bucket
    /// upper bounds.
    pub fn declare_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        bucket_bounds: &[f64],
    ) -> Result<()> {
        if bucket_bounds.is_empty() {
            return Err(RunbeaconError::InvalidBuckets {
                family: name.to_string(),
                reason: "bucket bounds must not be empty",
            });
        }
        if bucket_bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RunbeaconError::InvalidBuckets {
                family: name.to_string(),
                reason: "bucket bounds must be strictly ascending",
            });
        }
        self.insert_family(
            name,
            MetricKind::Histogram,
            help,
            label_names,
            bucket_bounds.to_vec(),
        )
    }

    fn insert_family(
        &self,
        name: &str,
        kind: MetricKind,
        help: &str,
        label_names: &[&str],
        bucket_bounds: Vec<f64>,
    ) -> Result<()> {
        let family = MetricFamily::new(
            kind,
            help.to_string(),
            label_names.iter().map(|l| l.to_string()).collect(),
            bucket_bounds,
        );
        match self.families.entry(name.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(RunbeaconError::DuplicateFamily(name.to_string()));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(family);
            }
        }
        // Taken after the map entry is released; snapshot locks in the
        // opposite direction.
        self.order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
        Ok(())
    }

    /// Upsert a gauge series to `value`.
    pub fn set(&self, name: &str, label_values: &[&str], value: f64) -> Result<()> {
        let family = self.family(name)?;
        family.check(name, MetricKind::Gauge, "set", label_values)?;
        let mut series = family.lock_series();
        series.insert(to_key(label_values), SeriesValue::Gauge(value));
        Ok(())
    }

    /// Add a non-negative `delta` to a counter series, creating it at 0
    /// first if absent. The series is untouched when `delta` is negative.
    pub fn increment(&self, name: &str, label_values: &[&str], delta: f64) -> Result<()> {
        let family = self.family(name)?;
        family.check(name, MetricKind::Counter, "increment", label_values)?;
        if delta < 0.0 {
            return Err(RunbeaconError::InvalidDelta {
                family: name.to_string(),
                delta,
            });
        }
        let mut series = family.lock_series();
        let entry = series
            .entry(to_key(label_values))
            .or_insert(SeriesValue::Counter(0.0));
        if let SeriesValue::Counter(total) = entry {
            *total += delta;
        }
        Ok(())
    }

    /// Record a histogram sample: all buckets admitting the sample, the
    /// total count, and the running sum move together under the guard.
    pub fn observe(&self, name: &str, label_values: &[&str], sample: f64) -> Result<()> {
        let family = self.family(name)?;
        family.check(name, MetricKind::Histogram, "observe", label_values)?;
        let bucket_len = family.bucket_bounds.len();
        let mut series = family.lock_series();
        let entry = series
            .entry(to_key(label_values))
            .or_insert_with(|| SeriesValue::Histogram(HistogramValue::new(bucket_len)));
        if let SeriesValue::Histogram(hist) = entry {
            hist.observe(&family.bucket_bounds, sample);
        }
        Ok(())
    }

    /// Consistent point-in-time copy of every family, in declaration order.
    ///
    /// Each family's series table is copied under that family's guard, so a
    /// concurrent write to a series is either fully visible or absent.
    pub fn snapshot(&self) -> Vec<FamilySnapshot> {
        let order = self
            .order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut out = Vec::with_capacity(order.len());
        for name in order {
            let Some(family) = self.families.get(&name) else {
                continue;
            };
            let mut series: Vec<(Vec<String>, SeriesValue)> = {
                let guard = family.lock_series();
                guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            };
            series.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push(FamilySnapshot {
                name,
                kind: family.kind,
                help: family.help.clone(),
                label_names: family.label_names.clone(),
                bucket_bounds: family.bucket_bounds.clone(),
                series,
            });
        }
        out
    }

    fn family(&self, name: &str) -> Result<Ref<'_, String, MetricFamily>> {
        self.families
            .get(name)
            .ok_or_else(|| RunbeaconError::UnknownFamily(name.to_string()))
    }
}

impl MetricFamily {
    fn check(
        &self,
        name: &str,
        required: MetricKind,
        op: &'static str,
        label_values: &[&str],
    ) -> Result<()> {
        if self.kind != required {
            return Err(RunbeaconError::KindMismatch {
                family: name.to_string(),
                op,
                required,
            });
        }
        if label_values.len() != self.label_names.len() {
            return Err(RunbeaconError::LabelMismatch {
                family: name.to_string(),
                expected: self.label_names.len(),
                got: label_values.len(),
            });
        }
        Ok(())
    }
}

fn to_key(label_values: &[&str]) -> Vec<String> {
    label_values.iter().map(|v| v.to_string()).collect()
}

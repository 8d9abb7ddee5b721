//! Registry operation tests: declaration, writes, and the error surface.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use runbeacon_core::{MetricKind, Registry, RunbeaconError, SeriesValue};

fn series(registry: &Registry, name: &str, labels: &[&str]) -> Option<SeriesValue> {
    registry
        .snapshot()
        .into_iter()
        .find(|f| f.name == name)?
        .series
        .into_iter()
        .find(|(values, _)| values.iter().map(String::as_str).eq(labels.iter().copied()))
        .map(|(_, value)| value)
}

#[test]
fn counter_equals_sum_of_deltas() {
    let registry = Registry::new();
    registry
        .declare_family("jobs_total", MetricKind::Counter, "Total jobs", &["status"])
        .unwrap();

    registry.increment("jobs_total", &["success"], 1.0).unwrap();
    registry.increment("jobs_total", &["success"], 2.5).unwrap();
    registry.increment("jobs_total", &["success"], 0.0).unwrap();

    assert_eq!(
        series(&registry, "jobs_total", &["success"]),
        Some(SeriesValue::Counter(3.5))
    );
}

#[test]
fn negative_delta_rejected_and_series_unchanged() {
    let registry = Registry::new();
    registry
        .declare_family("jobs_total", MetricKind::Counter, "Total jobs", &["status"])
        .unwrap();
    registry.increment("jobs_total", &["success"], 4.0).unwrap();

    let err = registry
        .increment("jobs_total", &["success"], -1.0)
        .unwrap_err();
    assert!(matches!(err, RunbeaconError::InvalidDelta { .. }));

    assert_eq!(
        series(&registry, "jobs_total", &["success"]),
        Some(SeriesValue::Counter(4.0))
    );
}

#[test]
fn negative_delta_does_not_create_series() {
    let registry = Registry::new();
    registry
        .declare_family("jobs_total", MetricKind::Counter, "Total jobs", &["status"])
        .unwrap();

    let err = registry
        .increment("jobs_total", &["failed"], -0.5)
        .unwrap_err();
    assert!(matches!(err, RunbeaconError::InvalidDelta { .. }));
    assert_eq!(series(&registry, "jobs_total", &["failed"]), None);
}

#[test]
fn duplicate_family_rejected() {
    let registry = Registry::new();
    registry
        .declare_family("uptime", MetricKind::Gauge, "Uptime", &[])
        .unwrap();
    let err = registry
        .declare_family("uptime", MetricKind::Counter, "Uptime again", &[])
        .unwrap_err();
    assert!(matches!(err, RunbeaconError::DuplicateFamily(name) if name == "uptime"));
}

#[test]
fn writes_to_undeclared_family_rejected() {
    let registry = Registry::new();
    assert!(matches!(
        registry.set("nope", &[], 1.0).unwrap_err(),
        RunbeaconError::UnknownFamily(_)
    ));
    assert!(matches!(
        registry.increment("nope", &[], 1.0).unwrap_err(),
        RunbeaconError::UnknownFamily(_)
    ));
    assert!(matches!(
        registry.observe("nope", &[], 1.0).unwrap_err(),
        RunbeaconError::UnknownFamily(_)
    ));
}

#[test]
fn label_arity_checked() {
    let registry = Registry::new();
    registry
        .declare_family("status", MetricKind::Gauge, "Status", &["name", "type"])
        .unwrap();

    let err = registry.set("status", &["only-one"], 1.0).unwrap_err();
    assert!(matches!(
        err,
        RunbeaconError::LabelMismatch {
            expected: 2,
            got: 1,
            ..
        }
    ));
}

#[test]
fn op_kind_exclusivity_enforced() {
    let registry = Registry::new();
    registry
        .declare_family("jobs_total", MetricKind::Counter, "Total jobs", &["status"])
        .unwrap();

    let err = registry.set("jobs_total", &["success"], 1.0).unwrap_err();
    assert!(matches!(
        err,
        RunbeaconError::KindMismatch {
            required: MetricKind::Gauge,
            ..
        }
    ));
    let err = registry
        .observe("jobs_total", &["success"], 1.0)
        .unwrap_err();
    assert!(matches!(
        err,
        RunbeaconError::KindMismatch {
            required: MetricKind::Histogram,
            ..
        }
    ));
}

#[test]
fn gauge_set_is_last_write_wins() {
    let registry = Registry::new();
    registry
        .declare_family("uptime", MetricKind::Gauge, "Uptime", &["name"])
        .unwrap();
    registry.set("uptime", &["a"], 5.0).unwrap();
    registry.set("uptime", &["a"], 2.0).unwrap();
    assert_eq!(
        series(&registry, "uptime", &["a"]),
        Some(SeriesValue::Gauge(2.0))
    );
}

#[test]
fn histogram_observe_updates_buckets_count_sum() {
    let registry = Registry::new();
    registry
        .declare_histogram("duration", "Duration", &["status"], &[1.0, 2.0, 4.0])
        .unwrap();

    registry.observe("duration", &["success"], 2.0).unwrap();
    let Some(SeriesValue::Histogram(hist)) = series(&registry, "duration", &["success"]) else {
        panic!("expected histogram series");
    };
    assert_eq!(hist.buckets, vec![0, 1, 1]);
    assert_eq!(hist.count, 1);
    assert_eq!(hist.sum, 2.0);

    registry.observe("duration", &["success"], 0.5).unwrap();
    let Some(SeriesValue::Histogram(hist)) = series(&registry, "duration", &["success"]) else {
        panic!("expected histogram series");
    };
    assert_eq!(hist.buckets, vec![1, 2, 2]);
    assert_eq!(hist.count, 2);
    assert_eq!(hist.sum, 2.5);
}

#[test]
fn histogram_sample_above_top_bound_only_counts() {
    let registry = Registry::new();
    registry
        .declare_histogram("duration", "Duration", &[], &[1.0, 2.0])
        .unwrap();
    registry.observe("duration", &[], 10.0).unwrap();

    let Some(SeriesValue::Histogram(hist)) = series(&registry, "duration", &[]) else {
        panic!("expected histogram series");
    };
    assert_eq!(hist.buckets, vec![0, 0]);
    assert_eq!(hist.count, 1);
    assert_eq!(hist.sum, 10.0);
}

#[test]
fn histogram_declaration_validates_bounds() {
    let registry = Registry::new();
    assert!(matches!(
        registry
            .declare_histogram("empty", "Empty", &[], &[])
            .unwrap_err(),
        RunbeaconError::InvalidBuckets { .. }
    ));
    assert!(matches!(
        registry
            .declare_histogram("descending", "Descending", &[], &[2.0, 1.0])
            .unwrap_err(),
        RunbeaconError::InvalidBuckets { .. }
    ));
    assert!(matches!(
        registry
            .declare_family("hist", MetricKind::Histogram, "No bounds", &[])
            .unwrap_err(),
        RunbeaconError::InvalidBuckets { .. }
    ));
}

#[test]
fn snapshot_preserves_declaration_order() {
    let registry = Registry::new();
    registry
        .declare_family("zeta", MetricKind::Gauge, "Z", &[])
        .unwrap();
    registry
        .declare_family("alpha", MetricKind::Gauge, "A", &[])
        .unwrap();
    registry
        .declare_family("mid", MetricKind::Counter, "M", &[])
        .unwrap();

    let names: Vec<_> = registry.snapshot().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn series_created_lazily_per_label_combination() {
    let registry = Registry::new();
    registry
        .declare_family("jobs_total", MetricKind::Counter, "Total jobs", &["status"])
        .unwrap();

    assert!(registry.snapshot()[0].series.is_empty());
    registry.increment("jobs_total", &["success"], 1.0).unwrap();
    registry.increment("jobs_total", &["failed"], 1.0).unwrap();
    assert_eq!(registry.snapshot()[0].series.len(), 2);
}

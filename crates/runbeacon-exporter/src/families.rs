//! Declared metric families and initial seeding.
//!
//! The schema is static: all six families are declared before the server or
//! the updater starts, and no family is ever added or removed afterward.

use runbeacon_core::{MetricKind, Registry, Result};

use crate::config::{RunnerIdentity, RUNNER_VERSION};

pub const RUNNER_STATUS: &str = "runner_status";
pub const RUNNER_UPTIME_SECONDS: &str = "runner_uptime_seconds";
pub const RUNNER_INFO: &str = "runner_info";
pub const JOBS_TOTAL: &str = "jobs_total";
pub const JOB_DURATION_SECONDS: &str = "job_duration_seconds";
pub const CACHE_HIT_RATE: &str = "cache_hit_rate";

/// Job duration buckets: 10s doubling up to 5120s.
pub fn duration_buckets() -> Vec<f64> {
    (0..10).map(|i| 10.0 * f64::from(1u32 << i)).collect()
}

/// Declare the full family schema on a fresh registry.
pub fn declare_all(registry: &Registry) -> Result<()> {
    registry.declare_family(
        RUNNER_STATUS,
        MetricKind::Gauge,
        "Runner online status (1=online, 0=offline)",
        &["runner_name", "runner_type"],
    )?;
    registry.declare_family(
        RUNNER_UPTIME_SECONDS,
        MetricKind::Gauge,
        "Runner uptime in seconds",
        &["runner_name", "runner_type"],
    )?;
    registry.declare_family(
        RUNNER_INFO,
        MetricKind::Gauge,
        "Runner metadata",
        &["runner_name", "runner_type", "version"],
    )?;
    registry.declare_family(
        JOBS_TOTAL,
        MetricKind::Counter,
        "Total jobs executed by status",
        &["runner_name", "runner_type", "status"],
    )?;
    registry.declare_histogram(
        JOB_DURATION_SECONDS,
        "Job duration in seconds",
        &["runner_name", "runner_type", "status"],
        &duration_buckets(),
    )?;
    registry.declare_family(
        CACHE_HIT_RATE,
        MetricKind::Gauge,
        "Cache hit rate (0.0 to 1.0)",
        &["runner_name", "runner_type", "cache_type"],
    )?;
    Ok(())
}

/// Seed the series that must be present before the first tick: online
/// status, the info carrier, and a zero uptime.
pub fn seed_initial(registry: &Registry, identity: &RunnerIdentity) -> Result<()> {
    registry.set(RUNNER_STATUS, &[&identity.name, &identity.runner_type], 1.0)?;
    registry.set(
        RUNNER_INFO,
        &[&identity.name, &identity.runner_type, RUNNER_VERSION],
        1.0,
    )?;
    registry.set(
        RUNNER_UPTIME_SECONDS,
        &[&identity.name, &identity.runner_type],
        0.0,
    )?;
    Ok(())
}

//! runbeacon core: metric data model, registry, and text exposition.
//!
//! This crate holds the process-wide metric registry shared by the updater
//! task and the scrape handler. It intentionally carries no runtime or
//! transport dependencies so registries can be built and exercised directly
//! in tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RunbeaconError`/`Result` so a schema
//! bug is reported instead of crashing mid-scrape.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod registry;
pub mod render;

/// Shared result type.
pub use error::{Result, RunbeaconError};
pub use model::{FamilySnapshot, HistogramValue, MetricKind, SeriesValue};
pub use registry::Registry;

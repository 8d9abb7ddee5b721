//! Shared error type across runbeacon crates.

use thiserror::Error;

use crate::model::MetricKind;

/// Shared result type.
pub type Result<T> = std::result::Result<T, RunbeaconError>;

/// Unified error type used by the core registry and the exporter process.
///
/// Registry-level variants (`DuplicateFamily` through `InvalidBuckets`)
/// indicate a schema or call-site bug and are treated as fatal at startup.
/// `Listen` is fatal at bind time. `FeedRead` is per-event and recoverable.
#[derive(Debug, Error)]
pub enum RunbeaconError {
    #[error("metric family already declared: {0}")]
    DuplicateFamily(String),
    #[error("unknown metric family: {0}")]
    UnknownFamily(String),
    #[error("label mismatch for {family}: expected {expected} label values, got {got}")]
    LabelMismatch {
        family: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid counter delta for {family}: {delta}")]
    InvalidDelta { family: String, delta: f64 },
    #[error("{op} requires a {required} family, but {family} is not one")]
    KindMismatch {
        family: String,
        op: &'static str,
        required: MetricKind,
    },
    #[error("invalid histogram buckets for {family}: {reason}")]
    InvalidBuckets { family: String, reason: &'static str },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("failed to listen on {addr}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("feed read: {0}")]
    FeedRead(String),
}

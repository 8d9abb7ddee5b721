//! Job-event feed: typed events, JSON-line decoding, and the source seam.
//!
//! This is the extension point for real job-log ingestion. The exporter only
//! defines the event shapes and a channel-backed in-process source; nothing
//! here reads log files.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use runbeacon_core::{Result, RunbeaconError};

/// One externally-produced runner event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    /// A job finished with the given status and wall-clock duration.
    JobFinished { status: String, duration_secs: f64 },
    /// One cache lookup outcome for the given cache type.
    CacheLookup { cache_type: String, hit: bool },
}

/// Decode one JSON line into an event. Malformed input is a non-fatal
/// `FeedRead` error; the caller logs it and moves on.
pub fn decode_event(line: &str) -> Result<JobEvent> {
    serde_json::from_str(line.trim()).map_err(|e| RunbeaconError::FeedRead(e.to_string()))
}

/// Source of job events consumed by the updater.
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the feed is closed.
    async fn next_event(&mut self) -> Option<JobEvent>;
}

/// In-process feed backed by an mpsc channel. The channel is bounded so a
/// flooding producer backpressures instead of growing the heap; the updater
/// keeps ticking regardless.
pub struct ChannelSource {
    rx: mpsc::Receiver<JobEvent>,
}

impl ChannelSource {
    pub fn new(capacity: usize) -> (mpsc::Sender<JobEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn next_event(&mut self) -> Option<JobEvent> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_job_finished_line() {
        let ev = decode_event(
            r#"{"event":"job_finished","status":"success","duration_secs":42.0}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            JobEvent::JobFinished {
                status: "success".into(),
                duration_secs: 42.0
            }
        );
    }

    #[test]
    fn decodes_cache_lookup_line() {
        let ev =
            decode_event("  {\"event\":\"cache_lookup\",\"cache_type\":\"docker\",\"hit\":true}\n")
                .unwrap();
        assert_eq!(
            ev,
            JobEvent::CacheLookup {
                cache_type: "docker".into(),
                hit: true
            }
        );
    }

    #[test]
    fn malformed_line_is_feed_read_error() {
        let err = decode_event("not json").unwrap_err();
        assert!(matches!(err, RunbeaconError::FeedRead(_)));
        let err = decode_event(r#"{"event":"job_finished"}"#).unwrap_err();
        assert!(matches!(err, RunbeaconError::FeedRead(_)));
    }
}

//! runbeacon exporter library.
//!
//! Wires the env-derived config, metric family schema, HTTP surface, job
//! event feed, and background updater into the exporter process. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod families;
pub mod feed;
pub mod router;
pub mod updater;

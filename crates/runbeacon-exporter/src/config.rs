//! Exporter config (env-derived, strict validation).
//!
//! Identity and listen address are read once at startup. An unset or empty
//! variable falls back to its default; a present-but-invalid value is a
//! startup error rather than a silent fallback.

use std::net::SocketAddr;

use runbeacon_core::error::{Result, RunbeaconError};

/// Static runner version, exposed through the `runner_info` series.
pub const RUNNER_VERSION: &str = "2.329.0";

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen: SocketAddr,
    pub runner_name: String,
    pub runner_type: String,
    pub update_interval_secs: u64,
}

/// Fixed label values attached to every family that carries
/// `runner_name`/`runner_type`.
#[derive(Debug, Clone)]
pub struct RunnerIdentity {
    pub name: String,
    pub runner_type: String,
}

impl ExporterConfig {
    pub fn identity(&self) -> RunnerIdentity {
        RunnerIdentity {
            name: self.runner_name.clone(),
            runner_type: self.runner_type.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.update_interval_secs == 0 {
            return Err(RunbeaconError::Config(
                "UPDATE_INTERVAL_SECS must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

pub fn load_from_env() -> Result<ExporterConfig> {
    let listen = env_or("METRICS_LISTEN", "0.0.0.0:9091");
    let cfg = ExporterConfig {
        listen: listen
            .parse()
            .map_err(|e| RunbeaconError::Config(format!("METRICS_LISTEN {listen:?}: {e}")))?,
        runner_name: env_or("RUNNER_NAME", "unknown"),
        runner_type: env_or("RUNNER_TYPE", "standard"),
        update_interval_secs: env_or("UPDATE_INTERVAL_SECS", "5")
            .parse()
            .map_err(|e| RunbeaconError::Config(format!("UPDATE_INTERVAL_SECS: {e}")))?,
    };
    cfg.validate()?;
    Ok(cfg)
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

//! runbeacon exporter binary.
//!
//! Startup order: logging, env config, registry declaration + seeding,
//! updater task, HTTP listener. A bind failure is fatal; the process never
//! serves without its endpoint.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use runbeacon_core::{Registry, Result, RunbeaconError};
use runbeacon_exporter::app_state::AppState;
use runbeacon_exporter::feed::ChannelSource;
use runbeacon_exporter::updater::Updater;
use runbeacon_exporter::{config, families, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_env()?;
    let identity = cfg.identity();
    tracing::info!(
        runner = %identity.name,
        runner_type = %identity.runner_type,
        "starting runbeacon exporter"
    );

    // Schema and seed errors here are bugs baked in at build time; fail loud.
    let registry = Arc::new(Registry::new());
    families::declare_all(&registry)?;
    families::seed_initial(&registry, &identity)?;

    // Held open for the process lifetime; a job-log integration would clone
    // the sender and push decoded events through it.
    let (_event_tx, source) = ChannelSource::new(256);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let updater = Updater::new(
        Arc::clone(&registry),
        identity.clone(),
        Duration::from_secs(cfg.update_interval_secs),
    );
    let updater_task = updater.spawn(source, shutdown_rx);

    let app = router::build_router(AppState::new(registry, identity));
    let listener = tokio::net::TcpListener::bind(cfg.listen)
        .await
        .map_err(|source| RunbeaconError::Listen {
            addr: cfg.listen.to_string(),
            source,
        })?;
    tracing::info!(listen = %cfg.listen, "metrics endpoint listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| RunbeaconError::Listen {
            addr: cfg.listen.to_string(),
            source,
        })?;

    // Server drained; stop the updater and wait for it to release its timer.
    let _ = shutdown_tx.send(true);
    let _ = updater_task.await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

//! Background updater: uptime ticks plus feed-event translation.
//!
//! One task, two inputs: a fixed-interval tick that rewrites the uptime
//! gauge, and the job-event feed. The two are separate `select!` arms, so a
//! slow or silent feed never stalls the tick. A bad event is logged and
//! dropped; the loop only exits on the shutdown signal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use runbeacon_core::{Registry, Result};

use crate::config::RunnerIdentity;
use crate::families;
use crate::feed::{EventSource, JobEvent};

pub struct Updater {
    registry: Arc<Registry>,
    identity: RunnerIdentity,
    period: Duration,
    started_at: Instant,
    cache_stats: HashMap<String, CacheStats>,
}

#[derive(Default)]
struct CacheStats {
    lookups: u64,
    hits: u64,
}

impl Updater {
    pub fn new(registry: Arc<Registry>, identity: RunnerIdentity, period: Duration) -> Self {
        Self {
            registry,
            identity,
            period,
            started_at: Instant::now(),
            cache_stats: HashMap::new(),
        }
    }

    pub fn spawn<S>(self, source: S, shutdown: watch::Receiver<bool>) -> JoinHandle<()>
    where
        S: EventSource + 'static,
    {
        tokio::spawn(self.run(source, shutdown))
    }

    /// Tick until shutdown. The interval timer is dropped on exit and no
    /// write is left half-applied (registry writes complete under their
    /// family guard before the loop can observe the signal).
    pub async fn run<S: EventSource>(mut self, mut source: S, mut shutdown: watch::Receiver<bool>) {
        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut feed_open = true;
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.write_uptime() {
                        tracing::warn!(error = %e, "uptime update failed");
                    }
                }
                event = source.next_event(), if feed_open => {
                    match event {
                        Some(event) => {
                            if let Err(e) = self.apply_event(&event) {
                                tracing::warn!(error = %e, ?event, "dropping feed event");
                            }
                        }
                        None => {
                            tracing::debug!("event feed closed");
                            feed_open = false;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("updater stopping");
                    break;
                }
            }
        }
    }

    fn write_uptime(&self) -> Result<()> {
        let uptime = self.started_at.elapsed().as_secs_f64();
        self.registry.set(
            families::RUNNER_UPTIME_SECONDS,
            &[&self.identity.name, &self.identity.runner_type],
            uptime,
        )
    }

    /// Translate one feed event into registry writes.
    pub fn apply_event(&mut self, event: &JobEvent) -> Result<()> {
        let name = self.identity.name.as_str();
        let runner_type = self.identity.runner_type.as_str();
        match event {
            JobEvent::JobFinished {
                status,
                duration_secs,
            } => {
                self.registry
                    .increment(families::JOBS_TOTAL, &[name, runner_type, status], 1.0)?;
                self.registry.observe(
                    families::JOB_DURATION_SECONDS,
                    &[name, runner_type, status],
                    *duration_secs,
                )?;
            }
            JobEvent::CacheLookup { cache_type, hit } => {
                let stats = self.cache_stats.entry(cache_type.clone()).or_default();
                stats.lookups += 1;
                if *hit {
                    stats.hits += 1;
                }
                let ratio = stats.hits as f64 / stats.lookups as f64;
                self.registry.set(
                    families::CACHE_HIT_RATE,
                    &[name, runner_type, cache_type],
                    ratio,
                )?;
            }
        }
        Ok(())
    }
}

//! Shared application state for the exporter.
//!
//! The registry is an explicitly owned object handed to both the HTTP
//! handlers and the updater; there are no global singletons, so tests run
//! independent exporter states in parallel.

use std::sync::Arc;

use runbeacon_core::Registry;

use crate::config::RunnerIdentity;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<Registry>,
    identity: RunnerIdentity,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, identity: RunnerIdentity) -> Self {
        Self {
            inner: Arc::new(AppStateInner { registry, identity }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn identity(&self) -> &RunnerIdentity {
        &self.inner.identity
    }
}

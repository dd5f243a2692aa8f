//! Wiring of the client's long-lived parts from configuration.

use std::sync::Arc;
use vocab_core::ReviewScheduler;

use crate::api::BackendApi;
use crate::clock::Clock;
use crate::config::{ClientConfig, MonitorConfig};
use crate::monitor::DueWordMonitor;
use crate::review::ReviewRunner;
use crate::store::ProgressStore;

/// Shared state of a signed-in learner.
pub struct App {
    store: Arc<ProgressStore>,
    clock: Arc<dyn Clock>,
    scheduler: ReviewScheduler,
    monitor: MonitorConfig,
}

impl App {
    pub fn new(config: &ClientConfig, api: Arc<dyn BackendApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(ProgressStore::new(api)),
            clock,
            scheduler: ReviewScheduler::new(config.intervals.clone()),
            monitor: config.monitor.clone(),
        }
    }

    pub fn store(&self) -> &Arc<ProgressStore> {
        &self.store
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    /// A review runner using the configured interval tables.
    pub fn review_runner(&self) -> ReviewRunner {
        ReviewRunner::new(
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            self.scheduler.clone(),
        )
    }

    /// A stopped due-word monitor over this learner's store.
    pub fn due_monitor(&self) -> DueWordMonitor {
        DueWordMonitor::new(
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            self.monitor.clone(),
        )
    }

    /// Forget the learner's progress, e.g. on logout.
    pub fn sign_out(&self) {
        self.store.clear();
        tracing::info!("progress cleared");
    }
}

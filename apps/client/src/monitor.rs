//! Background due-word monitor.
//!
//! Recomputes the due set whenever the progress store changes and on a
//! fixed interval, so that words becoming due purely through the passage of
//! time are noticed. The task is owned by the monitor and must be stopped
//! explicitly (end of session, logout).
//!
//! Failed remote fetches are published on the summary as
//! [`DueSummary::last_error`]; the previous due set is kept alongside it.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use vocab_core::{due_words, WordId, WordProgress};

use crate::clock::Clock;
use crate::config::{DueSource, MonitorConfig};
use crate::store::{ProgressStore, StoreError};

/// Due words at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueSummary {
    pub count: usize,
    pub word_ids: Vec<WordId>,
    pub computed_at: Option<DateTime<Utc>>,
    /// Error from the most recent refresh, cleared by the next success.
    /// [`StoreError::Unauthorized`] means the learner must log in again.
    pub last_error: Option<StoreError>,
}

impl DueSummary {
    /// Summarize the records due at `now`, in store order.
    pub fn compute(records: &[WordProgress], now: DateTime<Utc>) -> Self {
        let word_ids: Vec<WordId> = due_words(records, now).iter().map(|r| r.word_id).collect();
        Self {
            count: word_ids.len(),
            word_ids,
            computed_at: Some(now),
            last_error: None,
        }
    }

    /// Summary of a server-computed due list, taken as-is.
    pub fn from_remote(records: &[WordProgress], now: DateTime<Utc>) -> Self {
        let word_ids: Vec<WordId> = records.iter().map(|r| r.word_id).collect();
        Self {
            count: word_ids.len(),
            word_ids,
            computed_at: Some(now),
            last_error: None,
        }
    }
}

struct RunningTask {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Keeps a [`DueSummary`] up to date while running.
pub struct DueWordMonitor {
    store: Arc<ProgressStore>,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
    summary: Arc<watch::Sender<DueSummary>>,
    task: Option<RunningTask>,
}

impl DueWordMonitor {
    pub fn new(store: Arc<ProgressStore>, clock: Arc<dyn Clock>, config: MonitorConfig) -> Self {
        let (summary, _) = watch::channel(DueSummary::default());
        Self {
            store,
            clock,
            config,
            summary: Arc::new(summary),
            task: None,
        }
    }

    /// Receive a notification whenever the set of due words changes.
    pub fn subscribe(&self) -> watch::Receiver<DueSummary> {
        self.summary.subscribe()
    }

    /// Latest summary.
    pub fn current(&self) -> DueSummary {
        self.summary.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.handle.is_finished())
    }

    /// Spawn the polling task. Does nothing if it is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let worker = Worker {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            summary: Arc::clone(&self.summary),
        };
        let handle = tokio::spawn(worker.run(stop_rx));

        tracing::debug!(
            interval_secs = self.config.poll_interval.as_secs(),
            source = ?self.config.source,
            "due-word monitor started"
        );
        self.task = Some(RunningTask { stop_tx, handle });
    }

    /// Stop the polling task and wait for it to exit.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        let _ = task.stop_tx.send(());
        if let Err(e) = task.handle.await {
            tracing::warn!(error = %e, "due-word monitor task ended abnormally");
        }
        tracing::debug!("due-word monitor stopped");
    }
}

impl Drop for DueWordMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }
    }
}

struct Worker {
    store: Arc<ProgressStore>,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
    summary: Arc<watch::Sender<DueSummary>>,
}

impl Worker {
    async fn run(self, mut stop_rx: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut revisions = self.store.subscribe();

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = ticker.tick() => self.refresh().await,
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.refresh().await;
                }
            }
        }
    }

    async fn refresh(&self) {
        let now = self.clock.now_utc();
        let next = match self.config.source {
            DueSource::Local => DueSummary::compute(&self.store.snapshot(), now),
            DueSource::Remote => match self.store.api().fetch_due_progress().await {
                Ok(records) => DueSummary::from_remote(&records, now),
                Err(e) => {
                    self.publish_error(StoreError::fetch(e));
                    return;
                }
            },
        };

        tracing::debug!(count = next.count, "due words recomputed");
        self.summary.send_if_modified(|current| {
            let changed = current.word_ids != next.word_ids
                || current.computed_at.is_none()
                || current.last_error.is_some();
            *current = next;
            changed
        });
    }

    fn publish_error(&self, error: StoreError) {
        tracing::warn!(
            error = %error,
            retryable = error.is_retryable(),
            "failed to fetch due words, keeping last result"
        );
        self.summary.send_if_modified(|current| {
            let changed = current.last_error.as_ref() != Some(&error);
            current.last_error = Some(error);
            changed
        });
    }
}

//! Shared helpers for client integration tests.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vocab_client::api::{ApiError, BackendApi};
use vocab_client::clock::{Clock, ManualClock};
use vocab_client::store::ProgressStore;
use vocab_core::WordProgress;

/// In-memory backend with switchable failures.
#[derive(Default)]
pub struct FakeBackend {
    pub records: Mutex<Vec<WordProgress>>,
    pub due: Mutex<Vec<WordProgress>>,
    pub persisted: Mutex<Vec<WordProgress>>,
    pub fetch_error: Mutex<Option<ApiError>>,
    pub persist_error: Mutex<Option<ApiError>>,
    pub canonicalize: Mutex<Option<fn(&mut WordProgress)>>,
}

impl FakeBackend {
    pub fn with_records(records: Vec<WordProgress>) -> Arc<Self> {
        let backend = Self::default();
        *backend.records.lock().unwrap() = records;
        Arc::new(backend)
    }

    pub fn fail_fetch(&self, error: ApiError) {
        *self.fetch_error.lock().unwrap() = Some(error);
    }

    pub fn fail_persist(&self, error: ApiError) {
        *self.persist_error.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.fetch_error.lock().unwrap() = None;
        *self.persist_error.lock().unwrap() = None;
    }

    /// Have the server rewrite every persisted record before echoing it.
    pub fn canonicalize_with(&self, rewrite: fn(&mut WordProgress)) {
        *self.canonicalize.lock().unwrap() = Some(rewrite);
    }

    pub fn set_due(&self, due: Vec<WordProgress>) {
        *self.due.lock().unwrap() = due;
    }

    pub fn persisted(&self) -> Vec<WordProgress> {
        self.persisted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn fetch_all_progress(&self) -> Result<Vec<WordProgress>, ApiError> {
        if let Some(e) = self.fetch_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn fetch_due_progress(&self) -> Result<Vec<WordProgress>, ApiError> {
        if let Some(e) = self.fetch_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self.due.lock().unwrap().clone())
    }

    async fn persist_progress(&self, progress: &WordProgress) -> Result<WordProgress, ApiError> {
        if let Some(e) = self.persist_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.persisted.lock().unwrap().push(progress.clone());
        // The server does not echo word content back.
        let mut canonical = progress.clone();
        canonical.word = None;
        if let Some(rewrite) = *self.canonicalize.lock().unwrap() {
            rewrite(&mut canonical);
        }
        Ok(canonical)
    }
}

/// A store over a fake backend.
pub fn store_with(records: Vec<WordProgress>) -> (Arc<FakeBackend>, Arc<ProgressStore>) {
    let backend = FakeBackend::with_records(records);
    let store = Arc::new(ProgressStore::new(backend.clone()));
    (backend, store)
}

/// Manual clock pinned to the fixture "now".
pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(fixtures::now().with_timezone(&chrono::Local)))
}

pub fn as_clock(clock: &Arc<ManualClock>) -> Arc<dyn Clock> {
    clock.clone()
}

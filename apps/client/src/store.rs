//! In-memory progress store synchronized with the backend.

use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use vocab_core::{ProgressPatch, WordId, WordProgress};

use crate::api::{ApiError, BackendApi};

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected the learner's credentials. The application
    /// should log out.
    #[error("Not authorized - please log in again")]
    Unauthorized,

    #[error("Failed to fetch progress: {0}")]
    Fetch(#[source] ApiError),

    /// Remote write failed; the local record keeps the new value.
    #[error("Failed to save progress for word {word_id}: {source}")]
    Persist {
        word_id: WordId,
        #[source]
        source: ApiError,
    },
}

impl StoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
            || matches!(
                self,
                Self::Persist {
                    source: ApiError::Unauthorized,
                    ..
                }
            )
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unauthorized => false,
            Self::Fetch(e) | Self::Persist { source: e, .. } => e.is_retryable(),
        }
    }

    /// Map a failed read, singling out rejected credentials.
    pub(crate) fn fetch(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            other => Self::Fetch(other),
        }
    }
}

/// A learner's progress records for the current session.
///
/// Local state is the write-through target of every review; the backend is
/// the system of record across sessions. Every mutation bumps a revision
/// number observable through [`subscribe`](Self::subscribe).
pub struct ProgressStore {
    api: Arc<dyn BackendApi>,
    records: RwLock<IndexMap<WordId, WordProgress>>,
    revision: watch::Sender<u64>,
}

impl ProgressStore {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            api,
            records: RwLock::new(IndexMap::new()),
            revision,
        }
    }

    /// Backend this store reads from and writes to.
    pub fn api(&self) -> &Arc<dyn BackendApi> {
        &self.api
    }

    /// Replace all records with the backend's list.
    ///
    /// On failure the current records are kept.
    pub async fn hydrate(&self) -> Result<usize, StoreError> {
        let records = self.api.fetch_all_progress().await.map_err(|e| {
            tracing::warn!(error = %e, "progress hydration failed");
            StoreError::fetch(e)
        })?;
        let count = records.len();
        self.replace_all(records);
        tracing::info!(count, "hydrated progress store");
        Ok(count)
    }

    /// Current record for `word_id`.
    pub fn get(&self, word_id: WordId) -> Option<WordProgress> {
        self.read().get(&word_id).cloned()
    }

    /// Merge `patch` into the record for `word_id`, inserting it if absent.
    /// Local only.
    pub fn upsert(&self, word_id: WordId, patch: &ProgressPatch) -> WordProgress {
        let updated = {
            let mut records = self.write();
            let record = records
                .entry(word_id)
                .or_insert_with(|| WordProgress::new(word_id));
            record.apply(patch);
            record.clone()
        };
        self.bump();
        updated
    }

    /// Bulk replace, keeping the given order.
    pub fn replace_all(&self, records: Vec<WordProgress>) {
        {
            let mut map = self.write();
            map.clear();
            map.extend(records.into_iter().map(|r| (r.word_id, r)));
        }
        self.bump();
    }

    /// Drop every record, e.g. when the learner logs out.
    pub fn clear(&self) {
        self.write().clear();
        self.bump();
    }

    /// Copy of all records in store order.
    pub fn snapshot(&self) -> Vec<WordProgress> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply a scheduled record locally, then persist it.
    ///
    /// The local write happens first and is never rolled back. When the
    /// backend accepts the record its canonical copy replaces the local one
    /// outright; only missing word content is filled in from the local copy.
    pub async fn record_transition(
        &self,
        progress: WordProgress,
    ) -> Result<WordProgress, StoreError> {
        let word_id = progress.word_id;
        let local = self.upsert(word_id, &ProgressPatch::from_progress(&progress));

        match self.api.persist_progress(&local).await {
            Ok(mut canonical) => {
                if canonical.word.is_none() {
                    canonical.word = local.word;
                }
                self.put(canonical.clone());
                tracing::debug!(word_id, memory_level = canonical.memory_level, "progress saved");
                Ok(canonical)
            }
            Err(source) => {
                tracing::warn!(
                    word_id,
                    error = %source,
                    "failed to save progress, keeping local value"
                );
                Err(StoreError::Persist { word_id, source })
            }
        }
    }

    /// Watch for changes. The value is a revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision number.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn put(&self, record: WordProgress) {
        self.write().insert(record.word_id, record);
        self.bump();
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<WordId, WordProgress>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<WordId, WordProgress>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

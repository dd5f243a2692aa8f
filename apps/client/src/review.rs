//! Interactive review sessions backed by the progress store.

use std::sync::Arc;
use uuid::Uuid;
use vocab_core::{
    is_due, Advance, AnswerCheck, FlashcardStep, Notice, ReviewItem, ReviewScheduler,
    ReviewSession, SessionError, SessionState, StartOutcome, SubmitOutcome, Word, WordId,
    WordProgress,
};

use crate::clock::Clock;
use crate::store::{ProgressStore, StoreError};

/// What happened on an answer or flashcard action.
#[derive(Debug, Clone)]
pub enum Step {
    /// Input was ignored; show the notice and keep the current item.
    Notice(Notice),
    /// Revise-game answer graded; the session is showing the result.
    Answered {
        check: AnswerCheck,
        progress: WordProgress,
    },
    /// Flashcard scheduled and the session moved on.
    Flashcard {
        progress: WordProgress,
        advance: Advance,
    },
}

/// A step plus the outcome of persisting it.
///
/// `persist_error` is informational: the session has already advanced and
/// the store already holds the new value.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: Step,
    pub persist_error: Option<StoreError>,
}

impl StepReport {
    fn local(step: Step) -> Self {
        Self {
            step,
            persist_error: None,
        }
    }
}

/// Drives a [`ReviewSession`] and writes each result through to a
/// [`ProgressStore`].
pub struct ReviewRunner {
    store: Arc<ProgressStore>,
    clock: Arc<dyn Clock>,
    session: ReviewSession,
    session_id: Option<Uuid>,
}

impl ReviewRunner {
    pub fn new(
        store: Arc<ProgressStore>,
        clock: Arc<dyn Clock>,
        scheduler: ReviewScheduler,
    ) -> Self {
        Self {
            store,
            clock,
            session: ReviewSession::new(scheduler),
            session_id: None,
        }
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn current(&self) -> Option<&ReviewItem> {
        self.session.current()
    }

    /// Start a session over the given words, using stored progress where
    /// it exists.
    pub fn start(&mut self, words: Vec<Word>) -> Result<StartOutcome, SessionError> {
        let items = words
            .into_iter()
            .map(|word| {
                let progress = self.store.get(word.id);
                ReviewItem::new(word, progress)
            })
            .collect();
        self.start_items(items)
    }

    /// Start a session over the store's due words.
    pub fn start_due(&mut self) -> Result<StartOutcome, SessionError> {
        let now = self.clock.now_utc();
        let items = self
            .store
            .snapshot()
            .into_iter()
            .filter(|p| is_due(p, now))
            .filter_map(ReviewItem::from_progress)
            .collect();
        self.start_items(items)
    }

    /// Start a session over prepared items.
    pub fn start_items(&mut self, items: Vec<ReviewItem>) -> Result<StartOutcome, SessionError> {
        let outcome = self.session.start(items)?;
        match outcome {
            StartOutcome::Started { total } => {
                let id = Uuid::new_v4();
                self.session_id = Some(id);
                tracing::info!(session = %id, total, "review session started");
            }
            StartOutcome::Skipped(notice) => {
                tracing::info!(?notice, "nothing to review");
            }
        }
        Ok(outcome)
    }

    /// Show the current prompt.
    pub fn present(&mut self) -> Result<&ReviewItem, SessionError> {
        self.session.present()
    }

    /// Grade a typed answer, then save the new progress.
    pub async fn submit_answer(&mut self, text: &str) -> Result<StepReport, SessionError> {
        let outcome = self.session.submit_answer(text, self.clock.now())?;
        let result = match outcome {
            SubmitOutcome::Rejected(notice) => return Ok(StepReport::local(Step::Notice(notice))),
            SubmitOutcome::Answered(result) => result,
        };

        let (progress, persist_error) = self.write_through(result.transition.progress).await;
        Ok(StepReport {
            step: Step::Answered {
                check: result.check,
                progress,
            },
            persist_error,
        })
    }

    /// Leave the result screen.
    pub fn continue_session(&mut self) -> Result<Advance, SessionError> {
        let advance = self.session.continue_session()?;
        self.log_completion(advance);
        Ok(advance)
    }

    /// Flashcard: the learner knows `word_id`.
    pub async fn mark_learned(&mut self, word_id: WordId) -> Result<StepReport, SessionError> {
        let step = self.session.mark_learned(word_id, self.clock.now())?;
        Ok(self.finish_flashcard(step).await)
    }

    /// Flashcard: move on without marking the word as known.
    pub async fn skip_to_next(&mut self) -> Result<StepReport, SessionError> {
        let step = self.session.skip_to_next(self.clock.now())?;
        Ok(self.finish_flashcard(step).await)
    }

    async fn finish_flashcard(&mut self, step: FlashcardStep) -> StepReport {
        self.log_completion(step.advance);
        let (progress, persist_error) = self.write_through(step.transition.progress).await;
        StepReport {
            step: Step::Flashcard {
                progress,
                advance: step.advance,
            },
            persist_error,
        }
    }

    /// Local write first, then the remote persist. On failure the locally
    /// scheduled value is returned alongside the error.
    async fn write_through(&self, progress: WordProgress) -> (WordProgress, Option<StoreError>) {
        match self.store.record_transition(progress.clone()).await {
            Ok(stored) => (stored, None),
            Err(e) => (progress, Some(e)),
        }
    }

    fn log_completion(&mut self, advance: Advance) {
        if let Advance::Completed(summary) = advance {
            let id = self.session_id.take().map(|id| id.to_string()).unwrap_or_default();
            tracing::info!(
                session = %id,
                score = summary.score,
                total = summary.total,
                "review session completed"
            );
        }
    }
}

//! Review session state machine.
//!
//! One session is a single pass over a shuffled word set. The revise game
//! walks each item through `Presenting -> AwaitingAnswer -> ShowingResult`;
//! the flashcard flow skips the result phase and schedules on every card
//! advance. The session is pure: it hands back the scheduled progress and
//! leaves persistence to the caller.

use crate::error::{Result, SessionError};
use crate::matching::{check_answer, is_blank, AnswerCheck};
use crate::scheduler::{ReviewScheduler, Transition};
use crate::types::{ReviewOutcome, Word, WordId, WordProgress};
use chrono::{DateTime, TimeZone};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A word paired with the learner's progress on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub word: Word,
    pub progress: WordProgress,
}

impl ReviewItem {
    /// Pair a word with its progress, synthesizing a fresh record when the
    /// word has never been reviewed.
    pub fn new(word: Word, progress: Option<WordProgress>) -> Self {
        let progress = progress.unwrap_or_else(|| WordProgress::new(word.id));
        Self { word, progress }
    }

    /// Build an item from a progress record that carries its word content.
    pub fn from_progress(progress: WordProgress) -> Option<Self> {
        let word = progress.word.clone()?;
        Some(Self { word, progress })
    }
}

/// Phase of the session, as seen by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Presenting { position: usize },
    AwaitingAnswer { position: usize },
    ShowingResult { position: usize, correct: bool },
    Completed { score: usize, total: usize },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Presenting { .. } => "presenting",
            Self::AwaitingAnswer { .. } => "awaiting an answer",
            Self::ShowingResult { .. } => "showing a result",
            Self::Completed { .. } => "completed",
        }
    }
}

/// User-facing notice for input that is ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    NothingToReview,
    EmptyAnswer,
}

/// Final score of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub score: usize,
    pub total: usize,
}

/// Result of [`ReviewSession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { total: usize },
    Skipped(Notice),
}

/// Where the session went after leaving an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { position: usize },
    Completed(SessionSummary),
}

/// A graded revise-game answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub check: AnswerCheck,
    pub transition: Transition,
}

/// Result of [`ReviewSession::submit_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(Notice),
    Answered(AnswerResult),
}

/// A flashcard action: the scheduled progress and where the session moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardStep {
    pub transition: Transition,
    pub advance: Advance,
}

/// One interactive pass over a word set.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    scheduler: ReviewScheduler,
    items: Vec<ReviewItem>,
    state: SessionState,
    score: usize,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(ReviewScheduler::default())
    }
}

impl ReviewSession {
    pub fn new(scheduler: ReviewScheduler) -> Self {
        Self {
            scheduler,
            items: Vec::new(),
            state: SessionState::Idle,
            score: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    /// Position of the active item, if any.
    pub fn position(&self) -> Option<usize> {
        match self.state {
            SessionState::Presenting { position }
            | SessionState::AwaitingAnswer { position }
            | SessionState::ShowingResult { position, .. } => Some(position),
            SessionState::Idle | SessionState::Completed { .. } => None,
        }
    }

    /// The active item, if any.
    pub fn current(&self) -> Option<&ReviewItem> {
        self.position().and_then(|p| self.items.get(p))
    }

    /// Start a pass over `items` in a random order.
    pub fn start(&mut self, items: Vec<ReviewItem>) -> Result<StartOutcome> {
        self.start_with_rng(items, &mut rand::thread_rng())
    }

    /// Like [`start`](Self::start) with a caller-supplied RNG.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        mut items: Vec<ReviewItem>,
        rng: &mut R,
    ) -> Result<StartOutcome> {
        if !matches!(self.state, SessionState::Idle | SessionState::Completed { .. }) {
            return Err(self.invalid("start a session"));
        }
        if items.is_empty() {
            self.reset();
            return Ok(StartOutcome::Skipped(Notice::NothingToReview));
        }

        items.shuffle(rng);
        let total = items.len();
        self.items = items;
        self.score = 0;
        self.state = SessionState::Presenting { position: 0 };
        Ok(StartOutcome::Started { total })
    }

    /// Abandon the current pass.
    pub fn reset(&mut self) {
        self.items.clear();
        self.score = 0;
        self.state = SessionState::Idle;
    }

    /// Show the current prompt and wait for an answer.
    pub fn present(&mut self) -> Result<&ReviewItem> {
        match self.state {
            SessionState::Presenting { position } => {
                self.state = SessionState::AwaitingAnswer { position };
                Ok(&self.items[position])
            }
            _ => Err(self.invalid("present a word")),
        }
    }

    /// Grade a typed answer for the current item.
    pub fn submit_answer<Tz: TimeZone>(
        &mut self,
        text: &str,
        now: DateTime<Tz>,
    ) -> Result<SubmitOutcome> {
        let position = match self.state {
            SessionState::AwaitingAnswer { position } => position,
            _ => return Err(self.invalid("submit an answer")),
        };
        if is_blank(text) {
            return Ok(SubmitOutcome::Rejected(Notice::EmptyAnswer));
        }

        let item = &mut self.items[position];
        let check = check_answer(text, &item.word.meaning);
        let transition = self.scheduler.compute_transition(
            &item.progress,
            ReviewOutcome::from_answer(check.is_correct),
            now,
        );
        item.progress = transition.progress.clone();

        if check.is_correct {
            self.score += 1;
        }
        self.state = SessionState::ShowingResult {
            position,
            correct: check.is_correct,
        };
        Ok(SubmitOutcome::Answered(AnswerResult { check, transition }))
    }

    /// Leave the result screen.
    pub fn continue_session(&mut self) -> Result<Advance> {
        match self.state {
            SessionState::ShowingResult { position, .. } => Ok(self.advance_from(position)),
            _ => Err(self.invalid("continue")),
        }
    }

    /// Flashcard: the learner knows this word.
    pub fn mark_learned<Tz: TimeZone>(
        &mut self,
        word_id: WordId,
        now: DateTime<Tz>,
    ) -> Result<FlashcardStep> {
        let position = self.flashcard_position("mark a word as learned")?;
        let expected = self.items[position].word.id;
        if expected != word_id {
            return Err(SessionError::WordMismatch {
                expected,
                given: word_id,
            });
        }
        self.score += 1;
        Ok(self.flashcard_step(position, ReviewOutcome::Learned, now))
    }

    /// Flashcard: keep practicing this word and move on.
    pub fn skip_to_next<Tz: TimeZone>(&mut self, now: DateTime<Tz>) -> Result<FlashcardStep> {
        let position = self.flashcard_position("skip a word")?;
        Ok(self.flashcard_step(position, ReviewOutcome::Continue, now))
    }

    fn flashcard_position(&self, action: &'static str) -> Result<usize> {
        match self.state {
            SessionState::Presenting { position } | SessionState::AwaitingAnswer { position } => {
                Ok(position)
            }
            _ => Err(self.invalid(action)),
        }
    }

    fn flashcard_step<Tz: TimeZone>(
        &mut self,
        position: usize,
        outcome: ReviewOutcome,
        now: DateTime<Tz>,
    ) -> FlashcardStep {
        let item = &mut self.items[position];
        let transition = self.scheduler.compute_transition(&item.progress, outcome, now);
        item.progress = transition.progress.clone();
        FlashcardStep {
            transition,
            advance: self.advance_from(position),
        }
    }

    fn advance_from(&mut self, position: usize) -> Advance {
        let next = position + 1;
        if next < self.items.len() {
            self.state = SessionState::Presenting { position: next };
            Advance::Next { position: next }
        } else {
            let summary = SessionSummary {
                score: self.score,
                total: self.items.len(),
            };
            self.state = SessionState::Completed {
                score: summary.score,
                total: summary.total,
            };
            Advance::Completed(summary)
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}

//! Core vocabulary review library.
//!
//! Provides:
//! - Memory-level spaced repetition scheduling
//! - Due-word detection
//! - Typed answer checking for the revise game
//! - The review session state machine (revise game and flashcards)
//! - Shared types (WordProgress, Word, ReviewOutcome, etc.)
//!
//! Nothing in this crate performs I/O.

pub mod due;
pub mod error;
pub mod matching;
pub mod scheduler;
pub mod session;
pub mod types;

pub use due::{due_count, due_words, is_due};
pub use error::{Result, SessionError};
pub use matching::{check_answer, normalize_answer, AnswerCheck};
pub use scheduler::{compute_transition, IntervalTable, ReviewScheduler, Transition};
pub use session::{
    Advance, AnswerResult, FlashcardStep, Notice, ReviewItem, ReviewSession, SessionState,
    SessionSummary, StartOutcome, SubmitOutcome,
};
pub use types::{ProgressPatch, ProgressStatus, ReviewOutcome, Word, WordId, WordProgress};

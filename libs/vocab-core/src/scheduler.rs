//! Spaced repetition scheduling by memory level.
//!
//! Each review bumps or holds the memory level, and the new level picks a
//! day offset from one of two interval tables: a longer one for flashcards
//! marked as learned, a shorter one for everything else.

use crate::types::{ProgressStatus, ReviewOutcome, WordProgress};
use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Day offsets indexed by memory level 1, 2 and 3+.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTable {
    /// Flashcard "learned" path.
    pub learned: [u32; 3],
    /// Flashcard "continue" path and the revise game.
    pub review: [u32; 3],
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            learned: [2, 5, 10],
            review: [1, 3, 7],
        }
    }
}

impl IntervalTable {
    /// Day offset for a new memory level reached through `outcome`.
    pub fn offset_days(&self, memory_level: u32, outcome: ReviewOutcome) -> u32 {
        let row = match outcome {
            ReviewOutcome::Learned => &self.learned,
            ReviewOutcome::Continue | ReviewOutcome::Correct | ReviewOutcome::Incorrect => {
                &self.review
            }
        };
        // Level 0 cannot be produced by a transition; treat it like level 1.
        let idx = memory_level.clamp(1, 3) as usize - 1;
        row[idx]
    }
}

/// Result of applying one review outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub progress: WordProgress,
    pub offset_days: u32,
}

/// Computes progress transitions from review outcomes.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    pub intervals: IntervalTable,
}

impl ReviewScheduler {
    pub fn new(intervals: IntervalTable) -> Self {
        Self { intervals }
    }

    /// Apply `outcome` to `previous` at time `now`.
    ///
    /// The next review is `now` plus whole calendar days in `now`'s time
    /// zone, so a learner reviewing at 20:00 local time is due again at
    /// 20:00 local time regardless of DST changes in between.
    pub fn compute_transition<Tz: TimeZone>(
        &self,
        previous: &WordProgress,
        outcome: ReviewOutcome,
        now: DateTime<Tz>,
    ) -> Transition {
        let memory_level = if outcome.is_positive() {
            previous.memory_level.saturating_add(1)
        } else {
            previous.memory_level.max(1)
        };
        let offset_days = self.intervals.offset_days(memory_level, outcome);
        let next_review = add_calendar_days(&now, offset_days);

        Transition {
            progress: WordProgress {
                word_id: previous.word_id,
                memory_level,
                review_count: previous.review_count.saturating_add(1),
                status: ProgressStatus::Learned,
                last_reviewed: Some(now.with_timezone(&Utc)),
                next_review: Some(next_review),
                word: previous.word.clone(),
            },
            offset_days,
        }
    }
}

/// Apply `outcome` with the default interval table.
pub fn compute_transition<Tz: TimeZone>(
    previous: &WordProgress,
    outcome: ReviewOutcome,
    now: DateTime<Tz>,
) -> Transition {
    ReviewScheduler::default().compute_transition(previous, outcome, now)
}

fn add_calendar_days<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> DateTime<Utc> {
    match now.clone().checked_add_days(Days::new(u64::from(days))) {
        Some(next) => next.with_timezone(&Utc),
        // Target wall-clock time falls into a DST gap.
        None => now.with_timezone(&Utc) + Duration::days(i64::from(days)),
    }
}

//! Core types for vocabulary review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a vocabulary item. Owned by the backend.
pub type WordId = i64;

/// Learning status of a word for one learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStatus {
    NotLearned,
    Learned,
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::NotLearned
    }
}

/// Display content of a vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub term: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Per-(learner, word) progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub word_id: WordId,
    #[serde(default)]
    pub memory_level: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub status: ProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    /// Word content attached by the backend when listing progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<Word>,
}

impl WordProgress {
    /// Default record for a word that has never been reviewed.
    pub fn new(word_id: WordId) -> Self {
        Self {
            word_id,
            memory_level: 0,
            review_count: 0,
            status: ProgressStatus::NotLearned,
            last_reviewed: None,
            next_review: None,
            word: None,
        }
    }

    /// Apply a patch in place. Fields absent from the patch are left alone.
    pub fn apply(&mut self, patch: &ProgressPatch) {
        if let Some(level) = patch.memory_level {
            self.memory_level = level;
        }
        if let Some(count) = patch.review_count {
            self.review_count = count;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(at) = patch.last_reviewed {
            self.last_reviewed = Some(at);
        }
        if let Some(at) = patch.next_review {
            self.next_review = Some(at);
        }
        if let Some(word) = &patch.word {
            self.word = Some(word.clone());
        }
    }
}

/// Partial update merged into a [`WordProgress`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProgressStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<Word>,
}

impl ProgressPatch {
    /// Build a patch that overwrites every scheduling field of `progress`.
    pub fn from_progress(progress: &WordProgress) -> Self {
        Self {
            memory_level: Some(progress.memory_level),
            review_count: Some(progress.review_count),
            status: Some(progress.status),
            last_reviewed: progress.last_reviewed,
            next_review: progress.next_review,
            word: progress.word.clone(),
        }
    }

    /// Materialize the patch as a fresh record for `word_id`.
    pub fn into_progress(self, word_id: WordId) -> WordProgress {
        let mut progress = WordProgress::new(word_id);
        progress.apply(&self);
        progress
    }
}

/// Outcome of a single review action.
///
/// `Learned` and `Continue` come from the flashcard flow, `Correct` and
/// `Incorrect` from the revise game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Learned,
    Continue,
    Correct,
    Incorrect,
}

impl ReviewOutcome {
    /// Whether the outcome counts as a successful recall.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Learned | Self::Correct)
    }

    /// Map a revise-game answer to an outcome.
    pub fn from_answer(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    /// Map a flashcard action to an outcome.
    pub fn from_flashcard(learned: bool) -> Self {
        if learned {
            Self::Learned
        } else {
            Self::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn progress_uses_camel_case_on_the_wire() {
        let mut progress = WordProgress::new(7);
        progress.memory_level = 2;
        progress.status = ProgressStatus::Learned;
        progress.next_review = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());

        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["wordId"], 7);
        assert_eq!(json["memoryLevel"], 2);
        assert_eq!(json["status"], "learned");
        assert_eq!(json["nextReview"], "2024-03-01T09:00:00Z");
        assert!(json.get("lastReviewed").is_none());
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let progress: WordProgress =
            serde_json::from_str(r#"{"wordId": 3, "status": "notLearned"}"#).unwrap();
        assert_eq!(progress, WordProgress::new(3));
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let mut progress = WordProgress::new(1);
        progress.review_count = 4;
        progress.apply(&ProgressPatch {
            memory_level: Some(3),
            ..Default::default()
        });
        assert_eq!(progress.memory_level, 3);
        assert_eq!(progress.review_count, 4);
        assert_eq!(progress.status, ProgressStatus::NotLearned);
    }

    #[test]
    fn outcome_polarity() {
        assert!(ReviewOutcome::Learned.is_positive());
        assert!(ReviewOutcome::Correct.is_positive());
        assert!(!ReviewOutcome::Continue.is_positive());
        assert!(!ReviewOutcome::Incorrect.is_positive());
        assert_eq!(ReviewOutcome::from_answer(false), ReviewOutcome::Incorrect);
        assert_eq!(ReviewOutcome::from_flashcard(true), ReviewOutcome::Learned);
    }
}

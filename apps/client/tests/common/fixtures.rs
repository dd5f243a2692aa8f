//! Test fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use vocab_core::{ProgressStatus, Word, WordId, WordProgress};

/// Fixed reference time for tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 15, 10, 0, 0).unwrap()
}

pub fn word(id: WordId) -> Word {
    Word {
        id,
        term: format!("palabra{id}"),
        meaning: format!("word {id}"),
        pronunciation: None,
        example: None,
    }
}

/// A reviewed record due `offset` from [`now`] (negative = overdue).
pub fn reviewed(id: WordId, memory_level: u32, offset: Duration) -> WordProgress {
    WordProgress {
        word_id: id,
        memory_level,
        review_count: memory_level,
        status: ProgressStatus::Learned,
        last_reviewed: Some(now() - Duration::days(3)),
        next_review: Some(now() + offset),
        word: Some(word(id)),
    }
}

/// A record that has never been reviewed.
pub fn fresh(id: WordId) -> WordProgress {
    WordProgress {
        word: Some(word(id)),
        ..WordProgress::new(id)
    }
}

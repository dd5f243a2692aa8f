//! Due-word detection.

use crate::types::WordProgress;
use chrono::{DateTime, Utc};

/// Whether `record` is scheduled at or before `now`.
pub fn is_due(record: &WordProgress, now: DateTime<Utc>) -> bool {
    record.next_review.is_some_and(|at| at <= now)
}

/// Records due at `now`, in the order given.
pub fn due_words<'a, I>(records: I, now: DateTime<Utc>) -> Vec<&'a WordProgress>
where
    I: IntoIterator<Item = &'a WordProgress>,
{
    records.into_iter().filter(|r| is_due(r, now)).collect()
}

/// Number of records due at `now`.
pub fn due_count<'a, I>(records: I, now: DateTime<Utc>) -> usize
where
    I: IntoIterator<Item = &'a WordProgress>,
{
    records.into_iter().filter(|r| is_due(r, now)).count()
}

//! Answer checking for the revise game.

use serde::{Deserialize, Serialize};

/// Result of comparing a typed answer to a word's meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    /// Typed answer after normalization (for display).
    pub typed_normalized: String,
    /// Reference meaning after normalization (for display).
    pub expected_normalized: String,
}

/// Trim, collapse inner whitespace and lowercase.
pub fn normalize_answer(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True when `s` has nothing but whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Compare a typed answer against the reference meaning, ignoring case and
/// surrounding whitespace.
pub fn check_answer(typed: &str, meaning: &str) -> AnswerCheck {
    let typed_normalized = normalize_answer(typed);
    let expected_normalized = normalize_answer(meaning);
    AnswerCheck {
        is_correct: typed_normalized == expected_normalized,
        typed_normalized,
        expected_normalized,
    }
}

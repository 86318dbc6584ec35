//! Error types for cloze-core.

use thiserror::Error;

/// Result type alias using ClozeError.
pub type Result<T> = std::result::Result<T, ClozeError>;

/// Errors that can occur while building patterns or rendering cards.
#[derive(Debug, Error)]
pub enum ClozeError {
    #[error("card {index} does not exist (note has {num_cards} cards)")]
    IndexOutOfRange { index: usize, num_cards: usize },

    #[error("unrecognized action '{code}' for deletion {deletion} on card {card_index}")]
    MalformedSequence {
        deletion: usize,
        card_index: usize,
        code: char,
    },

    #[error("invalid cloze pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("cloze pattern {pattern} has no `answer` capture group")]
    MissingAnswerGroup { pattern: String },
}

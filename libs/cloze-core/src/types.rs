//! Core types for cloze notes.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Action code applied to a deletion when its sequence has no entry for a card.
pub const DEFAULT_ACTION_CODE: char = 's';

/// What a deletion does on a given card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Hidden behind a prompt, revealed on the back.
    Ask,
    /// Hidden on both sides.
    Hide,
    /// Plain answer text on both sides.
    Show,
}

impl Action {
    /// Single-character code used in action sequences.
    pub fn code(self) -> char {
        match self {
            Self::Ask => 'a',
            Self::Hide => 'h',
            Self::Show => 's',
        }
    }

    /// Create from a sequence code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'a' => Some(Self::Ask),
            'h' => Some(Self::Hide),
            's' => Some(Self::Show),
            _ => None,
        }
    }
}

/// Cloze style a note was parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ClozeType {
    Overlapping,
}

impl ClozeType {
    /// Get the cloze type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overlapping => "overlapping",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overlapping" => Some(Self::Overlapping),
            _ => None,
        }
    }
}

/// A single marked span parsed out of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClozeDeletion {
    /// Exact marked text, delimiters included.
    pub raw: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// One action code per card, may be shorter than the note's card count.
    pub seq: String,
    /// Byte range of `raw` inside the note text.
    pub span: Range<usize>,
}

impl ClozeDeletion {
    /// Number of cards this deletion explicitly configures.
    pub fn seq_len(&self) -> usize {
        self.seq.chars().count()
    }

    /// Raw action code for a card, falling back to show past the end of `seq`.
    pub fn action_code(&self, card_index: usize) -> char {
        self.seq
            .chars()
            .nth(card_index)
            .unwrap_or(DEFAULT_ACTION_CODE)
    }

    /// Resolved action for a card, `None` when the code is unrecognized.
    pub fn action(&self, card_index: usize) -> Option<Action> {
        Action::from_code(self.action_code(card_index))
    }
}

/// Front and back text of one generated card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub index: usize,
    pub front: String,
    pub back: String,
}

/// Handling of action codes outside `a`, `h` and `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAction {
    /// Fail the render with `ClozeError::MalformedSequence`.
    Reject,
    /// Keep the marked span exactly as written, delimiters included.
    LeaveRaw,
}

impl Default for UnknownAction {
    fn default() -> Self {
        Self::Reject
    }
}

/// Rendering settings for the default formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    pub open: String,
    pub close: String,
    /// Shown in place of a hidden answer when there is no hint.
    pub placeholder: String,
    pub unknown_action: UnknownAction,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            open: "[".to_string(),
            close: "]".to_string(),
            placeholder: "...".to_string(),
            unknown_action: UnknownAction::default(),
        }
    }
}

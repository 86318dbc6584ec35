//! Cloze deletion notes rendered into flashcards.
//!
//! Provides:
//! - Pattern matchers that find marked spans in raw text (`==answer==^[seq]`, `{{answer}}^[seq]`)
//! - Overlapping cloze notes, where each deletion carries its own per-card action sequence
//! - Pluggable formatters for asked, hidden and revealed deletions
//! - Shared types (ClozeDeletion, Card, Action, etc.)
//!
//! ```
//! use cloze_core::{ClozeNote, OverlappingNote, RegexPattern};
//!
//! let note = OverlappingNote::new("This is a ==cloze1==^[a] ==cloze2==^[sha]", &[RegexPattern::highlight()]);
//! assert_eq!(note.num_cards(), 3);
//! assert_eq!(note.card_front(0, None).unwrap(), "This is a [...] cloze2");
//! assert_eq!(note.card_back(2, None).unwrap(), "This is a cloze1 [cloze2]");
//! ```

pub mod error;
pub mod format;
pub mod note;
pub mod overlapping;
pub mod pattern;
pub mod types;

pub use error::{ClozeError, Result};
pub use format::{ClozeFormat, SimpleFormat};
pub use note::{check_card_index, ClozeNote, Note};
pub use overlapping::OverlappingNote;
pub use pattern::{ClozeMatch, ClozePattern, RegexPattern};
pub use types::{
    Action, Card, ClozeDeletion, ClozeType, FormatSettings, UnknownAction, DEFAULT_ACTION_CODE,
};

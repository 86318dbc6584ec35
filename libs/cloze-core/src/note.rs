//! Contract shared by every cloze note style.

use crate::error::{ClozeError, Result};
use crate::format::{ClozeFormat, SimpleFormat};
use crate::overlapping::OverlappingNote;
use crate::pattern::ClozePattern;
use crate::types::{Card, ClozeDeletion, ClozeType};

/// A note parsed once from raw text, rendered into any number of cards.
///
/// Implementors supply the parsed state and the two render routines; index
/// validation and the default formatter live in the provided methods.
pub trait ClozeNote {
    fn cloze_type(&self) -> ClozeType;

    /// Text the note was parsed from.
    fn raw(&self) -> &str;

    fn num_cards(&self) -> usize;

    /// Deletions in parse order.
    fn deletions(&self) -> &[ClozeDeletion];

    /// Front text for an already validated card index.
    fn render_front(&self, card_index: usize, format: &dyn ClozeFormat) -> Result<String>;

    /// Back text for an already validated card index.
    fn render_back(&self, card_index: usize, format: &dyn ClozeFormat) -> Result<String>;

    fn card_front(&self, card_index: usize, format: Option<&dyn ClozeFormat>) -> Result<String> {
        check_card_index(card_index, self.num_cards())?;
        match format {
            Some(format) => self.render_front(card_index, format),
            None => self.render_front(card_index, &SimpleFormat::default()),
        }
    }

    fn card_back(&self, card_index: usize, format: Option<&dyn ClozeFormat>) -> Result<String> {
        check_card_index(card_index, self.num_cards())?;
        match format {
            Some(format) => self.render_back(card_index, format),
            None => self.render_back(card_index, &SimpleFormat::default()),
        }
    }

    fn card(&self, card_index: usize, format: Option<&dyn ClozeFormat>) -> Result<Card> {
        Ok(Card {
            index: card_index,
            front: self.card_front(card_index, format)?,
            back: self.card_back(card_index, format)?,
        })
    }

    /// Every card of the note, in index order.
    fn cards(&self, format: Option<&dyn ClozeFormat>) -> Result<Vec<Card>> {
        (0..self.num_cards())
            .map(|index| self.card(index, format))
            .collect()
    }
}

/// Fail unless `0 <= card_index < num_cards`.
pub fn check_card_index(card_index: usize, num_cards: usize) -> Result<()> {
    if card_index >= num_cards {
        return Err(ClozeError::IndexOutOfRange {
            index: card_index,
            num_cards,
        });
    }
    Ok(())
}

/// A note of any supported cloze style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Overlapping(OverlappingNote),
}

impl Note {
    /// Parse `raw` with the style selected by `cloze_type`.
    pub fn parse<P: ClozePattern>(
        cloze_type: ClozeType,
        raw: impl Into<String>,
        patterns: &[P],
    ) -> Self {
        match cloze_type {
            ClozeType::Overlapping => Self::Overlapping(OverlappingNote::new(raw, patterns)),
        }
    }

    fn inner(&self) -> &dyn ClozeNote {
        match self {
            Self::Overlapping(note) => note,
        }
    }
}

impl From<OverlappingNote> for Note {
    fn from(note: OverlappingNote) -> Self {
        Self::Overlapping(note)
    }
}

impl ClozeNote for Note {
    fn cloze_type(&self) -> ClozeType {
        self.inner().cloze_type()
    }

    fn raw(&self) -> &str {
        self.inner().raw()
    }

    fn num_cards(&self) -> usize {
        self.inner().num_cards()
    }

    fn deletions(&self) -> &[ClozeDeletion] {
        self.inner().deletions()
    }

    fn render_front(&self, card_index: usize, format: &dyn ClozeFormat) -> Result<String> {
        self.inner().render_front(card_index, format)
    }

    fn render_back(&self, card_index: usize, format: &dyn ClozeFormat) -> Result<String> {
        self.inner().render_back(card_index, format)
    }
}

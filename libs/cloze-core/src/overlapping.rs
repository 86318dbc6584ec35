//! Overlapping cloze notes.
//!
//! Every deletion carries its own action sequence, one code per card:
//!
//! ```text
//! This is a ==cloze1==^[a] ==cloze2==^[sha]
//! ```
//!
//! produces three cards. A sequence shorter than the longest one is padded
//! with `s`, so the note above reads the same as `^[ass]` and `^[sha]`.

use crate::error::{ClozeError, Result};
use crate::format::ClozeFormat;
use crate::note::ClozeNote;
use crate::pattern::ClozePattern;
use crate::types::{Action, ClozeDeletion, ClozeType, UnknownAction};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Front,
    Back,
}

/// Note whose deletions are configured independently per card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlappingNote {
    raw: String,
    deletions: Vec<ClozeDeletion>,
    num_cards: usize,
    /// Indices of deletions that own their span, ordered by position in `raw`.
    placement: Vec<usize>,
}

impl OverlappingNote {
    /// Parse `raw` with each pattern in turn.
    pub fn new<P: ClozePattern>(raw: impl Into<String>, patterns: &[P]) -> Self {
        let raw = raw.into();
        let (deletions, num_cards) = parse_deletions(&raw, patterns);
        let placement = place_deletions(&deletions);

        tracing::debug!(
            deletions = deletions.len(),
            num_cards,
            "parsed overlapping cloze note"
        );

        Self {
            raw,
            deletions,
            num_cards,
            placement,
        }
    }

    fn render(&self, card_index: usize, format: &dyn ClozeFormat, side: Side) -> Result<String> {
        let mut rendered = Vec::with_capacity(self.deletions.len());

        for (position, deletion) in self.deletions.iter().enumerate() {
            // Shadowed deletions never reach the output, so their codes are not checked.
            if !self.placement.contains(&position) {
                rendered.push(String::new());
                continue;
            }
            let hint = deletion.hint.as_deref();
            let text = match deletion.action(card_index) {
                Some(Action::Ask) => match side {
                    Side::Front => format.asking(&deletion.answer, hint),
                    Side::Back => format.showing_answer(&deletion.answer, hint),
                },
                Some(Action::Hide) => format.hiding(&deletion.answer, hint),
                Some(Action::Show) => deletion.answer.clone(),
                None => match format.unknown_action() {
                    UnknownAction::Reject => {
                        return Err(ClozeError::MalformedSequence {
                            deletion: position,
                            card_index,
                            code: deletion.action_code(card_index),
                        })
                    }
                    UnknownAction::LeaveRaw => deletion.raw.clone(),
                },
            };
            rendered.push(text);
        }

        Ok(self.splice(&rendered))
    }

    /// Copy `raw`, swapping each placed span for its rendered text.
    fn splice(&self, rendered: &[String]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut cursor = 0;

        for &index in &self.placement {
            let span = &self.deletions[index].span;
            out.push_str(&self.raw[cursor..span.start]);
            out.push_str(&rendered[index]);
            cursor = span.end;
        }
        out.push_str(&self.raw[cursor..]);

        out
    }
}

impl ClozeNote for OverlappingNote {
    fn cloze_type(&self) -> ClozeType {
        ClozeType::Overlapping
    }

    fn raw(&self) -> &str {
        &self.raw
    }

    fn num_cards(&self) -> usize {
        self.num_cards
    }

    fn deletions(&self) -> &[ClozeDeletion] {
        &self.deletions
    }

    fn render_front(&self, card_index: usize, format: &dyn ClozeFormat) -> Result<String> {
        self.render(card_index, format, Side::Front)
    }

    fn render_back(&self, card_index: usize, format: &dyn ClozeFormat) -> Result<String> {
        self.render(card_index, format, Side::Back)
    }
}

/// Collect deletions from every pattern, in pattern order, and the card count.
fn parse_deletions<P: ClozePattern>(raw: &str, patterns: &[P]) -> (Vec<ClozeDeletion>, usize) {
    let mut deletions = Vec::new();
    let mut num_cards = 0;

    for (pattern_index, pattern) in patterns.iter().enumerate() {
        for found in pattern.matches(ClozeType::Overlapping, raw) {
            // A match without a sequence is not a cloze; stop scanning this pattern.
            let Some(seq) = found.seq else {
                tracing::trace!(
                    pattern = pattern_index,
                    at = found.span.start,
                    "match without sequence, ending scan"
                );
                break;
            };
            let Some(marked) = raw.get(found.span.clone()) else {
                tracing::warn!(
                    pattern = pattern_index,
                    start = found.span.start,
                    end = found.span.end,
                    "pattern reported a span outside the note text, ending scan"
                );
                break;
            };

            let deletion = ClozeDeletion {
                raw: marked.to_string(),
                answer: found.answer,
                hint: found.hint,
                seq,
                span: found.span,
            };
            tracing::trace!(pattern = pattern_index, raw = %deletion.raw, seq = %deletion.seq, "cloze deletion");

            num_cards = num_cards.max(deletion.seq_len());
            deletions.push(deletion);
        }
    }

    (deletions, num_cards)
}

/// Order deletions by position, dropping any whose span overlaps an earlier one.
fn place_deletions(deletions: &[ClozeDeletion]) -> Vec<usize> {
    let mut placed: Vec<usize> = Vec::with_capacity(deletions.len());

    for (index, deletion) in deletions.iter().enumerate() {
        let clash = placed
            .iter()
            .copied()
            .find(|&other| overlaps(&deletions[other].span, &deletion.span));
        if let Some(other) = clash {
            tracing::warn!(
                deletion = index,
                kept = other,
                raw = %deletion.raw,
                "cloze span overlaps an earlier deletion and will not be rendered"
            );
            continue;
        }
        placed.push(index);
    }

    placed.sort_by_key(|&index| deletions[index].span.start);
    placed
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SimpleFormat;
    use crate::pattern::RegexPattern;
    use crate::types::FormatSettings;
    use pretty_assertions::assert_eq;

    const SCENARIO: &str = "This is a ==cloze1==^[a] ==cloze2==^[sha]";

    fn highlight_note(raw: &str) -> OverlappingNote {
        OverlappingNote::new(raw, &[RegexPattern::highlight()])
    }

    /// Formatter that tags every rendering with its kind.
    struct Tagged;

    impl ClozeFormat for Tagged {
        fn asking(&self, answer: &str, hint: Option<&str>) -> String {
            format!("<ask {answer} {}>", hint.unwrap_or("-"))
        }

        fn hiding(&self, answer: &str, _hint: Option<&str>) -> String {
            format!("<hide {answer}>")
        }

        fn showing_answer(&self, answer: &str, _hint: Option<&str>) -> String {
            format!("<answer {answer}>")
        }
    }

    #[test]
    fn parse_scenario() {
        let note = highlight_note(SCENARIO);
        assert_eq!(note.num_cards(), 3);
        assert_eq!(note.deletions().len(), 2);

        let first = &note.deletions()[0];
        assert_eq!(first.raw, "==cloze1==^[a]");
        assert_eq!(first.answer, "cloze1");
        assert_eq!(first.seq, "a");
        assert_eq!(first.hint, None);
        assert_eq!(&SCENARIO[first.span.clone()], first.raw);

        assert_eq!(note.deletions()[1].seq, "sha");
    }

    #[test]
    fn render_scenario_fronts() {
        let note = highlight_note(SCENARIO);
        assert_eq!(note.card_front(0, None).unwrap(), "This is a [...] cloze2");
        assert_eq!(note.card_front(1, None).unwrap(), "This is a cloze1 [...]");
        assert_eq!(note.card_front(2, None).unwrap(), "This is a cloze1 [...]");
    }

    #[test]
    fn render_scenario_backs() {
        let note = highlight_note(SCENARIO);
        assert_eq!(note.card_back(0, None).unwrap(), "This is a [cloze1] cloze2");
        assert_eq!(note.card_back(1, None).unwrap(), "This is a cloze1 [...]");
        assert_eq!(note.card_back(2, None).unwrap(), "This is a cloze1 [cloze2]");
    }

    #[test]
    fn render_uses_supplied_format() {
        let note = highlight_note("==Paris::city==^[ah] in ==France==^[ha]");
        assert_eq!(
            note.card_front(0, Some(&Tagged)).unwrap(),
            "<ask Paris city> in <hide France>"
        );
        assert_eq!(
            note.card_back(0, Some(&Tagged)).unwrap(),
            "<answer Paris> in <hide France>"
        );
        assert_eq!(
            note.card_front(1, Some(&Tagged)).unwrap(),
            "<hide Paris> in <ask France ->"
        );
    }

    #[test]
    fn empty_note_has_no_cards() {
        let note = highlight_note("No clozes here, just ==a highlight==.");
        assert_eq!(note.num_cards(), 0);
        assert!(note.deletions().is_empty());
        assert!(matches!(
            note.card_front(0, None),
            Err(ClozeError::IndexOutOfRange { index: 0, num_cards: 0 })
        ));
        assert!(matches!(
            note.card_back(0, None),
            Err(ClozeError::IndexOutOfRange { index: 0, num_cards: 0 })
        ));
    }

    #[test]
    fn index_past_last_card_fails() {
        let note = highlight_note(SCENARIO);
        assert!(matches!(
            note.card_front(3, Some(&Tagged)),
            Err(ClozeError::IndexOutOfRange { index: 3, num_cards: 3 })
        ));
        assert!(matches!(
            note.card_back(usize::MAX, None),
            Err(ClozeError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn missing_sequence_ends_scan() {
        let pattern =
            RegexPattern::new(r"\[(?P<answer>[^\]|]+)(?:\|(?P<seq>[^\]]*))?\]").unwrap();
        let note = OverlappingNote::new("[one|a] [two] [three|aa]", &[pattern]);
        assert_eq!(note.deletions().len(), 1);
        assert_eq!(note.num_cards(), 1);
        assert_eq!(note.card_front(0, None).unwrap(), "[...] [two] [three|aa]");
    }

    #[test]
    fn patterns_append_in_order() {
        let raw = "{{b1}}^[a] ==h1==^[s] {{b2}}^[ahha] ==h2==^[aa]";
        let note = OverlappingNote::new(raw, &[RegexPattern::highlight(), RegexPattern::braces()]);
        let answers: Vec<&str> = note.deletions().iter().map(|d| d.answer.as_str()).collect();
        assert_eq!(answers, vec!["h1", "h2", "b1", "b2"]);
        assert_eq!(note.num_cards(), 4);
        assert_eq!(note.card_front(3, None).unwrap(), "b1 h1 [...] h2");
    }

    #[test]
    fn unknown_action_rejected_by_default() {
        let note = highlight_note("==a==^[ax] ==b==^[sa]");
        assert_eq!(note.card_front(0, None).unwrap(), "[...] b");
        assert!(matches!(
            note.card_front(1, None),
            Err(ClozeError::MalformedSequence {
                deletion: 0,
                card_index: 1,
                code: 'x'
            })
        ));
        assert!(matches!(
            note.card_back(1, None),
            Err(ClozeError::MalformedSequence { .. })
        ));
    }

    #[test]
    fn unknown_action_can_leave_raw_markup() {
        let note = highlight_note("==a==^[ax] ==b==^[sa]");
        let format = SimpleFormat::new(FormatSettings {
            unknown_action: UnknownAction::LeaveRaw,
            ..FormatSettings::default()
        });
        assert_eq!(note.card_front(1, Some(&format)).unwrap(), "==a==^[ax] [...]");
        assert_eq!(note.card_back(1, Some(&format)).unwrap(), "==a==^[ax] [b]");
    }

    #[test]
    fn formatter_output_is_never_rematched() {
        struct Echo;

        impl ClozeFormat for Echo {
            fn asking(&self, _answer: &str, _hint: Option<&str>) -> String {
                "?".to_string()
            }

            fn hiding(&self, _answer: &str, _hint: Option<&str>) -> String {
                "==b==^[a]".to_string()
            }

            fn showing_answer(&self, answer: &str, _hint: Option<&str>) -> String {
                answer.to_string()
            }
        }

        let note = highlight_note("==a==^[h] ==b==^[a]");
        assert_eq!(note.card_front(0, Some(&Echo)).unwrap(), "==b==^[a] ?");
    }

    #[test]
    fn repeated_raw_tokens_render_independently() {
        let note = highlight_note("==x==^[as] and ==x==^[as]");
        assert_eq!(note.deletions().len(), 2);
        assert_eq!(note.card_front(0, None).unwrap(), "[...] and [...]");
        assert_eq!(note.card_front(1, None).unwrap(), "x and x");
    }

    #[test]
    fn overlapping_spans_keep_earlier_deletion() {
        let inner = RegexPattern::new(r"(?P<answer>cloze1)==\^\[(?P<seq>a)\]").unwrap();
        let note = OverlappingNote::new(
            "==cloze1==^[a] end",
            &[RegexPattern::highlight(), inner],
        );
        assert_eq!(note.deletions().len(), 2);
        assert_eq!(note.num_cards(), 1);
        assert_eq!(note.card_front(0, None).unwrap(), "[...] end");
        assert_eq!(note.card_back(0, None).unwrap(), "[cloze1] end");
    }

    #[test]
    fn shadowed_deletion_codes_are_not_validated() {
        let inner = RegexPattern::new(r"(?P<answer>cloze1)(?P<seq>==)").unwrap();
        let note = OverlappingNote::new(
            "==cloze1==^[a] end",
            &[RegexPattern::highlight(), inner],
        );
        assert_eq!(note.deletions()[1].seq, "==");
        assert_eq!(note.num_cards(), 2);
        assert_eq!(note.card_front(0, None).unwrap(), "[...] end");
        assert_eq!(note.card_back(1, None).unwrap(), "cloze1 end");
    }

    #[test]
    fn shown_deletions_ignore_the_formatter() {
        struct Shouting;

        impl ClozeFormat for Shouting {
            fn asking(&self, _answer: &str, _hint: Option<&str>) -> String {
                "?".to_string()
            }

            fn hiding(&self, answer: &str, _hint: Option<&str>) -> String {
                answer.to_uppercase()
            }

            fn showing_answer(&self, answer: &str, _hint: Option<&str>) -> String {
                answer.to_uppercase()
            }
        }

        let note = highlight_note("The ==cell==^[s] here ==x==^[a]");
        assert_eq!(note.card_front(0, Some(&Shouting)).unwrap(), "The cell here ?");
        assert_eq!(note.card_back(0, Some(&Shouting)).unwrap(), "The cell here X");
    }

    #[test]
    fn unicode_text_around_spans() {
        let note = highlight_note("首都は==東京::都市==^[a]です");
        assert_eq!(note.card_front(0, None).unwrap(), "首都は[都市]です");
        assert_eq!(note.card_back(0, None).unwrap(), "首都は[東京]です");
    }

    #[test]
    fn rendering_is_repeatable() {
        let note = highlight_note(SCENARIO);
        for index in 0..note.num_cards() {
            assert_eq!(
                note.card_front(index, None).unwrap(),
                note.card_front(index, None).unwrap()
            );
            assert_eq!(
                note.card_back(index, Some(&Tagged)).unwrap(),
                note.card_back(index, Some(&Tagged)).unwrap()
            );
        }
        assert_eq!(note.raw(), SCENARIO);
    }
}

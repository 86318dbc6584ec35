//! Pattern matchers that locate cloze deletions in raw text.
//!
//! # Built-in syntaxes
//! ```text
//! ==answer==^[seq]          ==answer::hint==^[seq]
//! {{answer}}^[seq]          {{answer::hint}}^[seq]
//! ```
//!
//! `seq` holds one action code per card: `a` (ask), `h` (hide), `s` (show).

use crate::error::{ClozeError, Result};
use crate::types::ClozeType;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

const HIGHLIGHT_PATTERN: &str =
    r"==(?P<answer>[^=]+?)(?:::(?P<hint>[^=]+?))?==\^\[(?P<seq>[^\]]+)\]";
const BRACES_PATTERN: &str =
    r"\{\{(?P<answer>[^{}]+?)(?:::(?P<hint>[^{}]+?))?\}\}\^\[(?P<seq>[^\]]+)\]";

/// One match reported by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClozeMatch {
    /// Byte range of the whole marked span.
    pub span: Range<usize>,
    pub answer: String,
    pub hint: Option<String>,
    /// `None` ends the scan for the pattern that produced it.
    pub seq: Option<String>,
}

/// Source of cloze matches for a given cloze type.
///
/// Implementations must yield matches in increasing `span.start` order and
/// every span must lie on char boundaries of `text`.
pub trait ClozePattern {
    fn matches<'a>(
        &'a self,
        cloze_type: ClozeType,
        text: &'a str,
    ) -> Box<dyn Iterator<Item = ClozeMatch> + 'a>;
}

impl<T: ClozePattern + ?Sized> ClozePattern for &T {
    fn matches<'a>(
        &'a self,
        cloze_type: ClozeType,
        text: &'a str,
    ) -> Box<dyn Iterator<Item = ClozeMatch> + 'a> {
        (**self).matches(cloze_type, text)
    }
}

impl<T: ClozePattern + ?Sized> ClozePattern for Box<T> {
    fn matches<'a>(
        &'a self,
        cloze_type: ClozeType,
        text: &'a str,
    ) -> Box<dyn Iterator<Item = ClozeMatch> + 'a> {
        (**self).matches(cloze_type, text)
    }
}

/// Regex-backed pattern using the named groups `answer`, `hint` and `seq`.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
    cloze_type: ClozeType,
}

impl RegexPattern {
    /// Compile a pattern for overlapping notes.
    pub fn new(expr: &str) -> Result<Self> {
        Self::for_type(expr, ClozeType::Overlapping)
    }

    /// Compile a pattern that only answers for `cloze_type`.
    pub fn for_type(expr: &str, cloze_type: ClozeType) -> Result<Self> {
        let regex = Regex::new(expr)?;
        if !regex.capture_names().any(|name| name == Some("answer")) {
            return Err(ClozeError::MissingAnswerGroup {
                pattern: expr.to_string(),
            });
        }
        Ok(Self { regex, cloze_type })
    }

    /// `==answer==^[seq]`, optionally `==answer::hint==^[seq]`.
    pub fn highlight() -> Self {
        static HIGHLIGHT: OnceLock<Regex> = OnceLock::new();
        let regex = HIGHLIGHT
            .get_or_init(|| Regex::new(HIGHLIGHT_PATTERN).expect("Invalid highlight regex"));
        Self {
            regex: regex.clone(),
            cloze_type: ClozeType::Overlapping,
        }
    }

    /// `{{answer}}^[seq]`, optionally `{{answer::hint}}^[seq]`.
    pub fn braces() -> Self {
        static BRACES: OnceLock<Regex> = OnceLock::new();
        let regex =
            BRACES.get_or_init(|| Regex::new(BRACES_PATTERN).expect("Invalid braces regex"));
        Self {
            regex: regex.clone(),
            cloze_type: ClozeType::Overlapping,
        }
    }

    /// All built-in syntaxes, highlight first.
    pub fn builtin() -> Vec<Self> {
        vec![Self::highlight(), Self::braces()]
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl ClozePattern for RegexPattern {
    fn matches<'a>(
        &'a self,
        cloze_type: ClozeType,
        text: &'a str,
    ) -> Box<dyn Iterator<Item = ClozeMatch> + 'a> {
        if cloze_type != self.cloze_type {
            return Box::new(std::iter::empty());
        }

        Box::new(self.regex.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ClozeMatch {
                span: whole.range(),
                answer: caps
                    .name("answer")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                hint: non_empty(caps.name("hint")),
                seq: non_empty(caps.name("seq")),
            })
        }))
    }
}

/// Empty groups count as absent.
fn non_empty(group: Option<regex::Match<'_>>) -> Option<String> {
    group
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

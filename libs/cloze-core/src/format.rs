//! Rendering of hidden and revealed deletions.

use crate::types::{FormatSettings, UnknownAction};

/// Turns a deletion's answer and hint into display text.
///
/// Shown deletions always render as the bare answer and never reach the formatter.
pub trait ClozeFormat {
    /// Front side of an asked deletion.
    fn asking(&self, answer: &str, hint: Option<&str>) -> String;

    /// Hidden deletion, on either side.
    fn hiding(&self, answer: &str, hint: Option<&str>) -> String;

    /// Back side of an asked deletion.
    fn showing_answer(&self, answer: &str, hint: Option<&str>) -> String;

    fn unknown_action(&self) -> UnknownAction {
        UnknownAction::Reject
    }
}

/// Minimal bracketed formatter used when the caller supplies none.
///
/// With default settings an asked deletion renders as `[...]` (or `[hint]`),
/// a hidden one as `[...]` and a revealed answer as `[answer]`.
#[derive(Debug, Clone, Default)]
pub struct SimpleFormat {
    settings: FormatSettings,
}

impl SimpleFormat {
    pub fn new(settings: FormatSettings) -> Self {
        Self { settings }
    }

    fn wrap(&self, inner: &str) -> String {
        format!("{}{}{}", self.settings.open, inner, self.settings.close)
    }
}

impl ClozeFormat for SimpleFormat {
    fn asking(&self, _answer: &str, hint: Option<&str>) -> String {
        self.wrap(hint.unwrap_or(self.settings.placeholder.as_str()))
    }

    fn hiding(&self, _answer: &str, _hint: Option<&str>) -> String {
        self.wrap(&self.settings.placeholder)
    }

    fn showing_answer(&self, answer: &str, _hint: Option<&str>) -> String {
        self.wrap(answer)
    }

    fn unknown_action(&self) -> UnknownAction {
        self.settings.unknown_action
    }
}

//! Live input field handling.
//!
//! Writes formatted text into the chat input and positions the caret.

use super::macros::MacroExpander;
use super::template::{self, Formatted};

/// The chat input box the formatter writes into.
pub trait InputField {
    /// Current raw text.
    fn value(&self) -> String;

    /// Replace the text.
    fn set_value(&mut self, text: &str);

    /// Tell observers the text changed.
    fn notify_changed(&mut self);

    /// Place the caret at a char offset.
    fn set_cursor(&mut self, offset: usize);
}

/// Apply `template` to the current contents of `field`.
///
/// The caret is placed only after the change notification, since change
/// handlers may reset the selection.
pub fn apply_to_input(
    template: &str,
    field: &mut dyn InputField,
    macros: &dyn MacroExpander,
) -> Formatted {
    let current = field.value();
    let formatted = template::apply(template, &current, macros);

    field.set_value(&formatted.text);
    field.notify_changed();

    if let Some(offset) = formatted.cursor {
        field.set_cursor(offset);
    }

    tracing::debug!(
        chars = formatted.text.chars().count(),
        cursor = ?formatted.cursor,
        "Applied template to input"
    );

    formatted
}

/// In-memory input field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: Option<usize>,
    changes: usize,
}

impl TextBuffer {
    /// Create a buffer holding `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: None,
            changes: 0,
        }
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret offset, if one was set.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of change notifications received.
    #[must_use]
    pub const fn changes(&self) -> usize {
        self.changes
    }

    /// Text with a `|` marker at the caret.
    #[must_use]
    pub fn with_cursor_marker(&self) -> String {
        match self.cursor {
            Some(offset) => {
                let mut out: String = self.text.chars().take(offset).collect();
                out.push('|');
                out.extend(self.text.chars().skip(offset));
                out
            }
            None => self.text.clone(),
        }
    }
}

impl InputField for TextBuffer {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn notify_changed(&mut self) {
        self.changes += 1;
        // Observers of a changed field see the caret at the end.
        self.cursor = None;
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = Some(offset.min(self.text.chars().count()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::macros::NoMacros;

    #[derive(Default)]
    struct RecordingField {
        text: String,
        calls: Vec<String>,
    }

    impl InputField for RecordingField {
        fn value(&self) -> String {
            self.text.clone()
        }

        fn set_value(&mut self, text: &str) {
            self.text = text.to_string();
            self.calls.push(format!("set:{text}"));
        }

        fn notify_changed(&mut self) {
            self.calls.push("changed".to_string());
        }

        fn set_cursor(&mut self, offset: usize) {
            self.calls.push(format!("cursor:{offset}"));
        }
    }

    #[test]
    fn test_cursor_set_after_change_notification() {
        let mut field = RecordingField {
            text: "hello".to_string(),
            ..Default::default()
        };
        apply_to_input("> \"{{csr}}{{msg}}\"", &mut field, &NoMacros);
        assert_eq!(field.calls, vec!["set:> \"hello\"", "changed", "cursor:3"]);
    }

    #[test]
    fn test_no_cursor_call_without_placeholder() {
        let mut field = RecordingField {
            text: "hello".to_string(),
            ..Default::default()
        };
        apply_to_input("> {{msg}}", &mut field, &NoMacros);
        assert_eq!(field.calls, vec!["set:> hello", "changed"]);
    }

    #[test]
    fn test_text_buffer_keeps_cursor() {
        let mut buffer = TextBuffer::new("hi");
        apply_to_input("{{msg}} \"{{csr}}\"", &mut buffer, &NoMacros);
        assert_eq!(buffer.text(), "hi \"\"");
        assert_eq!(buffer.cursor(), Some(4));
        assert_eq!(buffer.changes(), 1);
        assert_eq!(buffer.with_cursor_marker(), "hi \"|\"");
    }
}

//! Template engine.
//!
//! Turns a formatter template and the current input text into the new input
//! text plus an optional caret offset.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use super::macros::MacroExpander;
use crate::domain::CURSOR_PLACEHOLDER;

static MSG_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?i-u)\{\{msg\}\}"));

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// Result of applying a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// New input text.
    pub text: String,
    /// Caret offset in chars, when the template carried `{{csr}}`.
    pub cursor: Option<usize>,
}

/// Apply `template` to `input`.
///
/// Host macros expand first, then every `{{msg}}` (any casing) becomes
/// `input` verbatim. A blank input strips leading whitespace from the result.
/// The first `{{csr}}` is removed and its position becomes the caret offset.
pub fn apply(template: &str, input: &str, macros: &dyn MacroExpander) -> Formatted {
    let expanded = macros.expand(template);
    let mut text = MSG_PATTERN
        .replace_all(&expanded, NoExpand(input))
        .into_owned();

    if input.trim().is_empty() {
        text = text.trim_start().to_string();
    }

    let cursor = text.find(CURSOR_PLACEHOLDER).map(|byte_pos| {
        text.replace_range(byte_pos..byte_pos + CURSOR_PLACEHOLDER.len(), "");
        text[..byte_pos].chars().count()
    });

    Formatted { text, cursor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::macros::{MacroTable, NoMacros};

    #[test]
    fn test_say_template_places_cursor_inside_quotes() {
        let out = apply("> \"{{csr}}{{msg}}\"", "hello", &NoMacros);
        assert_eq!(out.text, "> \"hello\"");
        assert_eq!(out.cursor, Some(3));
    }

    #[test]
    fn test_passthrough_on_empty_input() {
        let out = apply("{{msg}}", "", &NoMacros);
        assert_eq!(out.text, "");
        assert_eq!(out.cursor, None);
    }

    #[test]
    fn test_msg_is_case_insensitive_and_global() {
        let out = apply("{{MSG}} and {{Msg}} and {{msg}}", "x", &NoMacros);
        assert_eq!(out.text, "x and x and x");
        assert_eq!(out.cursor, None);
    }

    #[test]
    fn test_msg_casing_is_ascii_only() {
        let out = apply("{{m\u{17f}g}} {{MSG}}", "x", &NoMacros);
        assert_eq!(out.text, "{{m\u{17f}g}} x");
    }

    #[test]
    fn test_input_is_inserted_verbatim() {
        let out = apply("<{{msg}}>", "$0 $& ${1} <b>", &NoMacros);
        assert_eq!(out.text, "<$0 $& ${1} <b>>");
    }

    #[test]
    fn test_blank_input_strips_leading_whitespace() {
        assert_eq!(apply("  > {{msg}}", "", &NoMacros).text, "> ");
        assert_eq!(apply("  > {{msg}}", "   ", &NoMacros).text, ">    ");
        assert_eq!(apply("  > {{msg}}", "x", &NoMacros).text, "  > x");
    }

    #[test]
    fn test_blank_input_trim_happens_before_cursor_lookup() {
        let out = apply(" \"{{csr}}{{msg}}\"", "", &NoMacros);
        assert_eq!(out.text, "\"\"");
        assert_eq!(out.cursor, Some(1));
    }

    #[test]
    fn test_only_first_cursor_is_consumed() {
        let out = apply("{{csr}}a{{csr}}", "", &NoMacros);
        assert_eq!(out.text, "a{{csr}}");
        assert_eq!(out.cursor, Some(0));
    }

    #[test]
    fn test_cursor_placeholder_is_case_sensitive() {
        let out = apply("{{CSR}}{{msg}}", "x", &NoMacros);
        assert_eq!(out.text, "{{CSR}}x");
        assert_eq!(out.cursor, None);
    }

    #[test]
    fn test_cursor_offset_counts_chars() {
        let out = apply("{{msg}} «{{csr}}»", "héllo", &NoMacros);
        assert_eq!(out.text, "héllo «»");
        assert_eq!(out.cursor, Some(7));
    }

    #[test]
    fn test_cursor_after_message_substitution() {
        let out = apply("{{msg}} \"{{csr}}\"", "hi", &NoMacros);
        assert_eq!(out.text, "hi \"\"");
        assert_eq!(out.cursor, Some(4));
    }

    #[test]
    fn test_empty_template() {
        let out = apply("", "something", &NoMacros);
        assert_eq!(out.text, "");
        assert_eq!(out.cursor, None);
    }

    #[test]
    fn test_macros_expand_before_placeholders() {
        let mut table = MacroTable::new();
        table.insert("wrap", "*{{msg}}*");
        table.insert("char", "Seraphina");
        let out = apply("{{char}}: {{wrap}}", "waves", &table);
        assert_eq!(out.text, "Seraphina: *waves*");
    }
}

//! Output rendering for formatter listings and results.
//!
//! Supports multiple output formats: table, JSON, and plain text.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use super::migrator::Migration;
use super::template::Formatted;
use crate::domain::FormatterRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Compact table listing.
    #[default]
    Table,
    /// JSON format for programmatic use.
    Json,
    /// One line per entry.
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "plain" | "text" => Ok(Self::Plain),
            _ => Err(format!("Unknown format: {s}. Use: table, json, plain")),
        }
    }
}

/// Formats the formatter list as a table with 1-based numbers.
pub fn format_formatters_table(formatters: &[FormatterRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Icon", "Template"]);

    for (i, formatter) in formatters.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            formatter.display_name().to_string(),
            formatter.display_icon().to_string(),
            truncate(&formatter.template, 40),
        ]);
    }

    table.to_string()
}

/// Formats the formatter list as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_formatters_json(
    formatters: &[FormatterRecord],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(formatters)
}

/// Formats the formatter list one per line.
pub fn format_formatters_plain(formatters: &[FormatterRecord]) -> String {
    formatters
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                "{}. {} [{}] {}",
                i + 1,
                f.display_name(),
                f.display_icon(),
                f.template
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct FormattedJson<'a> {
    text: &'a str,
    cursor: Option<usize>,
}

/// Formats an apply result as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_result_json(result: &Formatted) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FormattedJson {
        text: &result.text,
        cursor: result.cursor,
    })
}

/// Formats a migration outcome for display.
pub fn format_migration(migration: Option<Migration>) -> String {
    match migration {
        Some(migration) => format!("{} Migrated settings: {migration}", "✓".green().bold()),
        None => format!("{} Settings already up to date", "✓".green()),
    }
}

/// Truncates a single line to max chars with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let line = s.lines().next().unwrap_or(s);
    if line.chars().count() <= max_len {
        line.to_string()
    } else {
        let head: String = line.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_formatters;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("first\nsecond", 10), "first");
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!(matches!("plain".parse::<OutputFormat>(), Ok(OutputFormat::Plain)));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_plain_listing_uses_fallbacks() {
        let mut list = default_formatters();
        list.push(FormatterRecord::new("", "", "{{msg}}"));
        let out = format_formatters_plain(&list);
        assert!(out.starts_with("1. Do [fa-person-running] > {{msg}}"));
        assert!(out.ends_with("4. New Formatter [fa-icons] {{msg}}"));
    }

    #[test]
    fn test_table_lists_every_formatter() {
        let out = format_formatters_table(&default_formatters());
        assert!(out.contains("Say"));
        assert!(out.contains("fa-quote-left"));
    }

    #[test]
    fn test_result_json() {
        let out = format_result_json(&Formatted {
            text: "> \"hi\"".to_string(),
            cursor: Some(3),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["cursor"], 3);
        assert_eq!(value["text"], "> \"hi\"");
    }
}

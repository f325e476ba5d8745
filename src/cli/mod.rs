//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use input_formatter::application::OutputFormat;
use input_formatter::domain::{Direction, FormatterField};

/// Input Formatter - wrap chat input in reusable text templates.
///
/// Templates use {{msg}} for the current input and {{csr}} for the caret.
#[derive(Parser, Debug)]
#[command(name = "input-formatter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ~/.input-formatter/config.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: table, json, or plain.
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the default configuration file.
    Init,

    /// Show configuration and settings paths.
    Paths,

    /// List formatters in picker order.
    List,

    /// Append a formatter.
    Add {
        /// Display name (defaults to "Formatter #N").
        #[arg(short, long)]
        name: Option<String>,

        /// Icon glyph identifier.
        #[arg(short, long)]
        icon: Option<String>,

        /// Template text.
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Remove a formatter.
    Remove {
        /// Formatter number from `list`.
        number: usize,
    },

    /// Move a formatter one step up or down.
    #[command(allow_negative_numbers = true)]
    Move {
        /// Formatter number from `list`.
        number: usize,

        /// Direction: up or down (or -1 / 1).
        #[arg(value_parser = parse_direction)]
        direction: Direction,
    },

    /// Change one field of a formatter.
    Edit {
        /// Formatter number from `list`.
        number: usize,

        /// Field: name, icon, or template.
        #[arg(value_parser = parse_field)]
        field: FormatterField,

        /// New value.
        value: String,
    },

    /// Apply a formatter to text (argument or stdin).
    Apply {
        /// Formatter number from `list`, or its name.
        formatter: String,

        /// Input text (read from stdin if omitted).
        text: Option<String>,

        /// Mark the caret position with `|`.
        #[arg(long)]
        cursor: bool,
    },

    /// Upgrade older settings to the current shape.
    Migrate,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse()
}

fn parse_field(s: &str) -> Result<FormatterField, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cli = Cli::parse_from(["input-formatter", "move", "2", "up"]);
        assert!(matches!(
            cli.command,
            Commands::Move {
                number: 2,
                direction: Direction::Up
            }
        ));
    }

    #[test]
    fn test_parse_edit_with_global_flags() {
        let cli = Cli::parse_from([
            "input-formatter",
            "edit",
            "1",
            "template",
            "> {{msg}}",
            "-vv",
            "--format",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.output_format(), Ok(OutputFormat::Json)));
        assert!(matches!(
            cli.command,
            Commands::Edit {
                field: FormatterField::Template,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_move_signed_offset() {
        let cli = Cli::parse_from(["input-formatter", "move", "2", "-1"]);
        assert!(matches!(
            cli.command,
            Commands::Move {
                number: 2,
                direction: Direction::Up
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(Cli::try_parse_from(["input-formatter", "edit", "1", "color", "red"]).is_err());
    }
}

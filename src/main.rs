//! Input Formatter - manage and apply chat input templates.
//!
//! Reads the formatter list from the host settings document, upgrading older
//! settings on the way, and applies templates to text.
//!
//! QUICK START:
//!   input-formatter init                  # Write a default config
//!   input-formatter list                  # Show formatters in picker order
//!   input-formatter apply 2 "hello"       # Apply formatter #2 to text
//!   echo hi | input-formatter apply say   # Apply by name, text from stdin
//!   input-formatter move 3 up             # Reorder

mod cli;

use std::io::Read;
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use input_formatter::application::{
    format_formatters_json, format_formatters_plain, format_formatters_table, format_migration,
    format_result_json, InputFormatter, MacroTable, OutputFormat, TextBuffer,
};
use input_formatter::domain::{self, AppConfig, Direction, FormatterField, FormatterRecord};
use input_formatter::infrastructure::{ensure_config_exists, load_config, JsonFileSettings};

type Session = InputFormatter<JsonFileSettings>;

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| domain::AppError::Config { message: e })?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);

    if matches!(cli.command, Commands::Init) {
        return cmd_init(&config_path);
    }

    let config = load_config(Some(&config_path))?;

    match cli.command {
        Commands::Init => {}
        Commands::Paths => {
            cmd_paths(&config_path, &config);
        }
        Commands::List => {
            let session = open_session(&config)?;
            print_formatters(session.store().list(), format)?;
        }
        Commands::Add {
            name,
            icon,
            template,
        } => {
            cmd_add(&config, name, icon, template)?;
        }
        Commands::Remove { number } => {
            cmd_remove(&config, number)?;
        }
        Commands::Move { number, direction } => {
            cmd_move(&config, number, direction)?;
        }
        Commands::Edit {
            number,
            field,
            value,
        } => {
            cmd_edit(&config, number, field, value)?;
        }
        Commands::Apply {
            formatter,
            text,
            cursor,
        } => {
            cmd_apply(&config, &formatter, text, cursor, format)?;
        }
        Commands::Migrate => {
            let session = open_session(&config)?;
            println!("{}", format_migration(session.store().migration()));
        }
    }

    Ok(())
}

/// Load settings and start a formatter session.
fn open_session(config: &AppConfig) -> domain::Result<Session> {
    let backend = JsonFileSettings::new(config.settings_file(), &config.settings.extension_id);
    InputFormatter::start(backend, Box::new(MacroTable::from_config(&config.macros)))
}

/// Convert a 1-based formatter number to an index.
fn to_index(number: usize) -> domain::Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| domain::AppError::InvalidData {
            message: "Formatter numbers start at 1".to_string(),
        })
}

/// Create the default config file.
fn cmd_init(config_path: &Path) -> domain::Result<()> {
    if ensure_config_exists(config_path)? {
        println!(
            "{} Created {}",
            "✓".green().bold(),
            config_path.display()
        );
    } else {
        println!("Config already exists: {}", config_path.display());
    }
    Ok(())
}

/// Show config and settings paths.
fn cmd_paths(config_path: &Path, config: &AppConfig) {
    println!("{}", "📂 Input Formatter Paths".bold());
    println!();
    println!("  {} {}", "config:  ".green(), config_path.display());
    println!("  {} {}", "settings:".blue(), config.settings_file().display());
    println!("  {} {}", "key:     ".yellow(), config.settings.extension_id);
}

fn print_formatters(formatters: &[FormatterRecord], format: OutputFormat) -> domain::Result<()> {
    let output = match format {
        OutputFormat::Table => format_formatters_table(formatters),
        OutputFormat::Json => {
            format_formatters_json(formatters).map_err(domain::AppError::json_parse)?
        }
        OutputFormat::Plain => format_formatters_plain(formatters),
    };
    println!("{output}");
    Ok(())
}

/// Append a formatter.
fn cmd_add(
    config: &AppConfig,
    name: Option<String>,
    icon: Option<String>,
    template: Option<String>,
) -> domain::Result<()> {
    let mut session = open_session(config)?;
    let store = session.store_mut();

    let defaults = FormatterRecord::numbered(store.len());
    let record = FormatterRecord::new(
        name.unwrap_or(defaults.name),
        icon.unwrap_or(defaults.icon),
        template.unwrap_or(defaults.template),
    );

    let index = store.add(record)?;
    println!(
        "{} Added formatter #{} ({})",
        "✓".green().bold(),
        index + 1,
        store.list()[index].display_name().cyan()
    );
    Ok(())
}

/// Remove a formatter.
fn cmd_remove(config: &AppConfig, number: usize) -> domain::Result<()> {
    let mut session = open_session(config)?;
    let removed = session.store_mut().remove(to_index(number)?)?;
    println!(
        "{} Removed {}",
        "✓".green().bold(),
        removed.display_name().cyan()
    );
    Ok(())
}

/// Move a formatter one step.
fn cmd_move(config: &AppConfig, number: usize, direction: Direction) -> domain::Result<()> {
    let mut session = open_session(config)?;
    let store = session.store_mut();

    if store.move_by(to_index(number)?, direction)? {
        println!("{} Moved formatter #{number}", "✓".green().bold());
    } else {
        println!("Formatter #{number} is already at the edge, nothing moved");
    }
    Ok(())
}

/// Edit one field of a formatter.
fn cmd_edit(
    config: &AppConfig,
    number: usize,
    field: FormatterField,
    value: String,
) -> domain::Result<()> {
    let mut session = open_session(config)?;
    session.store_mut().edit(to_index(number)?, field, value)?;
    println!("{} Updated {field} of formatter #{number}", "✓".green().bold());
    Ok(())
}

/// Apply a formatter to text.
fn cmd_apply(
    config: &AppConfig,
    formatter: &str,
    text: Option<String>,
    show_cursor: bool,
    format: OutputFormat,
) -> domain::Result<()> {
    let session = open_session(config)?;

    let index = match formatter.parse::<usize>() {
        Ok(number) => to_index(number)?,
        Err(_) => session
            .store()
            .position(formatter)
            .ok_or_else(|| domain::AppError::InvalidData {
                message: format!("Formatter '{formatter}' not found"),
            })?,
    };

    let input = match text {
        Some(text) => text,
        None => read_stdin()?,
    };

    let mut buffer = TextBuffer::new(input);
    let result = session.apply(index, &mut buffer)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                format_result_json(&result).map_err(domain::AppError::json_parse)?
            );
        }
        OutputFormat::Table | OutputFormat::Plain => {
            if show_cursor {
                println!("{}", buffer.with_cursor_marker());
            } else {
                println!("{}", buffer.text());
                if let Some(offset) = result.cursor {
                    eprintln!("{}", format!("caret at {offset}").dimmed());
                }
            }
        }
    }

    Ok(())
}

/// Read input text from stdin, dropping one trailing newline.
fn read_stdin() -> domain::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| domain::AppError::io("Failed to read stdin", e))?;

    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

//! Domain layer - core types and errors.
//!
//! This layer contains pure domain models and error types
//! without any IO.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, MacroConfig, SettingsConfig};
pub use error::{AppError, Result};
pub use models::{
    default_formatters, default_settings, Direction, FormatterField, FormatterRecord,
    CURSOR_PLACEHOLDER, FORMATTERS_KEY, MSG_PLACEHOLDER,
};

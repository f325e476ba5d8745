//! Infrastructure layer - external adapters (config and settings files).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod settings_file;

pub use config::{ensure_config_exists, load_config};
pub use settings_file::{JsonFileSettings, MemorySettings, SettingsBackend};

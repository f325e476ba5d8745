//! Application configuration models.
//!
//! Describes where persisted settings live and which host macros are
//! available to the parameter-substitution step.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the persisted host settings live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Host settings document (JSON). Defaults to `settings.json` in the data dir.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Key under `extension_settings` holding this extension's data.
    #[serde(default = "default_extension_id")]
    pub extension_id: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            file: None,
            extension_id: default_extension_id(),
        }
    }
}

fn default_extension_id() -> String {
    "CT-InputFormatter".to_string()
}

/// Host macro values expanded before placeholder substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroConfig {
    /// Value of `{{user}}`.
    #[serde(default = "default_user")]
    pub user: String,

    /// Value of `{{char}}`.
    #[serde(default = "default_char")]
    pub char: String,

    /// Additional `{{key}}` macros.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            char: default_char(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_user() -> String {
    "User".to_string()
}

fn default_char() -> String {
    "Assistant".to_string()
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Persisted settings location.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Macro values.
    #[serde(default)]
    pub macros: MacroConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".input-formatter")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Get the settings document path, using the default if not configured.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.settings
            .file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.settings.extension_id, "CT-InputFormatter");
        assert_eq!(config.macros.user, "User");
        assert!(config.macros.extra.is_empty());
        assert!(config.settings_file().ends_with("settings.json"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[macros]\nchar = \"Seraphina\"\n").unwrap();
        assert_eq!(config.macros.char, "Seraphina");
        assert_eq!(config.macros.user, "User");
        assert_eq!(config.settings.extension_id, "CT-InputFormatter");
    }

    #[test]
    fn test_explicit_settings_file() {
        let config: AppConfig =
            toml::from_str("[settings]\nfile = \"/tmp/host/settings.json\"\n").unwrap();
        assert_eq!(config.settings_file(), PathBuf::from("/tmp/host/settings.json"));
    }
}

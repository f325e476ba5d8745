//! Persisted extension settings.
//!
//! The host keeps one JSON settings document; every extension owns the object
//! stored under `extension_settings.<extension id>`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::{AppError, Result};

const EXTENSION_SETTINGS_KEY: &str = "extension_settings";

/// Storage for the extension's settings object.
pub trait SettingsBackend {
    /// Read the persisted settings, `None` when nothing was stored yet.
    ///
    /// # Errors
    /// Returns error if stored data cannot be read or parsed.
    fn load(&self) -> Result<Option<Map<String, Value>>>;

    /// Persist the settings.
    ///
    /// # Errors
    /// Returns error if the data cannot be written.
    fn save(&mut self, settings: &Map<String, Value>) -> Result<()>;
}

/// Settings stored in the host's JSON settings document.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    extension_id: String,
}

impl JsonFileSettings {
    /// Create a backend for `extension_id` inside the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, extension_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extension_id: extension_id.into(),
        }
    }

    /// Path of the settings document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            AppError::io(format!("Failed to read settings: {}", self.path.display()), e)
        })?;

        if content.trim().is_empty() {
            return Ok(Some(Map::new()));
        }

        match serde_json::from_str(&content).map_err(AppError::json_parse)? {
            Value::Object(document) => Ok(Some(document)),
            _ => Err(AppError::InvalidData {
                message: format!("Settings document is not an object: {}", self.path.display()),
            }),
        }
    }
}

impl SettingsBackend for JsonFileSettings {
    fn load(&self) -> Result<Option<Map<String, Value>>> {
        let Some(document) = self.read_document()? else {
            return Ok(None);
        };

        let settings = document
            .get(EXTENSION_SETTINGS_KEY)
            .and_then(|all| all.get(&self.extension_id));

        match settings {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(settings)) => {
                tracing::debug!(
                    path = %self.path.display(),
                    extension = %self.extension_id,
                    keys = settings.len(),
                    "Loaded extension settings"
                );
                Ok(Some(settings.clone()))
            }
            Some(_) => Err(AppError::InvalidData {
                message: format!("Settings for {} are not an object", self.extension_id),
            }),
        }
    }

    fn save(&mut self, settings: &Map<String, Value>) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();

        let all = document
            .entry(EXTENSION_SETTINGS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !all.is_object() {
            *all = Value::Object(Map::new());
        }
        if let Value::Object(all) = all {
            all.insert(self.extension_id.clone(), Value::Object(settings.clone()));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create settings directory", e))?;
        }

        let content =
            serde_json::to_string_pretty(&Value::Object(document)).map_err(AppError::json_parse)?;
        fs::write(&self.path, content).map_err(|e| {
            AppError::io(format!("Failed to write settings: {}", self.path.display()), e)
        })?;

        tracing::info!(path = %self.path.display(), "Settings saved");

        Ok(())
    }
}

/// In-memory settings, counting saves.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    settings: Option<Map<String, Value>>,
    saves: usize,
}

impl MemorySettings {
    /// Start with nothing persisted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `settings` already persisted.
    #[must_use]
    pub const fn with_settings(settings: Map<String, Value>) -> Self {
        Self {
            settings: Some(settings),
            saves: 0,
        }
    }

    /// Last saved settings.
    #[must_use]
    pub const fn settings(&self) -> Option<&Map<String, Value>> {
        self.settings.as_ref()
    }

    /// Number of saves so far.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }

    /// Replace the stored settings without counting a save.
    pub fn replace(&mut self, settings: Map<String, Value>) {
        self.settings = Some(settings);
    }
}

impl SettingsBackend for MemorySettings {
    fn load(&self) -> Result<Option<Map<String, Value>>> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, settings: &Map<String, Value>) -> Result<()> {
        self.settings = Some(settings.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let backend = JsonFileSettings::new(dir.path().join("settings.json"), "ext");
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("host").join("settings.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"theme":"dark","extension_settings":{"other":{"on":true}}}"#,
        )
        .unwrap();

        let mut backend = JsonFileSettings::new(&path, "ext");
        let mut settings = Map::new();
        settings.insert("formatters".to_string(), json!([]));
        backend.save(&settings).unwrap();

        let document: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["theme"], json!("dark"));
        assert_eq!(document["extension_settings"]["other"], json!({"on": true}));
        assert_eq!(document["extension_settings"]["ext"], json!({"formatters": []}));

        assert_eq!(backend.load().unwrap(), Some(settings));
    }

    #[test]
    fn test_rejects_non_object_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2]").unwrap();

        let backend = JsonFileSettings::new(&path, "ext");
        assert!(matches!(backend.load(), Err(AppError::InvalidData { .. })));
    }

    #[test]
    fn test_memory_settings_counts_saves() {
        let mut backend = MemorySettings::new();
        assert!(backend.load().unwrap().is_none());
        backend.save(&Map::new()).unwrap();
        backend.save(&Map::new()).unwrap();
        assert_eq!(backend.saves(), 2);
        assert_eq!(backend.load().unwrap(), Some(Map::new()));
    }
}

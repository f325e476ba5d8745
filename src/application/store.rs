//! Formatter store.
//!
//! Owns the ordered formatter list and every read and write of the persisted
//! settings. Each mutation is persisted, then observers receive the new list.

use serde_json::{Map, Value};

use super::migrator::{self, Migration};
use crate::domain::{
    default_settings, AppError, Direction, FormatterField, FormatterRecord, Result,
    FORMATTERS_KEY,
};
use crate::infrastructure::SettingsBackend;

type Observer = Box<dyn FnMut(&[FormatterRecord])>;

/// Ordered, persisted list of formatters.
pub struct FormatterStore<B: SettingsBackend> {
    backend: B,
    settings: Map<String, Value>,
    formatters: Vec<FormatterRecord>,
    migration: Option<Migration>,
    observers: Vec<Observer>,
}

impl<B: SettingsBackend> FormatterStore<B> {
    /// Load the store, upgrading older settings shapes first.
    ///
    /// Settings are written back when a migration ran or defaults were filled in.
    ///
    /// # Errors
    /// Returns error if the settings cannot be read, migrated or saved.
    pub fn open(backend: B) -> Result<Self> {
        let mut store = Self {
            backend,
            settings: Map::new(),
            formatters: Vec::new(),
            migration: None,
            observers: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    fn load(&mut self) -> Result<()> {
        let persisted = self.backend.load()?;
        let fresh = persisted.is_none();
        let mut settings = persisted.unwrap_or_default();

        let migration = migrator::migrate(&mut settings)?;
        let added = migrator::ensure_defaults(&mut settings, &default_settings());
        let formatters = parse_formatters(&settings)?;

        self.settings = settings;
        self.formatters = formatters;
        if migration.is_some() {
            self.migration = migration;
        }

        if migration.is_some() || (!fresh && !added.is_empty()) {
            self.backend.save(&self.settings)?;
        }

        tracing::info!(
            formatters = self.formatters.len(),
            migrated = migration.is_some(),
            "Formatter settings loaded"
        );

        Ok(())
    }

    /// Re-read persisted settings, e.g. after the active chat changed.
    ///
    /// # Errors
    /// Returns error if the settings cannot be read.
    pub fn reload(&mut self) -> Result<()> {
        self.load()?;
        self.notify();
        Ok(())
    }

    /// Register a callback receiving the list after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&[FormatterRecord]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current formatters in display order.
    #[must_use]
    pub fn list(&self) -> &[FormatterRecord] {
        &self.formatters
    }

    /// Formatter at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormatterRecord> {
        self.formatters.get(index)
    }

    /// Index of the first formatter named `name` (case-insensitive).
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.formatters
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Number of formatters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Migration step applied while loading, if any.
    #[must_use]
    pub const fn migration(&self) -> Option<Migration> {
        self.migration
    }

    /// The settings backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Append `record`, returning its index.
    ///
    /// # Errors
    /// Returns error if the settings cannot be saved.
    pub fn add(&mut self, record: FormatterRecord) -> Result<usize> {
        tracing::info!(name = %record.name, "Adding formatter");
        let mut next = self.formatters.clone();
        next.push(record);
        self.commit(next)?;
        Ok(self.formatters.len() - 1)
    }

    /// Append a formatter with numbered default fields.
    ///
    /// # Errors
    /// Returns error if the settings cannot be saved.
    pub fn add_numbered(&mut self) -> Result<usize> {
        self.add(FormatterRecord::numbered(self.formatters.len()))
    }

    /// Remove and return the formatter at `index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a missing index, or a save error.
    pub fn remove(&mut self, index: usize) -> Result<FormatterRecord> {
        self.check_index(index)?;
        let mut next = self.formatters.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        tracing::info!(index, name = %removed.name, "Removed formatter");
        Ok(removed)
    }

    /// Swap the formatter at `index` with its neighbour in `direction`.
    ///
    /// Returns `false` without saving when the neighbour does not exist.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a missing `index`, or a save error.
    pub fn move_by(&mut self, index: usize, direction: Direction) -> Result<bool> {
        self.check_index(index)?;
        let Some(target) = direction
            .target(index)
            .filter(|&target| target < self.formatters.len())
        else {
            tracing::debug!(index, ?direction, "Move target out of range, ignoring");
            return Ok(false);
        };

        let mut next = self.formatters.clone();
        next.swap(index, target);
        self.commit(next)?;
        tracing::info!(from = index, to = target, "Moved formatter");
        Ok(true)
    }

    /// Set one field of the formatter at `index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a missing index, or a save error.
    pub fn edit(
        &mut self,
        index: usize,
        field: FormatterField,
        value: impl Into<String>,
    ) -> Result<()> {
        self.check_index(index)?;
        let mut next = self.formatters.clone();
        next[index].set(field, value);
        self.commit(next)?;
        tracing::debug!(index, %field, "Edited formatter");
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.formatters.len() {
            Ok(())
        } else {
            Err(AppError::out_of_range(index, self.formatters.len()))
        }
    }

    /// Persist `formatters`, then adopt them and notify observers.
    ///
    /// On a save error the in-memory list and settings stay as they were.
    fn commit(&mut self, formatters: Vec<FormatterRecord>) -> Result<()> {
        let value = serde_json::to_value(&formatters).map_err(AppError::json_parse)?;
        let mut settings = self.settings.clone();
        settings.insert(FORMATTERS_KEY.to_string(), value);

        if let Err(err) = self.backend.save(&settings) {
            tracing::warn!(error = %err, "Formatter change not saved, keeping previous list");
            return Err(err);
        }

        self.settings = settings;
        self.formatters = formatters;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer(&self.formatters);
        }
    }
}

fn parse_formatters(settings: &Map<String, Value>) -> Result<Vec<FormatterRecord>> {
    match settings.get(FORMATTERS_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(AppError::json_parse),
    }
}

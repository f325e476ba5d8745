//! Settings migration.
//!
//! Upgrades older persisted shapes to the current `formatters` list:
//!
//! 1. numbered slots (`action0_name`, `action0_template`, ...) from the first
//!    releases;
//! 2. the `actions` array with a sticky `selected_action`.
//!
//! Every step is idempotent; data that already has `formatters` is left alone.

use serde_json::{Map, Value};

use crate::domain::{AppError, FormatterRecord, Result, FORMATTERS_KEY, MSG_PLACEHOLDER};

/// Number of numbered slots in the legacy shape.
pub const LEGACY_SLOTS: usize = 10;

const ACTIONS_KEY: &str = "actions";
const LEGACY_SLOT_FIELDS: [&str; 5] = ["enabled", "useprompt", "name", "icon", "template"];
const LEGACY_GLOBAL_KEYS: [&str; 2] = ["action_prompt", "allow_impersonation"];
const RETIRED_KEYS: [&str; 1] = ["selected_action"];

/// Which upgrade step ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// Numbered `action{i}_*` slots were converted.
    LegacyNumbered { migrated: usize },
    /// The `actions` array was renamed and normalized.
    ActionsArray { migrated: usize },
}

impl Migration {
    /// Number of formatters produced by the step.
    #[must_use]
    pub const fn migrated(&self) -> usize {
        match self {
            Self::LegacyNumbered { migrated } | Self::ActionsArray { migrated } => *migrated,
        }
    }
}

impl std::fmt::Display for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LegacyNumbered { migrated } => {
                write!(f, "numbered action slots -> formatters ({migrated} kept)")
            }
            Self::ActionsArray { migrated } => {
                write!(f, "actions -> formatters ({migrated} kept)")
            }
        }
    }
}

/// Upgrade `settings` in place.
///
/// Returns the step that ran, or `None` when the data is already current.
/// Callers persist the settings whenever a step ran.
///
/// # Errors
/// Returns `InvalidData` if an `actions` list holds something other than objects.
pub fn migrate(settings: &mut Map<String, Value>) -> Result<Option<Migration>> {
    if has_key(settings, FORMATTERS_KEY) {
        return Ok(None);
    }

    if let Some(Value::Array(actions)) = settings.get(ACTIONS_KEY).cloned() {
        let migration = migrate_actions(settings, &actions)?;
        tracing::info!(%migration, "Migrated settings from actions to formatters");
        return Ok(Some(migration));
    }

    if is_truthy(settings.get("action0_name")) {
        let migration = migrate_numbered(settings)?;
        tracing::info!(%migration, "Migrated legacy numbered settings");
        return Ok(Some(migration));
    }

    Ok(None)
}

fn migrate_numbered(settings: &mut Map<String, Value>) -> Result<Migration> {
    let mut formatters = Vec::new();

    for slot in 0..LEGACY_SLOTS {
        let key = |field: &str| format!("action{slot}_{field}");

        if is_truthy(settings.get(&key("enabled"))) {
            formatters.push(FormatterRecord::new(
                text_of(settings.get(&key("name"))),
                text_of(settings.get(&key("icon"))),
                template_of(settings.get(&key("template"))),
            ));
        }

        for field in LEGACY_SLOT_FIELDS {
            settings.remove(&key(field));
        }
    }

    for key in LEGACY_GLOBAL_KEYS {
        settings.remove(key);
    }

    let migrated = formatters.len();
    settings.insert(FORMATTERS_KEY.to_string(), records_value(&formatters)?);
    Ok(Migration::LegacyNumbered { migrated })
}

fn migrate_actions(settings: &mut Map<String, Value>, actions: &[Value]) -> Result<Migration> {
    let formatters = actions
        .iter()
        .map(|action| match action {
            Value::Object(fields) => Ok(FormatterRecord::new(
                text_of(fields.get("name")),
                text_of(fields.get("icon")),
                template_of(fields.get("template")),
            )),
            other => Err(AppError::InvalidData {
                message: format!("`{ACTIONS_KEY}` entry is not an object: {other}"),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    settings.remove(ACTIONS_KEY);
    for key in RETIRED_KEYS {
        settings.remove(key);
    }

    let migrated = formatters.len();
    settings.insert(FORMATTERS_KEY.to_string(), records_value(&formatters)?);
    Ok(Migration::ActionsArray { migrated })
}

/// Copy top-level keys missing from `settings` out of `defaults`.
///
/// Existing keys are never overwritten. Returns the keys that were added.
pub fn ensure_defaults(
    settings: &mut Map<String, Value>,
    defaults: &Map<String, Value>,
) -> Vec<String> {
    let mut added = Vec::new();
    for (key, value) in defaults {
        if !settings.contains_key(key) {
            settings.insert(key.clone(), value.clone());
            added.push(key.clone());
        }
    }
    if !added.is_empty() {
        tracing::debug!(keys = ?added, "Filled missing settings from defaults");
    }
    added
}

fn has_key(settings: &Map<String, Value>, key: &str) -> bool {
    settings.get(key).is_some_and(|value| !value.is_null())
}

/// Truthiness as the host's settings layer evaluates flags.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn template_of(value: Option<&Value>) -> String {
    if is_truthy(value) {
        text_of(value)
    } else {
        MSG_PLACEHOLDER.to_string()
    }
}

fn records_value(records: &[FormatterRecord]) -> Result<Value> {
    serde_json::to_value(records).map_err(AppError::json_parse)
}

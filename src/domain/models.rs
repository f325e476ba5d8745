//! Domain models for input formatters.
//!
//! A formatter is a named, iconized text template applied to the chat input.
//! List order is display order; nothing else sorts formatters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder replaced by the current input text (matched case-insensitively).
pub const MSG_PLACEHOLDER: &str = "{{msg}}";

/// Placeholder marking where the caret goes after formatting.
pub const CURSOR_PLACEHOLDER: &str = "{{csr}}";

/// Glyph shown for a formatter whose icon is empty.
pub const FALLBACK_ICON: &str = "fa-icons";

/// Label shown in the settings editor for a formatter without a name.
pub const UNNAMED_LABEL: &str = "New Formatter";

/// Settings key holding the formatter list.
pub const FORMATTERS_KEY: &str = "formatters";

/// A single formatter template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterRecord {
    /// Display label.
    #[serde(default)]
    pub name: String,
    /// Glyph identifier (e.g. `fa-comment`).
    #[serde(default)]
    pub icon: String,
    /// Template text with optional `{{msg}}` / `{{csr}}` placeholders.
    #[serde(default)]
    pub template: String,
}

impl FormatterRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            template: template.into(),
        }
    }

    /// The record standing for "no transformation".
    ///
    /// Used as the picker selection after every formatting action.
    #[must_use]
    pub fn passthrough() -> Self {
        Self::new("default", "fa-pen-nib", MSG_PLACEHOLDER)
    }

    /// Defaults for a record appended to a list of `len` entries.
    #[must_use]
    pub fn numbered(len: usize) -> Self {
        Self::new(
            format!("Formatter #{}", len + 1),
            "fa-question-circle",
            "{{msg}}{{csr}}",
        )
    }

    /// Icon to render, falling back to [`FALLBACK_ICON`] when empty.
    #[must_use]
    pub fn display_icon(&self) -> &str {
        if self.icon.is_empty() {
            FALLBACK_ICON
        } else {
            &self.icon
        }
    }

    /// Name to render in the settings editor.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED_LABEL
        } else {
            &self.name
        }
    }

    /// Set one field by name.
    pub fn set(&mut self, field: FormatterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormatterField::Name => self.name = value,
            FormatterField::Icon => self.icon = value,
            FormatterField::Template => self.template = value,
        }
    }
}

/// Editable field of a [`FormatterRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterField {
    Name,
    Icon,
    Template,
}

impl std::str::FromStr for FormatterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "icon" => Ok(Self::Icon),
            "template" => Ok(Self::Template),
            _ => Err(format!("Unknown field: {s}. Use: name, icon, template")),
        }
    }
}

impl std::fmt::Display for FormatterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Icon => write!(f, "icon"),
            Self::Template => write!(f, "template"),
        }
    }
}

/// Direction of a single-step move in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the list (`-1`).
    Up,
    /// Towards the end of the list (`+1`).
    Down,
}

impl Direction {
    /// Target index for a move from `index`, if it does not underflow.
    #[must_use]
    pub const fn target(self, index: usize) -> Option<usize> {
        match self {
            Self::Up => index.checked_sub(1),
            Self::Down => index.checked_add(1),
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Up),
            1 => Ok(Self::Down),
            _ => Err(format!("Invalid move offset: {value}. Use -1 or 1")),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "-1" => Ok(Self::Up),
            "down" | "+1" | "1" => Ok(Self::Down),
            _ => Err(format!("Unknown direction: {s}. Use: up, down")),
        }
    }
}

/// Formatters installed when nothing has been persisted yet.
#[must_use]
pub fn default_formatters() -> Vec<FormatterRecord> {
    vec![
        FormatterRecord::new("Do", "fa-person-running", "> {{msg}}"),
        FormatterRecord::new("Say", "fa-comment", "> \"{{csr}}{{msg}}\""),
        FormatterRecord::new("Quote", "fa-quote-left", "{{msg}} \"{{csr}}\""),
    ]
}

/// Default settings document for the extension.
#[must_use]
pub fn default_settings() -> Map<String, Value> {
    let mut settings = Map::new();
    settings.insert(
        FORMATTERS_KEY.to_string(),
        serde_json::to_value(default_formatters()).unwrap_or_else(|_| Value::Array(Vec::new())),
    );
    settings
}

//! Host parameter substitution.
//!
//! Templates pass through a macro expander before `{{msg}}` / `{{csr}}`
//! handling, so host macros may themselves produce those placeholders.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::MacroConfig;

static MACRO_PATTERN: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"\{\{([^{}]+)\}\}") {
    Ok(regex) => regex,
    Err(err) => panic!("invalid macro pattern: {err}"),
});

/// Keys owned by the template engine.
const RESERVED: [&str; 2] = ["msg", "csr"];

/// Text macro expander supplied by the host.
pub trait MacroExpander {
    /// Expand host macros in `text`.
    fn expand(&self, text: &str) -> String;
}

/// Expander that leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMacros;

impl MacroExpander for NoMacros {
    fn expand(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Table of `{{key}}` macros, matched case-insensitively.
///
/// Unknown macros are left in place.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    values: BTreeMap<String, String>,
}

impl MacroTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from configured macro values.
    #[must_use]
    pub fn from_config(config: &MacroConfig) -> Self {
        let mut table = Self::new();
        table.insert("user", config.user.clone());
        table.insert("char", config.char.clone());
        for (key, value) in &config.extra {
            table.insert(key, value.clone());
        }
        table
    }

    /// Register a macro. Reserved placeholder names are ignored.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = key.trim().to_lowercase();
        if RESERVED.contains(&key.as_str()) {
            tracing::warn!(key = %key, "Ignoring macro that shadows a template placeholder");
            return;
        }
        self.values.insert(key, value.into());
    }

    /// Number of registered macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no macros are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl MacroExpander for MacroTable {
    fn expand(&self, text: &str) -> String {
        MACRO_PATTERN
            .replace_all(text, |caps: &Captures<'_>| {
                let key = caps[1].trim().to_lowercase();
                self.values
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

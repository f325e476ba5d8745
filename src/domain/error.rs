//! Domain-level error types for input-formatter.
//!
//! All errors are typed with `thiserror` and carry enough context to be
//! logged as developer diagnostics.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// A formatter index did not address an existing record.
    #[error("Formatter index {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Persisted data has an unexpected shape.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Startup could not complete; the formatter stays inactive.
    #[error("Initialization failed: {message}")]
    Initialization { message: String },
}

impl AppError {
    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create an out-of-range error for a list of `len` entries.
    #[must_use]
    pub const fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = AppError::out_of_range(5, 3);
        assert_eq!(
            err.to_string(),
            "Formatter index 5 is out of range (list has 3 entries)"
        );
    }

    #[test]
    fn test_json_parse_keeps_source() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app = AppError::json_parse(err);
        assert!(std::error::Error::source(&app).is_some());
    }
}

//! Input Formatter - reusable text templates for chat input.
//!
//! A formatter wraps or transforms the text in a chat input box:
//!
//! - `{{msg}}` (any casing) is replaced by the current input;
//! - `{{csr}}` marks where the caret goes afterwards.
//!
//! The crate keeps the formatter list in the host's settings document,
//! upgrades older settings shapes on startup, and tracks picker state.

pub mod application;
pub mod domain;
pub mod infrastructure;

//! Application layer - use cases and orchestration.
//!
//! This layer contains the template engine, the formatter store and the
//! settings migration, plus the picker state that ties them together.

pub mod input;
pub mod macros;
pub mod migrator;
pub mod output;
pub mod picker;
pub mod session;
pub mod store;
pub mod template;

pub use input::{apply_to_input, InputField, TextBuffer};
pub use macros::{MacroExpander, MacroTable, NoMacros};
pub use migrator::{ensure_defaults, migrate, Migration};
pub use output::{
    format_formatters_json, format_formatters_plain, format_formatters_table, format_migration,
    format_result_json, OutputFormat,
};
pub use picker::FormatterPicker;
pub use session::{HostEvent, InputFormatter};
pub use store::FormatterStore;
pub use template::{apply, Formatted};

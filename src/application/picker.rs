//! Formatter picker state.
//!
//! Mirrors the store's list as picker items and tracks whether the picker is
//! open and which formatter is selected. Selection never outlives a
//! formatting action.

use super::input::{apply_to_input, InputField};
use super::macros::MacroExpander;
use super::template::Formatted;
use crate::domain::{AppError, FormatterRecord, Result};

/// Picker popup listing the available formatters.
#[derive(Debug, Clone, Default)]
pub struct FormatterPicker {
    items: Vec<FormatterRecord>,
    open: bool,
    selected: Option<usize>,
}

impl FormatterPicker {
    /// Build a picker for `formatters`.
    #[must_use]
    pub fn new(formatters: &[FormatterRecord]) -> Self {
        let mut picker = Self::default();
        picker.rebuild(formatters);
        picker
    }

    /// Replace the items with `formatters` and clear the selection.
    pub fn rebuild(&mut self, formatters: &[FormatterRecord]) {
        self.items = formatters.to_vec();
        self.selected = None;
        tracing::trace!(items = self.items.len(), "Picker rebuilt");
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[FormatterRecord] {
        &self.items
    }

    /// Whether the popup is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Show the popup.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the popup.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flip popup visibility.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Select the item at `index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a missing item.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(AppError::out_of_range(index, self.items.len()));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// The selected formatter, or the passthrough formatter.
    #[must_use]
    pub fn current(&self) -> FormatterRecord {
        self.selected
            .and_then(|index| self.items.get(index))
            .cloned()
            .unwrap_or_else(FormatterRecord::passthrough)
    }

    /// Apply the item at `index` to `field`, then close and reset the selection.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a missing item.
    pub fn choose(
        &mut self,
        index: usize,
        field: &mut dyn InputField,
        macros: &dyn MacroExpander,
    ) -> Result<Formatted> {
        self.select(index)?;
        Ok(self.apply_current(field, macros))
    }

    /// Apply the current formatter to `field`, then close and reset the selection.
    pub fn apply_current(
        &mut self,
        field: &mut dyn InputField,
        macros: &dyn MacroExpander,
    ) -> Formatted {
        let formatter = self.current();
        let formatted = apply_to_input(&formatter.template, field, macros);
        tracing::info!(formatter = %formatter.name, "Formatter applied");

        self.selected = None;
        self.close();
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::input::TextBuffer;
    use crate::application::macros::NoMacros;
    use crate::domain::default_formatters;

    #[test]
    fn test_choose_applies_and_resets() {
        let mut picker = FormatterPicker::new(&default_formatters());
        picker.open();

        let mut input = TextBuffer::new("hello");
        let out = picker.choose(1, &mut input, &NoMacros).unwrap();

        assert_eq!(out.text, "> \"hello\"");
        assert_eq!(input.cursor(), Some(3));
        assert!(!picker.is_open());
        assert_eq!(picker.current(), FormatterRecord::passthrough());
    }

    #[test]
    fn test_selection_is_not_sticky() {
        let mut picker = FormatterPicker::new(&default_formatters());
        picker.select(0).unwrap();
        assert_eq!(picker.current().name, "Do");

        let mut input = TextBuffer::new("runs");
        picker.apply_current(&mut input, &NoMacros);
        assert_eq!(input.text(), "> runs");

        picker.apply_current(&mut input, &NoMacros);
        assert_eq!(input.text(), "> runs");
    }

    #[test]
    fn test_choose_out_of_range() {
        let mut picker = FormatterPicker::new(&default_formatters());
        let mut input = TextBuffer::new("x");
        assert!(picker.choose(3, &mut input, &NoMacros).is_err());
        assert_eq!(input.text(), "x");
        assert_eq!(input.changes(), 0);
    }

    #[test]
    fn test_rebuild_clears_selection() {
        let mut picker = FormatterPicker::new(&default_formatters());
        picker.select(2).unwrap();
        picker.rebuild(&default_formatters()[..1]);
        assert_eq!(picker.items().len(), 1);
        assert_eq!(picker.current().name, "default");
    }

    #[test]
    fn test_toggle() {
        let mut picker = FormatterPicker::default();
        picker.toggle();
        assert!(picker.is_open());
        picker.toggle();
        assert!(!picker.is_open());
    }
}

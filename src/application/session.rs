//! Formatter session wiring the store, picker and host collaborators.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::input::InputField;
use super::macros::MacroExpander;
use super::picker::FormatterPicker;
use super::store::FormatterStore;
use super::template::Formatted;
use crate::domain::{AppError, Result};
use crate::infrastructure::SettingsBackend;

/// Events raised by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The active conversation changed.
    ChatChanged,
    /// Settings were edited outside this session.
    SettingsChanged,
}

/// A running input formatter.
pub struct InputFormatter<B: SettingsBackend> {
    store: FormatterStore<B>,
    picker: Rc<RefCell<FormatterPicker>>,
    macros: Box<dyn MacroExpander>,
}

impl<B: SettingsBackend> InputFormatter<B> {
    /// Migrate and load settings, then build the picker.
    ///
    /// # Errors
    /// Returns `Initialization` if the settings cannot be loaded.
    pub fn start(backend: B, macros: Box<dyn MacroExpander>) -> Result<Self> {
        tracing::info!("Initializing input formatter");

        let mut store = FormatterStore::open(backend).map_err(|e| {
            tracing::error!(error = %e, "Could not load formatter settings");
            AppError::Initialization {
                message: e.to_string(),
            }
        })?;

        let picker = Rc::new(RefCell::new(FormatterPicker::new(store.list())));
        let sink = Rc::clone(&picker);
        store.subscribe(move |formatters| sink.borrow_mut().rebuild(formatters));

        tracing::info!(formatters = store.len(), "Input formatter initialized");

        Ok(Self {
            store,
            picker,
            macros,
        })
    }

    /// React to a host event.
    ///
    /// # Errors
    /// Returns error if the settings cannot be re-read.
    pub fn handle(&mut self, event: HostEvent) -> Result<()> {
        tracing::debug!(?event, "Host event");
        match event {
            HostEvent::ChatChanged | HostEvent::SettingsChanged => self.store.reload(),
        }
    }

    /// The formatter store; mutations rebuild the picker.
    #[must_use]
    pub const fn store(&self) -> &FormatterStore<B> {
        &self.store
    }

    /// Mutable access to the formatter store.
    pub fn store_mut(&mut self) -> &mut FormatterStore<B> {
        &mut self.store
    }

    /// Current picker state.
    #[must_use]
    pub fn picker(&self) -> Ref<'_, FormatterPicker> {
        self.picker.borrow()
    }

    /// Show or hide the picker.
    pub fn toggle_picker(&self) {
        self.picker.borrow_mut().toggle();
    }

    /// Apply the formatter at `index` to `field`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a missing formatter.
    pub fn apply(&self, index: usize, field: &mut dyn InputField) -> Result<Formatted> {
        self.picker
            .borrow_mut()
            .choose(index, field, self.macros.as_ref())
    }
}

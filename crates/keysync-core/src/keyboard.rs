//! Pluggable keyboard (composition engine) boundary and registry.
//!
//! A keyboard turns a sequence of logical codes into committed text, possibly
//! with context-sensitive corrections ("delete N characters, then insert T").
//! The registry is constructed explicitly from factories and handed to the
//! session at startup; there is no process-global keyboard state.

use std::path::Path;

use tracing::debug;

use crate::keycode::LogicalKey;

/// What a keyboard produced for one logical code.
///
/// `delete_before` characters immediately preceding the caret must be removed
/// before `text` is inserted. Both zero/empty means the keyboard absorbed the
/// code into internal sequence state without emitting anything yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardOutput {
    pub delete_before: usize,
    pub text: String,
}

impl KeyboardOutput {
    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            delete_before: 0,
            text: text.into(),
        }
    }

    pub fn correction(delete_before: usize, text: impl Into<String>) -> Self {
        Self {
            delete_before,
            text: text.into(),
        }
    }

    pub fn nothing() -> Self {
        Self::default()
    }

    pub fn is_nothing(&self) -> bool {
        self.delete_before == 0 && self.text.is_empty()
    }
}

/// A loaded keyboard layout. `process` receives the logical code and the
/// current preceding-text window and decides what to emit.
pub trait Keyboard {
    fn name(&self) -> &str;
    fn process(&mut self, key: LogicalKey, context: &str) -> KeyboardOutput;
}

/// Discovers and loads keyboards, typically from definition files under an
/// installation directory.
pub trait KeyboardFactory {
    fn load_keyboards(&self, install_dir: Option<&Path>) -> Vec<Box<dyn Keyboard>>;
}

/// Ordered collection of loaded keyboards with one active at a time.
#[derive(Default)]
pub struct KeyboardRegistry {
    keyboards: Vec<Box<dyn Keyboard>>,
    active: usize,
}

impl KeyboardRegistry {
    pub fn new(keyboards: Vec<Box<dyn Keyboard>>) -> Self {
        Self {
            keyboards,
            active: 0,
        }
    }

    /// Load keyboards from every factory in order.
    pub fn from_factories(
        factories: &[Box<dyn KeyboardFactory>],
        install_dir: Option<&Path>,
    ) -> Self {
        let mut keyboards = Vec::new();
        for factory in factories {
            keyboards.extend(factory.load_keyboards(install_dir));
        }
        debug!(count = keyboards.len(), "loaded keyboards");
        Self::new(keyboards)
    }

    pub fn len(&self) -> usize {
        self.keyboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyboards.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.keyboards.iter().map(|k| k.name()).collect()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Set the active keyboard, clamping an out-of-range persisted index
    /// back to the first keyboard.
    pub fn set_active(&mut self, index: usize) {
        self.active = if index < self.keyboards.len() { index } else { 0 };
    }

    /// Cycle to the next keyboard, wrapping at the end.
    pub fn next(&mut self) {
        if !self.keyboards.is_empty() {
            self.active = (self.active + 1) % self.keyboards.len();
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut dyn Keyboard> {
        Some(self.keyboards.get_mut(self.active)?.as_mut())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.keyboards.get(self.active).map(|k| k.name())
    }
}

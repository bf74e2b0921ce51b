//! Per-session keystroke interpretation and context synchronization.
//!
//! `InputSession` owns the state for one text-editing session: modifier
//! flags, the preceding-text window, and the delete/insert transaction
//! protocol. The host delivers key events and edit notifications through the
//! entry points here; corrective edits flow back out through the [`TextHost`]
//! collaborator handed into each call.

mod host;
mod key_handlers;
mod sync;
mod transaction;
pub(crate) mod types;

#[cfg(test)]
mod tests;

use keysync_core::context::ContextBuffer;
use keysync_core::keyboard::KeyboardRegistry;
use keysync_core::keycode::TranslationMode;
use keysync_core::modifiers::ModifierState;

pub use host::{CompositionHandle, NativeKeyText, TextHost};

use tracing::debug;
use types::Transaction;

/// Stateful per-session engine. Single logical thread of execution: the host
/// delivers events strictly one at a time, and synthetic key injection is a
/// send into that same ordered channel, handled later as an independent
/// invocation.
pub struct InputSession {
    registry: KeyboardRegistry,
    mode: TranslationMode,

    /// Keyboard toggled on. Off means every event passes through untouched.
    open: bool,
    pub(crate) modifiers: ModifierState,
    pub(crate) context: ContextBuffer,
    pub(crate) txn: Transaction,
    /// Non-owning handle to the host's in-progress composition; dropped when
    /// the host reports termination by another actor.
    composition: Option<CompositionHandle>,
}

impl InputSession {
    pub fn new(registry: KeyboardRegistry) -> Self {
        Self {
            registry,
            mode: TranslationMode::default(),
            open: true,
            modifiers: ModifierState::new(),
            context: ContextBuffer::new(),
            txn: Transaction::new(),
            composition: None,
        }
    }

    pub fn set_translation_mode(&mut self, mode: TranslationMode) {
        self.mode = mode;
    }

    pub fn is_keyboard_open(&self) -> bool {
        self.open
    }

    /// Toggle the keyboard. Clears modifiers and all transaction/context
    /// state: the assumptions they encode no longer hold, and this is the
    /// escape hatch for a transaction whose echoes never arrived.
    pub fn set_keyboard_open(&mut self, open: bool) {
        debug!(open, "set_keyboard_open");
        self.open = open;
        self.modifiers.reset();
        self.reset_transient();
    }

    pub fn active_keyboard(&self) -> usize {
        self.registry.active_index()
    }

    pub fn active_keyboard_name(&self) -> Option<&str> {
        self.registry.active_name()
    }

    pub fn set_active_keyboard(&mut self, index: usize) {
        self.registry.set_active(index);
    }

    /// Cycle to the next installed keyboard.
    pub fn next_keyboard(&mut self) {
        self.registry.next();
        debug!(active = self.registry.active_index(), "next_keyboard");
    }

    pub fn keyboard_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Preceding text as last confirmed from the host.
    pub fn context_text(&self) -> &str {
        self.context.text()
    }

    /// Clear context and any in-flight transaction. Called on every path
    /// where the contiguous-edit-history assumption breaks.
    pub(crate) fn reset_transient(&mut self) {
        self.context.reset();
        self.txn.reset();
    }
}

//! Host edit notifications: selection changes, context push/pop, focus, and
//! composition lifecycle.

use tracing::{debug, debug_span};

use keysync_core::context::SyncOutcome;

use super::{CompositionHandle, InputSession};

impl InputSession {
    /// The host finished an edit and the selection (or caret) changed;
    /// `new_text` is the bounded range of text preceding the caret.
    ///
    /// Refused while a transaction is in flight: the reported range is stale
    /// relative to our own edits still round-tripping, so the last known
    /// buffer is kept. When fresh text is adopted the transaction block is
    /// cleared — edits by another actor have invalidated whatever was
    /// queued.
    pub fn on_selection_changed(&mut self, new_text: &str) {
        let _span = debug_span!("on_selection_changed").entered();

        if !self.txn.is_idle() {
            debug!(
                pending = self.txn.pending_delete,
                "transaction in flight; keeping current context"
            );
            return;
        }

        if self.context.sync(new_text) == SyncOutcome::Adopted {
            self.txn.reset();
        }
    }

    /// A new document context was pushed over this one.
    pub fn on_context_pushed(&mut self) {
        debug!("context pushed");
        self.reset_transient();
    }

    /// The document context above this one was popped.
    pub fn on_context_popped(&mut self) {
        debug!("context popped");
        self.reset_transient();
    }

    /// Input focus moved to a different document.
    pub fn on_focus_changed(&mut self) {
        debug!("focus changed");
        self.reset_transient();
    }

    /// The host started a composition on our behalf.
    pub fn set_composition(&mut self, handle: CompositionHandle) {
        self.composition = Some(handle);
    }

    pub fn composition(&self) -> Option<CompositionHandle> {
        self.composition
    }

    /// Someone other than this engine ended the composition; drop our
    /// reference without further use.
    pub fn on_composition_terminated(&mut self) {
        debug!("composition terminated by other");
        self.composition = None;
    }
}

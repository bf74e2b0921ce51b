//! The collaborator boundary to the host's text service.

/// Result of asking the platform for a pre-resolved Unicode translation of a
/// key event (native translation mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKeyText {
    /// No text for this key.
    None,
    /// A single Unicode scalar.
    Single(char),
    /// A multi-character expansion. Not handled: reported as "no text
    /// produced" rather than silently dropped.
    Multi,
}

/// Opaque, non-owning reference to the host's in-progress composition. The
/// host owns the composition and may terminate it at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionHandle(pub u64);

/// Everything the host grants this engine, borrowed for the duration of a
/// single entry-point call.
pub trait TextHost {
    /// Request a synchronous, exclusive read-write edit: delete
    /// `delete_before` characters preceding the caret, then insert `text`.
    /// Commits are strictly ordered; no two may be in flight at once.
    /// Returns `false` if the host refused the transaction (the edit is
    /// dropped, never retried — a silent retry could duplicate text).
    fn request_edit(&mut self, delete_before: usize, text: &str) -> bool;

    /// Inject a synthetic key event into the same ordered channel that
    /// delivers real input. The echo arrives later as a normal key event,
    /// indistinguishable from real typing.
    fn inject_key(&mut self, key: u16, repeat: u16);

    /// Ask the platform for a pre-resolved Unicode translation (native
    /// translation mode only).
    fn translate_unicode(&mut self, _key: u16, _repeat: u16) -> NativeKeyText {
        NativeKeyText::None
    }
}

mod proptest_fsm;

use std::collections::VecDeque;

use keysync_core::keyboard::{Keyboard, KeyboardOutput, KeyboardRegistry};
use keysync_core::keycode::{vk, LogicalKey};

use super::{InputSession, NativeKeyText, TextHost};

/// Scriptable host: records commits against a model document and queues
/// injected keys for later redelivery, the way the real input channel echoes
/// synthetic events back.
pub(super) struct MockHost {
    pub document: String,
    pub injected: VecDeque<(u16, u16)>,
    pub commits: Vec<String>,
    pub reject_edits: bool,
    pub native: NativeKeyText,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            document: String::new(),
            injected: VecDeque::new(),
            commits: Vec::new(),
            reject_edits: false,
            native: NativeKeyText::None,
        }
    }
}

impl TextHost for MockHost {
    fn request_edit(&mut self, delete_before: usize, text: &str) -> bool {
        if self.reject_edits {
            return false;
        }
        for _ in 0..delete_before {
            self.document.pop();
        }
        self.document.push_str(text);
        self.commits.push(text.to_string());
        true
    }

    fn inject_key(&mut self, key: u16, repeat: u16) {
        self.injected.push_back((key, repeat));
    }

    fn translate_unicode(&mut self, _key: u16, _repeat: u16) -> NativeKeyText {
        self.native
    }
}

/// Redeliver every queued synthetic key as a normal key event until the
/// channel drains. Unconsumed backspaces are applied to the model document,
/// as the real host would.
pub(super) fn pump(session: &mut InputSession, host: &mut MockHost) {
    while let Some((key, repeat)) = host.injected.pop_front() {
        let consumed = session.on_key_down(host, key, repeat);
        if !consumed && key == vk::BACK {
            for _ in 0..repeat {
                host.document.pop();
            }
        }
    }
}

/// Pass-through keyboard: every logical character becomes an insert.
pub(super) struct EchoKeyboard;

impl Keyboard for EchoKeyboard {
    fn name(&self) -> &str {
        "echo"
    }

    fn process(&mut self, key: LogicalKey, _context: &str) -> KeyboardOutput {
        match key {
            LogicalKey::Char(c) => KeyboardOutput::insert(c.to_string()),
            LogicalKey::Backspace => KeyboardOutput::nothing(),
        }
    }
}

/// Context-sensitive keyboard: a second 'a' after an 'a' collapses the pair
/// into a long vowel via a delete-then-insert correction.
pub(super) struct AccentKeyboard;

impl Keyboard for AccentKeyboard {
    fn name(&self) -> &str {
        "accent"
    }

    fn process(&mut self, key: LogicalKey, context: &str) -> KeyboardOutput {
        match key {
            LogicalKey::Char('a') if context.ends_with('a') => KeyboardOutput::correction(1, "ā"),
            LogicalKey::Char(c) => KeyboardOutput::insert(c.to_string()),
            LogicalKey::Backspace => KeyboardOutput::nothing(),
        }
    }
}

pub(super) fn make_session() -> InputSession {
    InputSession::new(KeyboardRegistry::new(vec![
        Box::new(EchoKeyboard),
        Box::new(AccentKeyboard),
    ]))
}

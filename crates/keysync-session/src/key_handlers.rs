//! Key event entry points: the host delivers key-down/key-up and their
//! would-consume test variants here.

use tracing::{debug, debug_span};

use keysync_core::keycode::{self, vk, LogicalKey, TranslationMode};

use super::host::NativeKeyText;
use super::{InputSession, TextHost};

/// Keys whose press moves the caret non-adjacently, invalidating the
/// preceding-text assumption.
fn is_caret_discontinuity(key: u16) -> bool {
    matches!(
        key,
        vk::HOME | vk::END | vk::LEFT | vk::UP | vk::RIGHT | vk::DOWN | vk::RETURN
    )
}

impl InputSession {
    /// Process a key-down event. Returns whether the event was consumed;
    /// an unconsumed event is handled by the host unmodified.
    pub fn on_key_down(&mut self, host: &mut dyn TextHost, key: u16, repeat: u16) -> bool {
        let _span = debug_span!("on_key_down", key, repeat).entered();

        // Modifiers are tracked even while the keyboard is toggled off, so
        // the on/off hotkey below still sees them.
        match key {
            vk::SHIFT => {
                self.modifiers.press_shift();
                return self.is_keyboard_open();
            }
            vk::CONTROL => {
                self.modifiers.press_control();
                return self.is_keyboard_open();
            }
            _ => {}
        }

        // Reserved hotkeys: Ctrl+Space toggles, Ctrl+Shift+Space cycles.
        if key == vk::SPACE && self.modifiers.control() {
            if self.modifiers.shift() {
                self.set_keyboard_open(true);
                self.next_keyboard();
            } else {
                let open = self.is_keyboard_open();
                self.set_keyboard_open(!open);
            }
            return true;
        }

        if !self.is_keyboard_open() {
            return false;
        }

        if is_caret_discontinuity(key) {
            self.reset_transient();
            return false;
        }

        // Acknowledgment key: protocol signal only while one is expected;
        // otherwise it is a genuinely typed occurrence of that key and falls
        // through to ordinary handling below.
        if key == vk::ACK && self.txn.expect_ack {
            return self.handle_ack(host);
        }

        if key == vk::BACK {
            return self.handle_backspace_down(repeat);
        }

        // Control-chorded keys belong to the application.
        if self.modifiers.control() {
            return false;
        }

        // Keys outside the translatable set must not reach the keyboard.
        if !keycode::is_candidate_key(key) {
            return false;
        }

        // A normal key while an ack was outstanding: the ack may have been
        // lost, so stop waiting for it. The transaction itself persists.
        if self.txn.expect_ack {
            debug!("normal key while awaiting ack; dropping expectation");
            self.txn.expect_ack = false;
        }

        let logical = match self.mode {
            TranslationMode::RawCodes => match keycode::translate(key, self.modifiers.shift()) {
                Some(l) => l,
                None => return false,
            },
            TranslationMode::Native => match host.translate_unicode(key, repeat) {
                NativeKeyText::Single(c) => LogicalKey::Char(c),
                NativeKeyText::Multi => {
                    // Known limitation: multi-character expansions are
                    // reported as "no text produced", not silently dropped.
                    debug!(key, "multi-character native translation unsupported");
                    return false;
                }
                NativeKeyText::None => return false,
            },
        };

        self.process_logical(host, logical)
    }

    /// Feed a logical code to the active keyboard and realize its output.
    fn process_logical(&mut self, host: &mut dyn TextHost, logical: LogicalKey) -> bool {
        let context = self.context.text().to_owned();
        let Some(keyboard) = self.registry.active_mut() else {
            return false;
        };

        let out = keyboard.process(logical, &context);
        debug!(?logical, ?out, "keyboard output");
        if out.is_nothing() {
            // Absorbed into the keyboard's sequence state.
            return true;
        }

        if out.delete_before > 0 {
            let count = u32::try_from(out.delete_before).unwrap_or(u32::MAX);
            self.begin_correction(host, count, &out.text);
        } else {
            self.dispatch_commit(host, 0, &out.text);
        }
        true
    }

    /// Process a key-up event.
    pub fn on_key_up(&mut self, _host: &mut dyn TextHost, key: u16, _repeat: u16) -> bool {
        let _span = debug_span!("on_key_up", key).entered();
        match key {
            vk::SHIFT => self.modifiers.release_shift(),
            vk::CONTROL => self.modifiers.release_control(),
            vk::SPACE => {}
            k if k < 0x30 => return true,
            _ => {}
        }
        self.is_keyboard_open()
    }

    /// Would `on_key_down` consume this key? Pure prediction, except that a
    /// caret-discontinuous key resets context here too: some hosts only call
    /// the test entry point for navigation keys.
    pub fn on_test_key_down(&mut self, key: u16) -> bool {
        if is_caret_discontinuity(key) {
            self.reset_transient();
        }
        self.would_consume(key)
    }

    /// Would `on_key_up` be consumed? No state mutation.
    pub fn on_test_key_up(&mut self, key: u16) -> bool {
        self.would_consume(key)
    }

    fn would_consume(&self, key: u16) -> bool {
        if !self.is_keyboard_open() {
            return false;
        }
        match key {
            // Mirrors `handle_backspace_down`: only the excess-echo
            // suppression consumes. Echoed and genuine deletes are both
            // performed by the host, so they must read as not consumed.
            vk::BACK => self.txn.pending_delete == 0 && self.txn.expect_ack,
            vk::ACK => self.txn.expect_ack,
            k if !keycode::is_candidate_key(k) => false,
            // Control chords belong to the application.
            _ => !(self.modifiers.control() && key != vk::CONTROL),
        }
    }
}

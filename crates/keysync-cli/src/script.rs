//! Event-script format and the scriptable host used by `keysim run`.
//!
//! A script is JSON lines, one host event per line:
//!
//! ```text
//! {"event":"type","text":"shaa"}
//! {"event":"key_down","key":8}
//! {"event":"selection_changed","text":"ša"}
//! {"event":"focus_changed"}
//! ```

use std::collections::VecDeque;

use serde::Deserialize;
use tracing::debug;

use keysync_core::keycode::vk;
use keysync_session::{InputSession, NativeKeyText, TextHost};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("line {line}: no virtual key for character {ch:?}")]
    Untypeable { line: usize, ch: char },
}

fn default_repeat() -> u16 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case", deny_unknown_fields)]
pub enum ScriptEvent {
    KeyDown {
        key: u16,
        #[serde(default = "default_repeat")]
        repeat: u16,
    },
    KeyUp {
        key: u16,
        #[serde(default = "default_repeat")]
        repeat: u16,
    },
    /// Convenience: type a string of characters, pressing and releasing
    /// Shift around the ones that need it.
    Type {
        text: String,
    },
    SelectionChanged {
        text: String,
    },
    FocusChanged,
    ContextPushed,
    ContextPopped,
    Toggle,
}

/// Parse a JSON-lines script. Blank lines and `#` comments are skipped.
pub fn parse_script(input: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event =
            serde_json::from_str(line).map_err(|source| ScriptError::Parse {
                line: idx + 1,
                source,
            })?;
        events.push(event);
    }
    Ok(events)
}

/// Reverse map from a character to the virtual key + shift state that
/// produces it on the US layout.
pub fn vk_for_char(c: char) -> Option<(u16, bool)> {
    match c {
        'a'..='z' => Some((c.to_ascii_uppercase() as u16, false)),
        'A'..='Z' => Some((c as u16, true)),
        '0'..='9' => Some((c as u16, false)),
        ' ' => Some((vk::SPACE, false)),
        ')' => Some((0x30, true)),
        '!' => Some((0x31, true)),
        '@' => Some((0x32, true)),
        '#' => Some((0x33, true)),
        '$' => Some((0x34, true)),
        '%' => Some((0x35, true)),
        '^' => Some((0x36, true)),
        '&' => Some((0x37, true)),
        '*' => Some((0x38, true)),
        '(' => Some((0x39, true)),
        ';' => Some((vk::OEM_1, false)),
        ':' => Some((vk::OEM_1, true)),
        '=' => Some((vk::OEM_PLUS, false)),
        '+' => Some((vk::OEM_PLUS, true)),
        ',' => Some((vk::OEM_COMMA, false)),
        '<' => Some((vk::OEM_COMMA, true)),
        '-' => Some((vk::OEM_MINUS, false)),
        '_' => Some((vk::OEM_MINUS, true)),
        '.' => Some((vk::OEM_PERIOD, false)),
        '>' => Some((vk::OEM_PERIOD, true)),
        '/' => Some((vk::OEM_2, false)),
        '?' => Some((vk::OEM_2, true)),
        '`' => Some((vk::OEM_3, false)),
        '~' => Some((vk::OEM_3, true)),
        '[' => Some((vk::OEM_4, false)),
        '{' => Some((vk::OEM_4, true)),
        '\\' => Some((vk::OEM_5, false)),
        '|' => Some((vk::OEM_5, true)),
        ']' => Some((vk::OEM_6, false)),
        '}' => Some((vk::OEM_6, true)),
        '\'' => Some((vk::OEM_7, false)),
        '"' => Some((vk::OEM_7, true)),
        _ => None,
    }
}

/// Simulated host: a model document, an injected-key queue that echoes back
/// through the session, and a commit log.
#[derive(Default)]
pub struct ScriptHost {
    pub document: String,
    pub injected: VecDeque<(u16, u16)>,
    pub commits: Vec<String>,
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextHost for ScriptHost {
    fn request_edit(&mut self, delete_before: usize, text: &str) -> bool {
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
        NativeKeyText::None
    }
}

/// Replay a script against a session, echoing synthetic keys and reporting
/// the preceding text back after every edit, the way a live host does.
pub struct ScriptRunner {
    pub session: InputSession,
    pub host: ScriptHost,
}

impl ScriptRunner {
    pub fn new(session: InputSession) -> Self {
        Self {
            session,
            host: ScriptHost::new(),
        }
    }

    pub fn run(&mut self, events: &[ScriptEvent]) -> Result<(), ScriptError> {
        for (idx, event) in events.iter().enumerate() {
            debug!(?event, "script event");
            self.apply(idx + 1, event)?;
            self.drain_echoes();
            // Explicit notification events stand on their own; only key
            // events are followed by the host's selection report.
            if matches!(
                event,
                ScriptEvent::KeyDown { .. } | ScriptEvent::KeyUp { .. } | ScriptEvent::Type { .. }
            ) {
                self.report_selection();
            }
        }
        Ok(())
    }

    fn apply(&mut self, line: usize, event: &ScriptEvent) -> Result<(), ScriptError> {
        match event {
            ScriptEvent::KeyDown { key, repeat } => self.key_down(*key, *repeat),
            ScriptEvent::KeyUp { key, repeat } => {
                self.session.on_key_up(&mut self.host, *key, *repeat);
            }
            ScriptEvent::Type { text } => {
                for ch in text.chars() {
                    let (key, shift) =
                        vk_for_char(ch).ok_or(ScriptError::Untypeable { line, ch })?;
                    if shift {
                        self.session.on_key_down(&mut self.host, vk::SHIFT, 1);
                    }
                    self.key_down(key, 1);
                    self.drain_echoes();
                    self.report_selection();
                    if shift {
                        self.session.on_key_up(&mut self.host, vk::SHIFT, 1);
                    }
                }
            }
            ScriptEvent::SelectionChanged { text } => self.session.on_selection_changed(text),
            ScriptEvent::FocusChanged => self.session.on_focus_changed(),
            ScriptEvent::ContextPushed => self.session.on_context_pushed(),
            ScriptEvent::ContextPopped => self.session.on_context_popped(),
            ScriptEvent::Toggle => {
                let open = self.session.is_keyboard_open();
                self.session.set_keyboard_open(!open);
            }
        }
        Ok(())
    }

    /// One key-down through the session; unconsumed keys are applied the way
    /// the application would (backspace deletes, printables insert).
    fn key_down(&mut self, key: u16, repeat: u16) {
        self.session.on_test_key_down(key);
        let consumed = self.session.on_key_down(&mut self.host, key, repeat);
        if consumed {
            return;
        }
        if key == vk::BACK {
            for _ in 0..repeat.max(1) {
                self.host.document.pop();
            }
        } else if let Some(c) = plain_char(key) {
            self.host.document.push(c);
        }
    }

    fn drain_echoes(&mut self) {
        while let Some((key, repeat)) = self.host.injected.pop_front() {
            let consumed = self.session.on_key_down(&mut self.host, key, repeat);
            if !consumed && key == vk::BACK {
                for _ in 0..repeat.max(1) {
                    self.host.document.pop();
                }
            }
        }
    }

    /// Report the text preceding the caret back to the session, as the host
    /// does at the end of every edit.
    fn report_selection(&mut self) {
        let doc = self.host.document.clone();
        self.session.on_selection_changed(&doc);
    }
}

/// What an application inserts for an unconsumed printable key (keyboard
/// toggled off, or no translation).
fn plain_char(key: u16) -> Option<char> {
    match key {
        0x41..=0x5A => Some((key as u8 + 0x20) as char),
        0x30..=0x39 | 0x20 => Some(key as u8 as char),
        _ => None,
    }
}

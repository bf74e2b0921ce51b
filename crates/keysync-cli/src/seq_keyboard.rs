//! Demo keyboards for the simulator.
//!
//! `SequenceKeyboard` is a toy context-sensitive layout: when the preceding
//! text plus the new character ends with a rule's pattern, it asks the
//! session to delete the already-typed part of the pattern and insert the
//! replacement — exactly the correction shape a real layout engine emits.

use keysync_core::keyboard::{Keyboard, KeyboardOutput};
use keysync_core::keycode::LogicalKey;

pub struct SequenceRule {
    pub pattern: String,
    pub output: String,
}

pub struct SequenceKeyboard {
    name: String,
    /// Checked longest-pattern-first so "sss" wins over "ss".
    rules: Vec<SequenceRule>,
}

impl SequenceKeyboard {
    pub fn new(name: impl Into<String>, mut rules: Vec<SequenceRule>) -> Self {
        rules.sort_by(|a, b| b.pattern.chars().count().cmp(&a.pattern.chars().count()));
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Long-vowel / digraph demo layout.
    pub fn latin_demo() -> Self {
        let rules = [
            ("aa", "ā"),
            ("ee", "ē"),
            ("ii", "ī"),
            ("oo", "ō"),
            ("uu", "ū"),
            ("sh", "š"),
            ("ch", "č"),
            ("zh", "ž"),
        ]
        .into_iter()
        .map(|(pattern, output)| SequenceRule {
            pattern: pattern.to_string(),
            output: output.to_string(),
        })
        .collect();
        Self::new("latin-demo", rules)
    }
}

impl Keyboard for SequenceKeyboard {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, key: LogicalKey, context: &str) -> KeyboardOutput {
        let c = match key {
            LogicalKey::Char(c) => c,
            // Deletion is host-side; nothing for this layout to do.
            LogicalKey::Backspace => return KeyboardOutput::nothing(),
        };

        let mut candidate = String::with_capacity(context.len() + c.len_utf8());
        candidate.push_str(context);
        candidate.push(c);

        for rule in &self.rules {
            if candidate.ends_with(&rule.pattern) {
                // Everything but the just-typed character is already in the
                // document and must be deleted first.
                let already_typed = rule.pattern.chars().count() - 1;
                return KeyboardOutput::correction(already_typed, rule.output.clone());
            }
        }
        KeyboardOutput::insert(c.to_string())
    }
}

/// Layout that passes every logical character through unchanged.
pub struct PassthroughKeyboard;

impl Keyboard for PassthroughKeyboard {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn process(&mut self, key: LogicalKey, _context: &str) -> KeyboardOutput {
        match key {
            LogicalKey::Char(c) => KeyboardOutput::insert(c.to_string()),
            LogicalKey::Backspace => KeyboardOutput::nothing(),
        }
    }
}

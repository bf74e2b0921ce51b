//! Raw virtual-key to logical-character translation.
//!
//! `translate` is a pure table lookup from a hardware virtual-key code plus
//! the current Shift state to the logical code fed to the active keyboard.
//! The shifted pairs reproduce the US layout digit row and OEM punctuation
//! positions; anything outside the mapped set translates to `None` and must
//! not be forwarded to the keyboard.

/// Virtual-key codes as delivered by the host input channel.
pub mod vk {
    pub const BACK: u16 = 0x08;
    pub const RETURN: u16 = 0x0D;
    pub const SHIFT: u16 = 0x10;
    pub const CONTROL: u16 = 0x11;
    pub const ESCAPE: u16 = 0x1B;
    pub const SPACE: u16 = 0x20;
    pub const END: u16 = 0x23;
    pub const HOME: u16 = 0x24;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;

    pub const OEM_1: u16 = 0xBA; // ';:'
    pub const OEM_PLUS: u16 = 0xBB; // '=+'
    pub const OEM_COMMA: u16 = 0xBC; // ',<'
    pub const OEM_MINUS: u16 = 0xBD; // '-_'
    pub const OEM_PERIOD: u16 = 0xBE; // '.>'
    pub const OEM_2: u16 = 0xBF; // '/?'
    pub const OEM_3: u16 = 0xC0; // '`~'
    pub const OEM_4: u16 = 0xDB; // '[{'
    pub const OEM_5: u16 = 0xDC; // '\|'
    pub const OEM_6: u16 = 0xDD; // ']}'
    pub const OEM_7: u16 = 0xDE; // ''"'

    /// Reserved acknowledgment key for the delete/insert protocol.
    /// Unassigned in the virtual-key space; a genuinely typed occurrence
    /// while no acknowledgment is expected is treated as an ordinary key.
    pub const ACK: u16 = 0xE8;
}

/// Logical code consumed by the keyboard. Backspace is distinguished so a
/// keyboard can special-case deletion against its own sequence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Char(char),
    Backspace,
}

/// How raw key events become logical codes. The two modes are mutually
/// exclusive; `Native` asks the host platform for a pre-resolved Unicode
/// scalar instead of using the tables here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    #[default]
    RawCodes,
    Native,
}

/// Translate a virtual-key code under the given Shift state.
///
/// Letters are lower-cased unless Shift is held. Digits and the OEM
/// punctuation positions map through the fixed US-layout pairs. Space and
/// Escape pass through as their ASCII scalars. Returns `None` for keys the
/// keyboard must never see.
pub fn translate(key: u16, shift: bool) -> Option<LogicalKey> {
    if key == vk::BACK {
        // Shift+Backspace is treated the same as plain Backspace.
        return Some(LogicalKey::Backspace);
    }

    if !shift {
        return match key {
            0x41..=0x5A => Some(LogicalKey::Char((key as u8 + 0x20) as char)),
            0x30..=0x39 => Some(LogicalKey::Char(key as u8 as char)),
            vk::SPACE => Some(LogicalKey::Char(' ')),
            vk::ESCAPE => Some(LogicalKey::Char('\u{1B}')),
            vk::OEM_1 => Some(LogicalKey::Char(';')),
            vk::OEM_PLUS => Some(LogicalKey::Char('=')),
            vk::OEM_COMMA => Some(LogicalKey::Char(',')),
            vk::OEM_MINUS => Some(LogicalKey::Char('-')),
            vk::OEM_PERIOD => Some(LogicalKey::Char('.')),
            vk::OEM_2 => Some(LogicalKey::Char('/')),
            vk::OEM_3 => Some(LogicalKey::Char('`')),
            vk::OEM_4 => Some(LogicalKey::Char('[')),
            vk::OEM_5 => Some(LogicalKey::Char('\\')),
            vk::OEM_6 => Some(LogicalKey::Char(']')),
            vk::OEM_7 => Some(LogicalKey::Char('\'')),
            _ => None,
        };
    }

    match key {
        0x41..=0x5A => Some(LogicalKey::Char(key as u8 as char)),
        0x30 => Some(LogicalKey::Char(')')),
        0x31 => Some(LogicalKey::Char('!')),
        0x32 => Some(LogicalKey::Char('@')),
        0x33 => Some(LogicalKey::Char('#')),
        0x34 => Some(LogicalKey::Char('$')),
        0x35 => Some(LogicalKey::Char('%')),
        0x36 => Some(LogicalKey::Char('^')),
        0x37 => Some(LogicalKey::Char('&')),
        0x38 => Some(LogicalKey::Char('*')),
        0x39 => Some(LogicalKey::Char('(')),
        vk::SPACE => Some(LogicalKey::Char(' ')),
        vk::ESCAPE => Some(LogicalKey::Char('\u{1B}')),
        vk::OEM_1 => Some(LogicalKey::Char(':')),
        vk::OEM_PLUS => Some(LogicalKey::Char('+')),
        vk::OEM_COMMA => Some(LogicalKey::Char('<')),
        vk::OEM_MINUS => Some(LogicalKey::Char('_')),
        vk::OEM_PERIOD => Some(LogicalKey::Char('>')),
        vk::OEM_2 => Some(LogicalKey::Char('?')),
        vk::OEM_3 => Some(LogicalKey::Char('~')),
        vk::OEM_4 => Some(LogicalKey::Char('{')),
        vk::OEM_5 => Some(LogicalKey::Char('|')),
        vk::OEM_6 => Some(LogicalKey::Char('}')),
        vk::OEM_7 => Some(LogicalKey::Char('"')),
        _ => None,
    }
}

/// Pure part of the ignore test: keys that can ever reach the keyboard.
/// Backspace additionally depends on session state (pending deletes and
/// context), which the session layers on top of this.
pub fn is_candidate_key(key: u16) -> bool {
    if key < 0x30 {
        return matches!(
            key,
            vk::BACK | vk::SHIFT | vk::CONTROL | vk::ESCAPE | vk::SPACE
        );
    }
    matches!(key, 0x30..=0x5A | 0xBA..=0xDF)
}

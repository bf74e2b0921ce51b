//! Headless simulator for the keystroke engine: a scriptable host, a demo
//! rule keyboard, and the event-script format consumed by `keysim`.

pub mod script;
pub mod seq_keyboard;

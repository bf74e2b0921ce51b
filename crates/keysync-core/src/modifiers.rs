//! Transient Shift/Control press state.

/// Tracks modifier keys across key-down/key-up pairs.
///
/// Cleared wholesale on any full keyboard-state reset: a focus change can
/// interrupt the event stream before the matching release arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierState {
    shift: bool,
    control: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_shift(&mut self) {
        self.shift = true;
    }

    pub fn release_shift(&mut self) {
        self.shift = false;
    }

    pub fn press_control(&mut self) {
        self.control = true;
    }

    pub fn release_control(&mut self) {
        self.control = false;
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn control(&self) -> bool {
        self.control
    }

    pub fn reset(&mut self) {
        self.shift = false;
        self.control = false;
    }
}

pub mod context;
pub mod keyboard;
pub mod keycode;
pub mod modifiers;
pub mod settings;

//! Persisted configuration: active keyboard index and logging toggle.
//!
//! Stored as a small TOML file. A missing file yields defaults, matching the
//! default-on-absent behavior of the original registry-backed configuration.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("TOML serialize error: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Index into the keyboard registry; clamped on restore if the set of
    /// installed keyboards shrank since it was saved.
    pub active_keyboard: usize,
    /// Diagnostic logging on/off.
    pub logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_keyboard: 0,
            logging: false,
        }
    }
}

impl Settings {
    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

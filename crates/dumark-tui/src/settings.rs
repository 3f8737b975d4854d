//! User settings persisted in the config directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::theme::ThemeVariant;

/// Size limit used when neither the settings nor the command line set one.
pub const DEFAULT_LIMIT_MB: u64 = 10;

/// Settings read from `<config_dir>/dumark/settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Entry names never walked, e.g. `node_modules`.
    pub ignore: Vec<String>,
    /// Hide entries smaller than this many megabytes.
    pub limit_mb: u64,
    /// Color theme.
    pub theme: ThemeVariant,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            limit_mb: DEFAULT_LIMIT_MB,
            theme: ThemeVariant::default(),
        }
    }
}

impl UserSettings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dumark").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`. A missing or malformed file gives defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed settings");
            Self::default()
        })
    }
}

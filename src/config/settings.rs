//! The settings file kept in the dotfiles directory.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Contents written by `init`.
pub const DEFAULT_SETTINGS: &str = r#"# dotfiler settings

[update]
# Top-level entries of this directory that `dotfiler update` never links
# into the home directory.
exclude = [".git", ".gitignore", ".gitmodules", "README.md"]
"#;

/// Settings read from `<dotfiles dir>/dotfiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Options for `dotfiler update`.
    pub update: UpdateSettings,
}

/// The `[update]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateSettings {
    /// Top-level storage entry names that are never linked into home.
    pub exclude: Vec<String>,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            exclude: [".git", ".gitignore", ".gitmodules", "README.md"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Settings {
    /// Return `true` if the storage entry `name` must be skipped by `update`.
    ///
    /// The settings file itself is always skipped.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        name == super::SETTINGS_NAME || self.update.exclude.iter().any(|e| e == name)
    }
}

/// Load settings from `path`.
///
/// A missing file yields the defaults, so a dotfiles directory created by
/// hand (or by an older version) still works.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

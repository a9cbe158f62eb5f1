//! Plugin Settings
//!
//! The persisted enabled/disabled map, stored as TOML:
//!
//! ```toml
//! [plugins]
//! word-count-plugin = true
//! diagram-plugin = false
//! ```
//!
//! A plugin missing from the map is enabled.

use crate::plugin::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "QuickMD";
const CONFIG_FILE_NAME: &str = "plugins.toml";

/// Enabled flag per plugin name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSettings {
    #[serde(default)]
    plugins: BTreeMap<String, bool>,
}

impl PluginSettings {
    /// Create empty settings (everything enabled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings listing each name as enabled
    pub fn with_defaults<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            plugins: names
                .into_iter()
                .map(|name| (name.to_string(), true))
                .collect(),
        }
    }

    /// `<config_dir>/QuickMD/plugins.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str, path: &Path) -> SettingsResult<Self> {
        toml::from_str(content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: format!(
                "Failed to parse plugin settings '{}': {}",
                path.display(),
                e.message()
            ),
        })
    }

    /// Load settings; a missing file yields empty settings
    pub fn load(path: &Path) -> SettingsResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("Loading plugin settings from {}", path.display());
                Self::from_toml(&content, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "No plugin settings at {}; all plugins enabled",
                    path.display()
                );
                Ok(Self::new())
            }
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::new();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; all plugins enabled", e);
                Self::new()
            }
        }
    }

    /// Write settings, creating the parent directory when needed
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved plugin settings to {}", path.display());
        Ok(())
    }

    /// Whether the plugin should be registered
    pub fn is_enabled(&self, name: &str) -> bool {
        self.plugins.get(name).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        self.plugins.insert(name.to_string(), enabled);
    }

    /// Explicit entries, sorted by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.plugins.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }
}

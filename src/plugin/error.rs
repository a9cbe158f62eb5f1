//! Plugin Error Handling
//!
//! Error types for plugin registration, lifecycle and settings, plus the
//! diagram engine errors surfaced by the built-in diagram plugin.

use crate::core::error_handling::ContextualError;
use crate::hooks::api::HookError;
use crate::plugin::types::Capability;
use std::path::PathBuf;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Errors raised at the registry boundary and by plugin entry points
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// Plugin not found in registry
    #[error("Plugin not found: {plugin_name}")]
    PluginNotFound { plugin_name: String },

    /// A plugin with this name is already active
    #[error("Plugin '{plugin_name}' is already registered")]
    AlreadyRegistered { plugin_name: String },

    /// Plugin API version incompatible with the host
    #[error("Version incompatible: {message}")]
    VersionIncompatible { message: String },

    /// Capability declared without the matching implementation
    #[error("Plugin '{plugin_name}' declares capability '{capability}' but does not implement it")]
    CapabilityMismatch {
        plugin_name: String,
        capability: Capability,
    },

    /// Plugin failed to initialize
    #[error("Failed to load plugin '{plugin_name}': {cause}")]
    LoadError { plugin_name: String, cause: String },

    /// Plugin code failed while handling a hook or tearing down
    #[error("Plugin '{plugin_name}' failed during '{operation}': {cause}")]
    ExecutionError {
        plugin_name: String,
        operation: String,
        cause: String,
    },
}

impl PluginError {
    pub fn execution(
        plugin_name: impl Into<String>,
        operation: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        PluginError::ExecutionError {
            plugin_name: plugin_name.into(),
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }

    pub fn load(plugin_name: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        PluginError::LoadError {
            plugin_name: plugin_name.into(),
            cause: cause.to_string(),
        }
    }
}

impl From<PluginError> for HookError {
    fn from(error: PluginError) -> Self {
        HookError::Callback {
            message: error.to_string(),
        }
    }
}

/// Result type alias for settings persistence
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Failures reading or writing the enabled-plugin map
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot access plugin settings '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Parse { path: PathBuf, message: String },

    #[error("Cannot serialize plugin settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{message}")]
    UnknownPlugin { name: String, message: String },

    #[error("No configuration directory available; pass --config")]
    NoConfigDir,
}

impl SettingsError {
    pub fn unknown_plugin(name: &str, known: &[&str]) -> Self {
        SettingsError::UnknownPlugin {
            name: name.to_string(),
            message: format!(
                "Unknown plugin '{}'. Available plugins: {}",
                name,
                known.join(", ")
            ),
        }
    }
}

impl ContextualError for SettingsError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            SettingsError::Parse { .. } | SettingsError::UnknownPlugin { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            SettingsError::Parse { message, .. } | SettingsError::UnknownPlugin { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Diagram engine failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("Diagram engine is not loaded")]
    NotLoaded,

    #[error("Diagram engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Diagram render failed: {0}")]
    Render(String),
}

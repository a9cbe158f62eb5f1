//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from internal modules.

// Core plugin management
pub use crate::plugin::manager::PluginManager;
pub use crate::plugin::registry::PluginRegistry;

// Error handling
pub use crate::plugin::error::{
    DiagramError, PluginError, PluginResult, SettingsError, SettingsResult,
};

// Plugin contracts
pub use crate::plugin::traits::{
    EditorStatePlugin, Plugin, PreviewEnhancementPlugin, ToolbarButtonPlugin,
};

// Plugin metadata and information
pub use crate::plugin::types::{BuiltinPlugin, Capability, CapabilitySet, PluginInfo, PluginSummary};

// Persisted enabled/disabled map
pub use crate::plugin::settings::PluginSettings;

// Builtin plugins
pub use crate::plugin::builtin::api::{builtin_names, find_builtin, get_all_builtin_plugins};
pub use crate::plugin::builtin::diagram::{DiagramEngine, DiagramPlugin, EngineStatus, MermaidCli};
pub use crate::plugin::builtin::diagram_toolbar::{DiagramKind, DiagramToolbarPlugin};
pub use crate::plugin::builtin::word_count::{DocumentStats, WordCountPlugin};

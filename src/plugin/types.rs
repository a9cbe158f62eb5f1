//! Plugin Type Definitions
//!
//! Metadata, capability sets and catalog descriptors for plugins.

use crate::plugin::traits::Plugin;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Plugin metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Unique, stable plugin name
    pub name: String,

    /// Plugin version
    pub version: String,

    /// Plugin description
    pub description: String,

    /// Plugin author
    pub author: String,

    /// API version the plugin was built against
    pub api_version: u32,
}

impl PluginInfo {
    pub fn new(name: &str, version: &str, description: &str, author: &str, api_version: u32) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            api_version,
        }
    }
}

/// Specialization a plugin can implement
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Capability {
    ToolbarButton,
    EditorState,
    PreviewEnhancement,
}

/// The set of specializations a plugin declares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&'static str> = self.iter().map(Into::into).collect();
        f.write_str(&names.join(", "))
    }
}

/// Factory for a plugin shipped with the host
#[derive(Clone, Copy)]
pub struct BuiltinPlugin {
    pub name: &'static str,
    pub factory: fn() -> Arc<dyn Plugin>,
}

impl BuiltinPlugin {
    pub fn create(&self) -> Arc<dyn Plugin> {
        (self.factory)()
    }
}

impl fmt::Debug for BuiltinPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinPlugin")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Listing row for a known plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSummary {
    pub info: PluginInfo,
    pub capabilities: CapabilitySet,
    pub enabled: bool,
    pub active: bool,
}

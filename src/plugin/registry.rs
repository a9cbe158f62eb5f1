//! Plugin Registry
//!
//! Storage for active plugins: the instance, the hook subscriptions made on
//! its behalf and the order plugins were registered in.

use crate::editor::api::ToolbarButton;
use crate::hooks::api::HookCallback;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::Plugin;
use crate::plugin::types::PluginInfo;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// A registered plugin and everything the manager must undo for it
#[derive(Clone)]
pub(crate) struct ActivePlugin {
    pub plugin: Arc<dyn Plugin>,
    pub info: PluginInfo,
    /// Subscriptions in the order they were made
    pub subscriptions: Vec<(String, HookCallback)>,
    pub toolbar_button: Option<Arc<ToolbarButton>>,
    pub registered_at: DateTime<Utc>,
}

/// Plugin registry for managing active plugins
#[derive(Default)]
pub struct PluginRegistry {
    /// Map of plugin name to active plugin
    plugins: HashMap<String, ActivePlugin>,

    /// Plugin names in registration order
    order: Vec<String>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.order)
            .finish()
    }
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin; an existing entry with the same name is never replaced
    pub(crate) fn insert(&mut self, entry: ActivePlugin) -> PluginResult<()> {
        let plugin_name = entry.info.name.clone();
        if self.plugins.contains_key(&plugin_name) {
            return Err(PluginError::AlreadyRegistered { plugin_name });
        }

        self.order.push(plugin_name.clone());
        self.plugins.insert(plugin_name, entry);
        Ok(())
    }

    /// Remove a plugin from the registry
    pub(crate) fn remove(&mut self, name: &str) -> PluginResult<ActivePlugin> {
        let entry = self
            .plugins
            .remove(name)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: name.to_string(),
            })?;
        self.order.retain(|registered| registered != name);
        Ok(entry)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ActivePlugin> {
        self.plugins.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Plugin names in registration order
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Plugin instances in registration order
    pub fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.order
            .iter()
            .filter_map(|name| self.plugins.get(name))
            .map(|entry| Arc::clone(&entry.plugin))
            .collect()
    }

    pub fn registered_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.plugins.get(name).map(|entry| entry.registered_at)
    }

    /// Get total count of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

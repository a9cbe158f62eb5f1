//! Plugin Trait System
//!
//! The base [`Plugin`] contract and the three specializations a plugin may
//! implement.
//!
//! # Capabilities
//!
//! A plugin declares which specializations it implements through
//! [`Plugin::capabilities`] and exposes each one through the matching
//! accessor (`as_toolbar_button`, `as_editor_state`,
//! `as_preview_enhancement`). The manager checks once at registration that
//! every declared capability has an accessor returning `Some`, then derives
//! the plugin's hook subscriptions from the set:
//!
//! - **ToolbarButton**: the manager publishes `toolbar:addButton` after
//!   initialization and `toolbar:removeButton` before teardown.
//! - **EditorState**: subscribed to `editor:contentChanged`.
//! - **PreviewEnhancement**: subscribed to `preview:beforeRender` (pipeline)
//!   and `preview:afterRender`.
//!
//! Plugins never retain a reference to the manager. Anything that needs to
//! publish later keeps a [`HookHandle`](crate::hooks::api::HookHandle).

use crate::core::version::is_api_compatible;
use crate::editor::api::{EditorAdapter, PreviewElement, ToolbarButton};
use crate::hooks::api::HookCallback;
use crate::plugin::error::PluginResult;
use crate::plugin::manager::PluginManager;
use crate::plugin::types::{CapabilitySet, PluginInfo};
use std::any::Any;
use std::sync::Arc;

/// Base plugin trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Get plugin metadata
    fn plugin_info(&self) -> PluginInfo;

    /// Concrete-type access for hosts that know the plugin
    fn as_any(&self) -> &dyn Any;

    /// Specializations this plugin implements
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
    }

    /// Check if this plugin is compatible with the given host API version
    fn is_compatible(&self, system_api_version: u32) -> bool {
        is_api_compatible(system_api_version, self.plugin_info().api_version)
    }

    /// Called exactly once when the plugin is registered.
    ///
    /// `editor` is the host adapter set on the manager, if any.
    fn initialize(
        &self,
        manager: &PluginManager,
        editor: Option<Arc<dyn EditorAdapter>>,
    ) -> PluginResult<()>;

    /// Called exactly once when the plugin is unregistered.
    ///
    /// Must release everything `initialize` acquired and must succeed for
    /// resources that were never acquired.
    fn teardown(&self, manager: &PluginManager) -> PluginResult<()>;

    /// True once deferred initialization has completed
    fn is_ready(&self) -> bool {
        true
    }

    /// Extra `(hook name, callback)` subscriptions beyond the specializations
    fn declared_hooks(&self) -> Vec<(String, HookCallback)> {
        Vec::new()
    }

    fn as_toolbar_button(&self) -> Option<&dyn ToolbarButtonPlugin> {
        None
    }

    fn as_editor_state(&self) -> Option<&dyn EditorStatePlugin> {
        None
    }

    fn as_preview_enhancement(&self) -> Option<&dyn PreviewEnhancementPlugin> {
        None
    }
}

/// Plugin that contributes one toolbar button
pub trait ToolbarButtonPlugin: Plugin {
    /// Descriptor published with `toolbar:addButton`/`toolbar:removeButton`
    fn toolbar_button(&self) -> Arc<ToolbarButton>;
}

/// Plugin that observes document changes
pub trait EditorStatePlugin: Plugin {
    fn on_content_changed(&self, _content: &str) -> PluginResult<()> {
        Ok(())
    }
}

/// Plugin that takes part in preview rendering
pub trait PreviewEnhancementPlugin: Plugin {
    /// Rewrite markdown before rendering; `None` leaves it unchanged
    fn before_render(&self, _content: &str) -> PluginResult<Option<String>> {
        Ok(None)
    }

    /// Post-process the rendered element in place
    fn after_render(&self, _element: &mut PreviewElement) -> PluginResult<()> {
        Ok(())
    }
}

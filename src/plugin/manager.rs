//! Plugin Manager
//!
//! Coordinates the plugin lifecycle: validates and initializes plugins,
//! subscribes their hooks on the bus, and reverses all of it on
//! unregistration. No error or panic raised by plugin code escapes
//! `register`, `unregister` or `trigger_hook`.

use crate::core::version::{get_api_version, major_version};
use crate::editor::api::{EditorAdapter, ToolbarButton};
use crate::hooks::api::{
    notify_callback, pipeline_callback, Hook, HookBus, HookCallback, HookError, HookPayload,
};
use crate::hooks::error::panic_message;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::registry::{ActivePlugin, PluginRegistry};
use crate::plugin::traits::Plugin;
use crate::plugin::types::{Capability, PluginInfo};
use chrono::{DateTime, Utc};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Plugin manager owning the active plugins and the hook bus
pub struct PluginManager {
    registry: PluginRegistry,
    bus: HookBus,
    editor: Option<Arc<dyn EditorAdapter>>,
    api_version: u32,
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("registry", &self.registry)
            .field("bus", &self.bus)
            .field("has_editor", &self.editor.is_some())
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl PluginManager {
    /// Create a plugin manager for the host's API version
    pub fn new() -> Self {
        Self::with_api_version(get_api_version())
    }

    /// Create a plugin manager for an explicit API version
    pub fn with_api_version(api_version: u32) -> Self {
        Self::with_bus(HookBus::new(), api_version)
    }

    /// Create a plugin manager publishing on an existing bus
    pub fn with_bus(bus: HookBus, api_version: u32) -> Self {
        Self {
            registry: PluginRegistry::new(),
            bus,
            editor: None,
            api_version,
        }
    }

    /// Get the API version
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// The hook bus plugins and the host publish on
    pub fn hooks(&self) -> &HookBus {
        &self.bus
    }

    /// Store the host adapter handed to plugins on initialize
    pub fn set_editor_instance(&mut self, editor: Arc<dyn EditorAdapter>) {
        log::debug!("Editor instance attached to plugin manager");
        self.editor = Some(editor);
    }

    pub fn editor_instance(&self) -> Option<Arc<dyn EditorAdapter>> {
        self.editor.clone()
    }

    /// Validate plugin compatibility
    pub fn validate_plugin_compatibility(&self, plugin: &dyn Plugin) -> PluginResult<()> {
        let info = plugin.plugin_info();
        if !plugin.is_compatible(self.api_version) {
            return Err(PluginError::VersionIncompatible {
                message: format!(
                    "Plugin '{}' targets API {} (major {}), host provides {} (major {})",
                    info.name,
                    info.api_version,
                    major_version(info.api_version),
                    self.api_version,
                    major_version(self.api_version)
                ),
            });
        }
        Ok(())
    }

    /// Check every declared capability is backed by its implementation
    pub fn validate_capabilities(&self, plugin: &dyn Plugin) -> PluginResult<()> {
        for capability in plugin.capabilities().iter() {
            let implemented = match capability {
                Capability::ToolbarButton => plugin.as_toolbar_button().is_some(),
                Capability::EditorState => plugin.as_editor_state().is_some(),
                Capability::PreviewEnhancement => plugin.as_preview_enhancement().is_some(),
            };
            if !implemented {
                return Err(PluginError::CapabilityMismatch {
                    plugin_name: plugin.plugin_info().name,
                    capability,
                });
            }
        }
        Ok(())
    }

    /// Register a plugin, reporting why it was rejected
    pub fn try_register(&mut self, plugin: Arc<dyn Plugin>) -> PluginResult<()> {
        let info = panic::catch_unwind(AssertUnwindSafe(|| plugin.plugin_info())).map_err(
            |panic| {
                PluginError::load(
                    "<unknown>",
                    format!("plugin_info panicked: {}", panic_message(panic.as_ref())),
                )
            },
        )?;
        if self.registry.contains(&info.name) {
            return Err(PluginError::AlreadyRegistered {
                plugin_name: info.name,
            });
        }
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.validate_plugin_compatibility(plugin.as_ref())?;
            self.validate_capabilities(plugin.as_ref())
        }))
        .unwrap_or_else(|panic| {
            Err(PluginError::load(
                &info.name,
                format!("panicked during validation: {}", panic_message(panic.as_ref())),
            ))
        })?;

        log::debug!("Initializing plugin '{}' v{}", info.name, info.version);
        let editor = self.editor.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| plugin.initialize(self, editor))) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(PluginError::load(&info.name, error)),
            Err(panic) => {
                return Err(PluginError::load(
                    &info.name,
                    format!("panicked: {}", panic_message(panic.as_ref())),
                ))
            }
        }

        // Nothing is subscribed until both lookups have returned
        let wiring = panic::catch_unwind(AssertUnwindSafe(|| {
            (
                self.collect_subscriptions(&plugin, &info.name),
                self.toolbar_button_of(plugin.as_ref()),
            )
        }));
        let (subscriptions, toolbar_button) = match wiring {
            Ok(wiring) => wiring,
            Err(panic) => {
                let cause = format!(
                    "panicked while collecting hooks: {}",
                    panic_message(panic.as_ref())
                );
                self.teardown_contained(plugin.as_ref(), &info.name);
                return Err(PluginError::load(&info.name, cause));
            }
        };

        for (hook, callback) in &subscriptions {
            self.bus.subscribe_as(hook, Arc::clone(callback), &info.name);
        }

        if let Some(button) = &toolbar_button {
            self.bus
                .publish(Hook::ToolbarAddButton, HookPayload::Button(Arc::clone(button)));
        }

        self.registry.insert(ActivePlugin {
            plugin,
            info: info.clone(),
            subscriptions,
            toolbar_button,
            registered_at: Utc::now(),
        })?;
        log::info!("Plugin '{}' registered", info.name);
        Ok(())
    }

    /// Register a plugin; failures are logged and reported as `false`
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> bool {
        match self.try_register(plugin) {
            Ok(()) => true,
            Err(error @ PluginError::AlreadyRegistered { .. }) => {
                log::warn!("{}", error);
                false
            }
            Err(error) => {
                log::error!("{}", error);
                false
            }
        }
    }

    /// Unregister a plugin, reporting a missing name as an error
    pub fn try_unregister(&mut self, name: &str) -> PluginResult<()> {
        let Some(entry) = self.registry.get(name).cloned() else {
            return Err(PluginError::PluginNotFound {
                plugin_name: name.to_string(),
            });
        };

        if let Some(button) = &entry.toolbar_button {
            self.bus
                .publish(Hook::ToolbarRemoveButton, HookPayload::Button(Arc::clone(button)));
        }

        self.teardown_contained(entry.plugin.as_ref(), name);

        for (hook, callback) in &entry.subscriptions {
            if !self.bus.unsubscribe(hook, callback) {
                log::debug!("Plugin '{}' was no longer subscribed to '{}'", name, hook);
            }
        }

        self.registry.remove(name)?;
        log::info!("Plugin '{}' unregistered", name);
        Ok(())
    }

    /// Unregister a plugin; an unknown name is a no-op returning `false`
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.try_unregister(name) {
            Ok(()) => true,
            Err(error) => {
                log::debug!("{}", error);
                false
            }
        }
    }

    /// Unregister every plugin in reverse registration order
    pub fn unregister_all(&mut self) -> usize {
        let names = self.registry.names();
        names
            .iter()
            .rev()
            .filter(|name| self.unregister(name))
            .count()
    }

    /// Active plugins in registration order
    pub fn get_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.registry.plugins()
    }

    pub fn get_plugin(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.registry.get(name).map(|entry| Arc::clone(&entry.plugin))
    }

    pub fn get_plugin_info(&self, name: &str) -> Option<PluginInfo> {
        self.registry.get(name).map(|entry| entry.info.clone())
    }

    /// Active plugin names in registration order
    pub fn plugin_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn plugin_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registered_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.registry.registered_at(name)
    }

    /// True when every active plugin has finished deferred initialization
    pub fn all_ready(&self) -> bool {
        self.registry.plugins().iter().all(|plugin| plugin.is_ready())
    }

    /// Publish a hook on the bus; unknown names are not an error
    pub fn trigger_hook(&self, hook: impl AsRef<str>, payload: HookPayload) -> HookPayload {
        self.bus.publish(hook, payload)
    }

    fn teardown_contained(&self, plugin: &dyn Plugin, name: &str) {
        match panic::catch_unwind(AssertUnwindSafe(|| plugin.teardown(self))) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => log::error!("Plugin '{}' teardown failed: {}", name, error),
            Err(panic) => log::error!(
                "Plugin '{}' teardown panicked: {}",
                name,
                panic_message(panic.as_ref())
            ),
        }
    }

    fn toolbar_button_of(&self, plugin: &dyn Plugin) -> Option<Arc<ToolbarButton>> {
        if !plugin.capabilities().contains(Capability::ToolbarButton) {
            return None;
        }
        plugin.as_toolbar_button().map(|toolbar| toolbar.toolbar_button())
    }

    /// Hook subscriptions derived from the capability set, then extra ones
    fn collect_subscriptions(
        &self,
        plugin: &Arc<dyn Plugin>,
        plugin_name: &str,
    ) -> Vec<(String, HookCallback)> {
        let capabilities = plugin.capabilities();
        let mut subscriptions = Vec::new();

        if capabilities.contains(Capability::EditorState) {
            let observer = Arc::clone(plugin);
            subscriptions.push((
                Hook::ContentChanged.name().to_string(),
                notify_callback(move |payload| {
                    let content = payload.expect_text()?;
                    if let Some(state) = observer.as_editor_state() {
                        state.on_content_changed(content)?;
                    }
                    Ok(())
                }),
            ));
        }

        if capabilities.contains(Capability::PreviewEnhancement) {
            let enhancer = Arc::clone(plugin);
            subscriptions.push((
                Hook::PreviewBeforeRender.name().to_string(),
                pipeline_callback(move |payload| {
                    let content = payload.expect_text()?;
                    let Some(preview) = enhancer.as_preview_enhancement() else {
                        return Ok(None);
                    };
                    Ok(preview.before_render(content)?.map(HookPayload::Text))
                }),
            ));

            let enhancer = Arc::clone(plugin);
            subscriptions.push((
                Hook::PreviewAfterRender.name().to_string(),
                notify_callback(move |payload| {
                    let element = payload.expect_element()?;
                    let Some(preview) = enhancer.as_preview_enhancement() else {
                        return Ok(());
                    };
                    let mut element = element
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    preview.after_render(&mut element).map_err(HookError::from)
                }),
            ));
        }

        let extra = plugin.declared_hooks();
        if !extra.is_empty() {
            log::debug!(
                "Plugin '{}' declares {} extra hook subscriptions",
                plugin_name,
                extra.len()
            );
        }
        subscriptions.extend(extra);
        subscriptions
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PluginManager {
    fn drop(&mut self) {
        if !self.registry.is_empty() {
            log::debug!(
                "Dropping plugin manager with {} active plugins",
                self.registry.len()
            );
            self.unregister_all();
        }
    }
}

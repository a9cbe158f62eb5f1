//! Editor session
//!
//! Wires one document editor, one toolbar and one plugin manager together
//! and owns the enabled-plugin settings. The session is the host side of the
//! hook vocabulary: it renders toolbar and dialog hooks into its models and
//! publishes content and preview hooks.

use crate::editor::api::{
    shared_element, DocumentEditor, EditorAdapter, MarkdownRenderer, PreviewElement, Toolbar,
};
use crate::hooks::api::{notify_callback, Hook, HookPayload};
use crate::plugin::api::{
    get_all_builtin_plugins, BuiltinPlugin, Plugin, PluginManager, PluginSettings, PluginSummary,
    SettingsError, SettingsResult,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One open document with its plugins
pub struct EditorSession {
    manager: PluginManager,
    editor: Arc<DocumentEditor>,
    toolbar: Arc<Toolbar>,
    settings: PluginSettings,
    settings_path: Option<PathBuf>,
    catalog: Vec<BuiltinPlugin>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("manager", &self.manager)
            .field("toolbar", &self.toolbar)
            .field("settings", &self.settings)
            .field("settings_path", &self.settings_path)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Open a session with the builtin plugins, reading settings from `settings_path`
    pub fn open(text: impl Into<String>, settings_path: Option<PathBuf>) -> Self {
        let settings = PluginSettings::load_or_default(settings_path.as_deref());
        Self::with_catalog(
            text,
            settings,
            settings_path,
            get_all_builtin_plugins().to_vec(),
            PluginManager::new(),
        )
    }

    /// Open a session over an explicit catalog and manager
    pub fn with_catalog(
        text: impl Into<String>,
        settings: PluginSettings,
        settings_path: Option<PathBuf>,
        catalog: Vec<BuiltinPlugin>,
        manager: PluginManager,
    ) -> Self {
        let mut session = Self {
            manager,
            editor: Arc::new(DocumentEditor::new(text)),
            toolbar: Arc::new(Toolbar::new()),
            settings,
            settings_path,
            catalog,
        };
        session.warn_unknown_settings();
        session.attach_host();
        let registered = session.register_enabled();
        log::debug!("Session opened with {} plugins", registered);
        session
    }

    fn warn_unknown_settings(&self) {
        for (name, _) in self.settings.entries() {
            if !self.catalog.iter().any(|builtin| builtin.name == name) {
                log::warn!("Plugin settings mention unknown plugin '{}'", name);
            }
        }
    }

    fn attach_host(&mut self) {
        let editor: Arc<dyn EditorAdapter> = self.editor.clone();
        self.manager.set_editor_instance(editor);
        self.editor.attach(self.manager.hooks().handle());

        let hooks = self.manager.hooks();
        let editor = Arc::clone(&self.editor);
        hooks.subscribe(
            Hook::ShowDialog,
            notify_callback(move |payload| {
                editor.show_dialog(Arc::clone(payload.expect_dialog()?));
                Ok(())
            }),
        );
        let editor = Arc::clone(&self.editor);
        hooks.subscribe(
            Hook::HideDialog,
            notify_callback(move |_| {
                editor.hide_dialog();
                Ok(())
            }),
        );
        let toolbar = Arc::clone(&self.toolbar);
        hooks.subscribe(
            Hook::ToolbarAddButton,
            notify_callback(move |payload| {
                toolbar.add(Arc::clone(payload.expect_button()?));
                Ok(())
            }),
        );
        let toolbar = Arc::clone(&self.toolbar);
        hooks.subscribe(
            Hook::ToolbarRemoveButton,
            notify_callback(move |payload| {
                toolbar.remove(&payload.expect_button()?.id);
                Ok(())
            }),
        );
    }

    /// Register every enabled catalog plugin; returns how many registered
    pub fn register_enabled(&mut self) -> usize {
        let enabled: Vec<BuiltinPlugin> = self
            .catalog
            .iter()
            .filter(|builtin| {
                let enabled = self.settings.is_enabled(builtin.name);
                if !enabled {
                    log::debug!("Plugin '{}' is disabled", builtin.name);
                }
                enabled
            })
            .copied()
            .collect();
        enabled
            .iter()
            .filter(|builtin| self.manager.register(builtin.create()))
            .count()
    }

    /// Register a plugin that is not part of the catalog
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> bool {
        self.manager.register(plugin)
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.manager.unregister(name)
    }

    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    pub fn editor(&self) -> &Arc<DocumentEditor> {
        &self.editor
    }

    pub fn toolbar(&self) -> &Arc<Toolbar> {
        &self.toolbar
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn content(&self) -> String {
        self.editor.content()
    }

    /// Replace the document text; plugins see `editor:contentChanged`
    pub fn set_content(&self, text: impl Into<String>) {
        self.editor.set_content(text);
    }

    /// Insert at the current selection; plugins see `editor:contentChanged`
    pub fn insert_text(&self, text: &str) {
        self.editor.insert_text(text);
    }

    /// Run the preview pipeline and return the final HTML
    pub fn render_preview(&self, renderer: &dyn MarkdownRenderer) -> String {
        let content = self.editor.content();
        let markdown = self
            .manager
            .trigger_hook(Hook::PreviewBeforeRender, HookPayload::Text(content.clone()))
            .into_text()
            .unwrap_or_else(|| {
                log::warn!("preview:beforeRender produced no text; rendering original content");
                content
            });

        let element = shared_element(PreviewElement::new(renderer.render(&markdown)));
        self.manager
            .trigger_hook(Hook::PreviewAfterRender, HookPayload::Element(Arc::clone(&element)));

        let guard = element
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.html().to_owned()
    }

    /// Click a toolbar button by id
    pub fn click_toolbar(&self, id: &str) -> bool {
        self.toolbar.click(id)
    }

    /// Answer the open dialog
    pub fn choose_dialog(&self, key: &str) -> bool {
        self.editor.choose(key)
    }

    /// Persist the flag, then unregister and re-register as the flag says.
    ///
    /// Returns whether the plugin is active afterwards.
    pub fn set_plugin_enabled(&mut self, name: &str, enabled: bool) -> SettingsResult<bool> {
        let Some(builtin) = self.catalog.iter().find(|b| b.name == name).copied() else {
            let known: Vec<&str> = self.catalog.iter().map(|b| b.name).collect();
            return Err(SettingsError::unknown_plugin(name, &known));
        };

        // Written files list every catalog plugin, not only the toggled one
        let mut settings = PluginSettings::with_defaults(self.catalog.iter().map(|b| b.name));
        for (known, flag) in self.settings.entries() {
            settings.set_enabled(known, flag);
        }
        settings.set_enabled(name, enabled);
        if let Some(path) = &self.settings_path {
            settings.save(path)?;
        }
        self.settings = settings;

        self.manager.unregister(name);
        if enabled {
            self.manager.register(builtin.create());
        }
        log::info!(
            "Plugin '{}' {}",
            name,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(self.manager.is_active(name))
    }

    /// Tear down and re-register all enabled plugins
    pub fn reload_plugins(&mut self) -> usize {
        self.manager.unregister_all();
        self.register_enabled()
    }

    /// Wait for deferred plugin initialization; false on timeout
    pub async fn wait_until_ready(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.manager.all_ready() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                log::warn!("Plugins not ready after {:?}", timeout);
                return false;
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Switch to another document; plugins are torn down and set up again
    pub fn swap_document(&mut self, text: impl Into<String>) -> usize {
        self.manager.unregister_all();
        self.editor.hide_dialog();
        self.editor.set_content(text);
        self.register_enabled()
    }

    /// Listing rows for every catalog plugin
    pub fn plugin_summaries(&self) -> Vec<PluginSummary> {
        self.catalog
            .iter()
            .map(|builtin| {
                let plugin = self
                    .manager
                    .get_plugin(builtin.name)
                    .unwrap_or_else(|| builtin.create());
                PluginSummary {
                    info: plugin.plugin_info(),
                    capabilities: plugin.capabilities(),
                    enabled: self.settings.is_enabled(builtin.name),
                    active: self.manager.is_active(builtin.name),
                }
            })
            .collect()
    }

    /// Run `f` against an active plugin of concrete type `T`
    pub fn with_plugin<T: 'static, R>(&self, name: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        let plugin = self.manager.get_plugin(name)?;
        let concrete = plugin.as_any().downcast_ref::<T>()?;
        Some(f(concrete))
    }

    /// Unregister every plugin; returns how many were active
    pub fn shutdown(&mut self) -> usize {
        let count = self.manager.unregister_all();
        log::debug!("Session shut down ({} plugins)", count);
        count
    }
}

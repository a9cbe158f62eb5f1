//! Common test utilities and helpers
//!
//! Sessions over fake diagram engines and a recording plugin built only on
//! the public API.

#![allow(dead_code)]

use async_trait::async_trait;
use quickmd::app::session::EditorSession;
use quickmd::editor::api::{EditorAdapter, PreviewElement};
use quickmd::plugin::api::{
    get_all_builtin_plugins, BuiltinPlugin, Capability, CapabilitySet, DiagramEngine,
    DiagramError, DiagramPlugin, EditorStatePlugin, Plugin, PluginInfo, PluginManager,
    PluginResult, PluginSettings, PreviewEnhancementPlugin,
};
use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Engine that loads after a short delay and wraps code in an `<svg>`
pub struct FakeEngine;

#[async_trait]
impl DiagramEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    async fn load(&self) -> Result<(), DiagramError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(())
    }

    fn render(&self, _id: &str, code: &str) -> Result<String, DiagramError> {
        if code.contains("boom") {
            return Err(DiagramError::Render("syntax error".to_string()));
        }
        Ok(format!("<svg data-engine=\"fake\">{code}</svg>"))
    }
}

fn fake_diagram_plugin() -> Arc<dyn Plugin> {
    Arc::new(DiagramPlugin::with_engine(Arc::new(FakeEngine)))
}

/// Builtin catalog with the mermaid CLI swapped for [`FakeEngine`]
pub fn catalog() -> Vec<BuiltinPlugin> {
    get_all_builtin_plugins()
        .iter()
        .map(|builtin| match builtin.name {
            "diagram-plugin" => BuiltinPlugin {
                name: builtin.name,
                factory: fake_diagram_plugin,
            },
            _ => *builtin,
        })
        .collect()
}

pub fn session(text: &str) -> EditorSession {
    session_with(text, PluginSettings::new())
}

pub fn session_with(text: &str, settings: PluginSettings) -> EditorSession {
    EditorSession::with_catalog(text, settings, None, catalog(), PluginManager::new())
}

/// Settings with the named plugins switched off
pub fn disabled(names: &[&str]) -> PluginSettings {
    let mut settings = PluginSettings::new();
    for name in names {
        settings.set_enabled(name, false);
    }
    settings
}

/// Shared, ordered record of plugin callbacks
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Editor-state and preview plugin writing every call to a [`Journal`]
pub struct RecordingPlugin {
    name: String,
    journal: Journal,
    suffix: &'static str,
}

impl RecordingPlugin {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            suffix: "",
        }
    }

    /// Append `suffix` to the markdown before rendering
    pub fn appending(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }
}

impl Plugin for RecordingPlugin {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo::new(&self.name, "0.1.0", "Records callbacks", "Tests", 20250727)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
            .with(Capability::EditorState)
            .with(Capability::PreviewEnhancement)
    }

    fn initialize(
        &self,
        _manager: &PluginManager,
        editor: Option<Arc<dyn EditorAdapter>>,
    ) -> PluginResult<()> {
        let content = editor.map(|editor| editor.content()).unwrap_or_default();
        self.journal.push(format!("{}:initialize:{}", self.name, content));
        Ok(())
    }

    fn teardown(&self, _manager: &PluginManager) -> PluginResult<()> {
        self.journal.push(format!("{}:teardown", self.name));
        Ok(())
    }

    fn as_editor_state(&self) -> Option<&dyn EditorStatePlugin> {
        Some(self)
    }

    fn as_preview_enhancement(&self) -> Option<&dyn PreviewEnhancementPlugin> {
        Some(self)
    }
}

impl EditorStatePlugin for RecordingPlugin {
    fn on_content_changed(&self, content: &str) -> PluginResult<()> {
        self.journal.push(format!("{}:changed:{}", self.name, content));
        Ok(())
    }
}

impl PreviewEnhancementPlugin for RecordingPlugin {
    fn before_render(&self, content: &str) -> PluginResult<Option<String>> {
        self.journal.push(format!("{}:before", self.name));
        if self.suffix.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!("{content}{}", self.suffix)))
        }
    }

    fn after_render(&self, element: &mut PreviewElement) -> PluginResult<()> {
        self.journal.push(format!("{}:after", self.name));
        let html = format!("{}<!-- {} -->", element.html(), self.name);
        element.set_html(html);
        Ok(())
    }
}

//! Plugin Test Utilities
//!
//! Configurable mock plugins and diagram engines shared by the plugin tests.

use crate::core::version::get_api_version;
use crate::editor::api::{ButtonPosition, EditorAdapter, PreviewElement, ToolbarButton};
use crate::hooks::api::HookCallback;
use crate::plugin::builtin::diagram::DiagramEngine;
use crate::plugin::error::{DiagramError, PluginError, PluginResult};
use crate::plugin::manager::PluginManager;
use crate::plugin::traits::{
    EditorStatePlugin, Plugin, PreviewEnhancementPlugin, ToolbarButtonPlugin,
};
use crate::plugin::types::{Capability, CapabilitySet, PluginInfo};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a mock entry point misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Error,
    Panic,
}

fn fail(failure: Option<Failure>, name: &str, operation: &str) -> PluginResult<()> {
    match failure {
        None => Ok(()),
        Some(Failure::Error) => Err(PluginError::execution(name, operation, "mock failure")),
        Some(Failure::Panic) => panic!("mock panic in {operation}"),
    }
}

/// Ordered record of lifecycle events across several plugins
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

type Transform = fn(&str) -> Option<String>;

/// Configurable mock plugin for comprehensive testing
pub struct MockPlugin {
    pub info: PluginInfo,
    declared: CapabilitySet,
    implemented: CapabilitySet,
    fail_initialize: Option<Failure>,
    fail_teardown: Option<Failure>,
    fail_content_changed: Option<Failure>,
    panic_declared_hooks: bool,
    panic_toolbar_button: bool,
    transform: Option<Transform>,
    extra_hooks: Vec<(String, HookCallback)>,
    button: Arc<ToolbarButton>,
    pub initialize_calls: AtomicUsize,
    pub teardown_calls: AtomicUsize,
    pub after_render_calls: AtomicUsize,
    pub seen_content: Mutex<Vec<String>>,
    pub had_editor: AtomicBool,
    events: EventLog,
}

impl MockPlugin {
    pub fn new(name: &str) -> Self {
        Self {
            info: PluginInfo::new(name, "1.0.0", "Mock plugin for testing", "Test Author", get_api_version()),
            declared: CapabilitySet::new(),
            implemented: CapabilitySet::new(),
            fail_initialize: None,
            fail_teardown: None,
            fail_content_changed: None,
            panic_declared_hooks: false,
            panic_toolbar_button: false,
            transform: None,
            extra_hooks: Vec::new(),
            button: Arc::new(ToolbarButton::new(
                format!("{name}-button"),
                "Mock",
                "Mock button",
                ButtonPosition::Left,
                || {},
            )),
            initialize_calls: AtomicUsize::new(0),
            teardown_calls: AtomicUsize::new(0),
            after_render_calls: AtomicUsize::new(0),
            seen_content: Mutex::new(Vec::new()),
            had_editor: AtomicBool::new(false),
            events: EventLog::default(),
        }
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.info.api_version = api_version;
        self
    }

    /// Declare and implement a capability
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.declared = self.declared.with(capability);
        self.implemented = self.implemented.with(capability);
        self
    }

    /// Declare a capability without implementing it
    pub fn declaring_only(mut self, capability: Capability) -> Self {
        self.declared = self.declared.with(capability);
        self
    }

    /// Implement a capability without declaring it
    pub fn implementing_only(mut self, capability: Capability) -> Self {
        self.implemented = self.implemented.with(capability);
        self
    }

    pub fn failing_initialize(mut self, failure: Failure) -> Self {
        self.fail_initialize = Some(failure);
        self
    }

    pub fn failing_teardown(mut self, failure: Failure) -> Self {
        self.fail_teardown = Some(failure);
        self
    }

    pub fn failing_content_changed(mut self, failure: Failure) -> Self {
        self.fail_content_changed = Some(failure);
        self
    }

    pub fn panicking_declared_hooks(mut self) -> Self {
        self.panic_declared_hooks = true;
        self
    }

    pub fn panicking_toolbar_button(mut self) -> Self {
        self.panic_toolbar_button = true;
        self.with_capability(Capability::ToolbarButton)
    }

    /// Preview enhancement applying `transform` in `before_render`
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self.with_capability(Capability::PreviewEnhancement)
    }

    pub fn with_extra_hook(mut self, hook: &str, callback: HookCallback) -> Self {
        self.extra_hooks.push((hook.to_string(), callback));
        self
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn button(&self) -> Arc<ToolbarButton> {
        Arc::clone(&self.button)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen_content.lock().unwrap().clone()
    }

    pub fn initialized(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn torn_down(&self) -> usize {
        self.teardown_calls.load(Ordering::SeqCst)
    }
}

impl Plugin for MockPlugin {
    fn plugin_info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn capabilities(&self) -> CapabilitySet {
        self.declared.clone()
    }

    fn initialize(
        &self,
        _manager: &PluginManager,
        editor: Option<Arc<dyn EditorAdapter>>,
    ) -> PluginResult<()> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        self.had_editor.store(editor.is_some(), Ordering::SeqCst);
        self.events.push(format!("{}:initialize", self.info.name));
        fail(self.fail_initialize, &self.info.name, "initialize")
    }

    fn teardown(&self, _manager: &PluginManager) -> PluginResult<()> {
        self.teardown_calls.fetch_add(1, Ordering::SeqCst);
        self.events.push(format!("{}:teardown", self.info.name));
        fail(self.fail_teardown, &self.info.name, "teardown")
    }

    fn declared_hooks(&self) -> Vec<(String, HookCallback)> {
        if self.panic_declared_hooks {
            panic!("mock panic in declared_hooks");
        }
        self.extra_hooks.clone()
    }

    fn as_toolbar_button(&self) -> Option<&dyn ToolbarButtonPlugin> {
        self.implemented
            .contains(Capability::ToolbarButton)
            .then_some(self as &dyn ToolbarButtonPlugin)
    }

    fn as_editor_state(&self) -> Option<&dyn EditorStatePlugin> {
        self.implemented
            .contains(Capability::EditorState)
            .then_some(self as &dyn EditorStatePlugin)
    }

    fn as_preview_enhancement(&self) -> Option<&dyn PreviewEnhancementPlugin> {
        self.implemented
            .contains(Capability::PreviewEnhancement)
            .then_some(self as &dyn PreviewEnhancementPlugin)
    }
}

impl ToolbarButtonPlugin for MockPlugin {
    fn toolbar_button(&self) -> Arc<ToolbarButton> {
        if self.panic_toolbar_button {
            panic!("mock panic in toolbar_button");
        }
        self.button()
    }
}

impl EditorStatePlugin for MockPlugin {
    fn on_content_changed(&self, content: &str) -> PluginResult<()> {
        fail(self.fail_content_changed, &self.info.name, "contentChanged")?;
        self.seen_content.lock().unwrap().push(content.to_string());
        self.events.push(format!("{}:content:{}", self.info.name, content));
        Ok(())
    }
}

impl PreviewEnhancementPlugin for MockPlugin {
    fn before_render(&self, content: &str) -> PluginResult<Option<String>> {
        Ok(self.transform.and_then(|transform| transform(content)))
    }

    fn after_render(&self, element: &mut PreviewElement) -> PluginResult<()> {
        self.after_render_calls.fetch_add(1, Ordering::SeqCst);
        let html = format!("{}<!-- {} -->", element.html(), self.info.name);
        element.set_html(html);
        Ok(())
    }
}

/// Diagram engine with scripted behavior
#[derive(Debug, Default)]
pub struct StaticEngine {
    load_error: Option<String>,
    render_error: Option<String>,
}

impl StaticEngine {
    pub fn failing(message: &str) -> Self {
        Self {
            load_error: None,
            render_error: Some(message.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            load_error: Some("not installed".to_string()),
            render_error: None,
        }
    }
}

#[async_trait]
impl DiagramEngine for StaticEngine {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<(), DiagramError> {
        match &self.load_error {
            Some(message) => Err(DiagramError::EngineUnavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn render(&self, id: &str, code: &str) -> Result<String, DiagramError> {
        match &self.render_error {
            Some(message) => Err(DiagramError::Render(message.clone())),
            None => Ok(format!("<svg data-id=\"{id}\">{code}</svg>")),
        }
    }
}

/// Diagram engine whose load blocks until released
#[derive(Debug, Default)]
pub struct GatedEngine {
    gate: tokio::sync::Notify,
    finished: AtomicBool,
}

impl GatedEngine {
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiagramEngine for GatedEngine {
    fn name(&self) -> &str {
        "gated"
    }

    async fn load(&self) -> Result<(), DiagramError> {
        self.gate.notified().await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn render(&self, id: &str, _code: &str) -> Result<String, DiagramError> {
        Ok(format!("<svg data-id=\"{id}\"></svg>"))
    }
}

/// Poll `condition` on the current runtime for up to two seconds
pub async fn wait_for(condition: impl Fn() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

//! Toolbar button inserting Mermaid diagram templates

use crate::core::version::get_api_version;
use crate::editor::api::{ButtonPosition, DialogOptions, EditorAdapter, ToolbarButton};
use crate::hooks::api::{Hook, HookHandle, HookPayload};
use crate::plugin::error::PluginResult;
use crate::plugin::manager::PluginManager;
use crate::plugin::traits::{Plugin, ToolbarButtonPlugin};
use crate::plugin::types::{Capability, CapabilitySet, PluginInfo};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const PLUGIN_NAME: &str = "diagram-toolbar-plugin";
pub const BUTTON_ID: &str = "insert-diagram";
const DIALOG_TITLE: &str = "Choose diagram type";

/// Diagram templates offered by the toolbar dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Class,
}

impl DiagramKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "Flowchart",
            DiagramKind::Sequence => "Sequence diagram",
            DiagramKind::Class => "Class diagram",
        }
    }

    /// Fenced mermaid block for this kind
    pub fn template(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => {
                "```mermaid\ngraph TD\n    A[Start] --> B{Decision};\n    B -->|Yes| C[Do something];\n    B -->|No| D[End];\n    C --> D;\n```"
            }
            DiagramKind::Sequence => {
                "```mermaid\nsequenceDiagram\n    participant A as User\n    participant B as System\n\n    A->>B: Request data\n    B->>B: Process request\n    B-->>A: Return result\n```"
            }
            DiagramKind::Class => {
                "```mermaid\nclassDiagram\n    class Animal {\n        +String name\n        +void speak()\n    }\n    class Dog {\n        +void bark()\n    }\n    Animal <|-- Dog\n```"
            }
        }
    }
}

/// What the click and select handlers need after initialization
#[derive(Default)]
struct ToolbarContext {
    editor: Mutex<Option<Arc<dyn EditorAdapter>>>,
    hooks: Mutex<Option<HookHandle>>,
}

impl ToolbarContext {
    fn editor(&self) -> MutexGuard<'_, Option<Arc<dyn EditorAdapter>>> {
        self.editor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn hooks(&self) -> MutexGuard<'_, Option<HookHandle>> {
        self.hooks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, hook: Hook, payload: HookPayload) {
        let handle = self.hooks().clone();
        match handle {
            Some(handle) => {
                handle.publish(hook, payload);
            }
            None => log::debug!("{} is not initialized; '{}' dropped", PLUGIN_NAME, hook),
        }
    }

    fn open_dialog(self: &Arc<Self>) {
        let context = Arc::downgrade(self);
        let dialog = DiagramKind::iter()
            .fold(DialogOptions::new(DIALOG_TITLE), |dialog, kind| {
                dialog.with_choice(kind.as_ref(), kind.label())
            })
            .on_select(move |key| on_choice(&context, key));
        self.publish(Hook::ShowDialog, HookPayload::Dialog(Arc::new(dialog)));
    }

    fn insert(&self, kind: DiagramKind) {
        let editor = self.editor().clone();
        match editor {
            Some(editor) => editor.insert_text(kind.template()),
            None => log::warn!("No editor attached; cannot insert {} template", kind),
        }
    }
}

fn on_choice(context: &Weak<ToolbarContext>, key: &str) {
    let Some(context) = context.upgrade() else {
        return;
    };
    match key.parse::<DiagramKind>() {
        Ok(kind) => context.insert(kind),
        Err(_) => log::warn!("Unknown diagram kind '{}'", key),
    }
    context.publish(Hook::HideDialog, HookPayload::Empty);
}

/// Toolbar plugin offering flowchart, sequence and class templates
pub struct DiagramToolbarPlugin {
    info: PluginInfo,
    context: Arc<ToolbarContext>,
    button: Arc<ToolbarButton>,
}

impl DiagramToolbarPlugin {
    pub fn new() -> Self {
        let context = Arc::new(ToolbarContext::default());
        let clicked = Arc::downgrade(&context);
        let button = ToolbarButton::new(
            BUTTON_ID,
            "DataAnalysis",
            "Insert diagram",
            ButtonPosition::Right,
            move || {
                if let Some(context) = clicked.upgrade() {
                    context.open_dialog();
                }
            },
        );
        Self {
            info: PluginInfo::new(
                PLUGIN_NAME,
                "1.0.0",
                "Toolbar button for inserting diagram templates",
                "QuickMD Team",
                get_api_version(),
            ),
            context,
            button: Arc::new(button),
        }
    }

    /// Insert a template directly, bypassing the dialog
    pub fn insert_template(&self, kind: DiagramKind) {
        self.context.insert(kind);
    }
}

impl Default for DiagramToolbarPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DiagramToolbarPlugin {
    fn plugin_info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new().with(Capability::ToolbarButton)
    }

    fn initialize(
        &self,
        manager: &PluginManager,
        editor: Option<Arc<dyn EditorAdapter>>,
    ) -> PluginResult<()> {
        if editor.is_none() {
            log::warn!("{} initialized without an editor", PLUGIN_NAME);
        }
        *self.context.editor() = editor;
        *self.context.hooks() = Some(manager.hooks().handle());
        Ok(())
    }

    fn teardown(&self, _manager: &PluginManager) -> PluginResult<()> {
        self.context.editor().take();
        self.context.hooks().take();
        Ok(())
    }

    fn as_toolbar_button(&self) -> Option<&dyn ToolbarButtonPlugin> {
        Some(self)
    }
}

impl ToolbarButtonPlugin for DiagramToolbarPlugin {
    fn toolbar_button(&self) -> Arc<ToolbarButton> {
        Arc::clone(&self.button)
    }
}

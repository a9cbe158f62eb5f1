//! Hook vocabulary
//!
//! The hook names shared by host and plugins, each with the dispatch mode it
//! is published with. New hook names need no code here: they can be declared
//! on a bus at runtime (see `HookBus::declare`).

use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// How subscribers of a hook are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Every subscriber gets the original payload; return values are ignored.
    #[default]
    Notify,
    /// Each subscriber may return a replacement that becomes the next
    /// subscriber's input. The last value is the publish result.
    Pipeline,
}

/// Hooks known to the host and the built-in plugins
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum Hook {
    /// Document text changed; payload is the new text.
    #[strum(serialize = "editor:contentChanged")]
    ContentChanged,
    /// A plugin contributes a toolbar button; payload is the descriptor.
    #[strum(serialize = "toolbar:addButton")]
    ToolbarAddButton,
    /// A plugin withdraws its toolbar button; payload is the descriptor.
    #[strum(serialize = "toolbar:removeButton")]
    ToolbarRemoveButton,
    /// Markdown about to be rendered; subscribers may rewrite it.
    #[strum(serialize = "preview:beforeRender")]
    PreviewBeforeRender,
    /// Preview element rendered; subscribers may decorate it in place.
    #[strum(serialize = "preview:afterRender")]
    PreviewAfterRender,
    /// Ask the host to show a dialog; payload is the dialog options.
    #[strum(serialize = "editor:showDialog")]
    ShowDialog,
    /// Ask the host to close the current dialog.
    #[strum(serialize = "editor:hideDialog")]
    HideDialog,
}

impl Hook {
    /// Wire name of this hook
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn dispatch_mode(self) -> DispatchMode {
        match self {
            Hook::PreviewBeforeRender => DispatchMode::Pipeline,
            Hook::ContentChanged
            | Hook::ToolbarAddButton
            | Hook::ToolbarRemoveButton
            | Hook::PreviewAfterRender
            | Hook::ShowDialog
            | Hook::HideDialog => DispatchMode::Notify,
        }
    }
}

//! Public API for the editor host adapter

pub use crate::editor::adapter::{DialogChoice, DialogOptions, EditorAdapter};
pub use crate::editor::document::DocumentEditor;
pub use crate::editor::preview::{
    shared_element, CmarkRenderer, MarkdownRenderer, PreviewElement, SharedElement,
};
pub use crate::editor::toolbar::{ButtonPosition, Toolbar, ToolbarButton};

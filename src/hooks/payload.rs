//! Hook payloads and callbacks

use crate::editor::api::{DialogOptions, SharedElement, ToolbarButton};
use crate::hooks::error::{HookError, HookResult};
use std::sync::Arc;

/// Value handed to hook subscribers
#[derive(Debug, Clone, Default)]
pub enum HookPayload {
    /// No argument (e.g. `editor:hideDialog`)
    #[default]
    Empty,
    /// Document or markdown text
    Text(String),
    /// Toolbar button descriptor
    Button(Arc<ToolbarButton>),
    /// Dialog request
    Dialog(Arc<DialogOptions>),
    /// Rendered preview, shared so subscribers can decorate it in place
    Element(SharedElement),
}

impl HookPayload {
    /// Short variant name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            HookPayload::Empty => "empty",
            HookPayload::Text(_) => "text",
            HookPayload::Button(_) => "button",
            HookPayload::Dialog(_) => "dialog",
            HookPayload::Element(_) => "element",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HookPayload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            HookPayload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Arc<ToolbarButton>> {
        match self {
            HookPayload::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_dialog(&self) -> Option<&Arc<DialogOptions>> {
        match self {
            HookPayload::Dialog(dialog) => Some(dialog),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&SharedElement> {
        match self {
            HookPayload::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text payload or an `UnexpectedPayload` error
    pub fn expect_text(&self) -> HookResult<&str> {
        self.as_text().ok_or(HookError::UnexpectedPayload {
            expected: "text",
            actual: self.kind(),
        })
    }

    pub fn expect_button(&self) -> HookResult<&Arc<ToolbarButton>> {
        self.as_button().ok_or(HookError::UnexpectedPayload {
            expected: "button",
            actual: self.kind(),
        })
    }

    pub fn expect_dialog(&self) -> HookResult<&Arc<DialogOptions>> {
        self.as_dialog().ok_or(HookError::UnexpectedPayload {
            expected: "dialog",
            actual: self.kind(),
        })
    }

    pub fn expect_element(&self) -> HookResult<&SharedElement> {
        self.as_element().ok_or(HookError::UnexpectedPayload {
            expected: "element",
            actual: self.kind(),
        })
    }
}

impl From<String> for HookPayload {
    fn from(text: String) -> Self {
        HookPayload::Text(text)
    }
}

impl From<&str> for HookPayload {
    fn from(text: &str) -> Self {
        HookPayload::Text(text.to_string())
    }
}

/// A subscriber callback.
///
/// `Ok(Some(value))` replaces the payload for the next subscriber of a
/// pipeline hook, `Ok(None)` leaves it unchanged. Notify hooks ignore the
/// returned value. Identity (for unsubscribing) is the `Arc` allocation.
pub type HookCallback =
    Arc<dyn Fn(&HookPayload) -> HookResult<Option<HookPayload>> + Send + Sync>;

/// Wrap a side-effect-only closure as a callback
pub fn notify_callback<F>(f: F) -> HookCallback
where
    F: Fn(&HookPayload) -> HookResult<()> + Send + Sync + 'static,
{
    Arc::new(move |payload| f(payload).map(|_| None))
}

/// Wrap a value-transforming closure as a callback
pub fn pipeline_callback<F>(f: F) -> HookCallback
where
    F: Fn(&HookPayload) -> HookResult<Option<HookPayload>> + Send + Sync + 'static,
{
    Arc::new(f)
}

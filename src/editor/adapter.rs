//! Core-to-host adapter contract

use std::sync::Arc;

/// What plugins may ask of the editor host
pub trait EditorAdapter: Send + Sync {
    /// Current document text
    fn content(&self) -> String;

    /// Replace the current selection with `text` and move the caret to the
    /// end of the inserted text
    fn insert_text(&self, text: &str);

    /// Show a modal dialog
    fn show_dialog(&self, options: Arc<DialogOptions>);

    /// Close the current dialog, if any
    fn hide_dialog(&self);
}

/// One selectable entry in a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogChoice {
    pub key: String,
    pub label: String,
}

type SelectHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Dialog request published on `editor:showDialog`
#[derive(Clone)]
pub struct DialogOptions {
    pub title: String,
    pub choices: Vec<DialogChoice>,
    on_select: Option<SelectHandler>,
}

impl std::fmt::Debug for DialogOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogOptions")
            .field("title", &self.title)
            .field("choices", &self.choices)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

impl DialogOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            choices: Vec::new(),
            on_select: None,
        }
    }

    pub fn with_choice(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.push(DialogChoice {
            key: key.into(),
            label: label.into(),
        });
        self
    }

    /// Handler invoked with the key of the chosen entry
    pub fn on_select<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(handler));
        self
    }

    /// Deliver a user choice. Returns false for keys the dialog does not offer.
    pub fn select(&self, key: &str) -> bool {
        if !self.choices.iter().any(|choice| choice.key == key) {
            log::debug!("Dialog '{}' has no choice '{}'", self.title, key);
            return false;
        }
        if let Some(handler) = &self.on_select {
            handler(key);
        }
        true
    }
}

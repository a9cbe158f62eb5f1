//! Rendered preview and the markdown renderer seam

use pulldown_cmark::{html, Options, Parser};
use std::sync::{Arc, Mutex};

/// Rendered preview content handed to `preview:afterRender` subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewElement {
    html: String,
}

/// Preview element shared between the host and notify subscribers
pub type SharedElement = Arc<Mutex<PreviewElement>>;

/// Wrap an element for publishing
pub fn shared_element(element: PreviewElement) -> SharedElement {
    Arc::new(Mutex::new(element))
}

impl PreviewElement {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

/// Markdown-to-HTML conversion used by the host between the two preview hooks
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer with tables, strikethrough and task lists
#[derive(Debug, Clone, Copy)]
pub struct CmarkRenderer {
    options: Options,
}

impl CmarkRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

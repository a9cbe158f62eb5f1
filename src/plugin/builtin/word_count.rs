//! Live word, character and line counts for the document

use crate::core::version::get_api_version;
use crate::editor::api::EditorAdapter;
use crate::plugin::error::PluginResult;
use crate::plugin::manager::PluginManager;
use crate::plugin::traits::{EditorStatePlugin, Plugin};
use crate::plugin::types::{Capability, CapabilitySet, PluginInfo};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use unicode_segmentation::UnicodeSegmentation;

pub const PLUGIN_NAME: &str = "word-count-plugin";

/// Counts for one version of the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Whitespace-separated tokens
    pub words: usize,
    /// Grapheme clusters
    pub characters: usize,
    /// Newline-separated segments; zero for an empty document
    pub lines: usize,
}

impl DocumentStats {
    pub fn compute(content: &str) -> Self {
        if content.is_empty() {
            return Self::default();
        }
        Self {
            words: content.split_whitespace().count(),
            characters: content.graphemes(true).count(),
            lines: content.split('\n').count(),
        }
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} words, {} characters, {} lines",
            self.words, self.characters, self.lines
        )
    }
}

/// Editor-state plugin keeping [`DocumentStats`] current
pub struct WordCountPlugin {
    info: PluginInfo,
    stats: RwLock<DocumentStats>,
    updates: AtomicUsize,
}

impl WordCountPlugin {
    pub fn new() -> Self {
        Self {
            info: PluginInfo::new(
                PLUGIN_NAME,
                "1.0.0",
                "Live word, character and line counts for the document",
                "QuickMD Team",
                get_api_version(),
            ),
            stats: RwLock::new(DocumentStats::default()),
            updates: AtomicUsize::new(0),
        }
    }

    /// Most recent counts
    pub fn stats(&self) -> DocumentStats {
        *self.stats.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of content changes observed since initialization
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }

    fn store(&self, stats: DocumentStats) {
        *self.stats.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = stats;
    }
}

impl Default for WordCountPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for WordCountPlugin {
    fn plugin_info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new().with(Capability::EditorState)
    }

    fn initialize(
        &self,
        _manager: &PluginManager,
        editor: Option<Arc<dyn EditorAdapter>>,
    ) -> PluginResult<()> {
        let stats = editor
            .map(|editor| DocumentStats::compute(&editor.content()))
            .unwrap_or_default();
        log::debug!("Word count initialized: {}", stats);
        self.store(stats);
        self.updates.store(0, Ordering::Relaxed);
        Ok(())
    }

    fn teardown(&self, _manager: &PluginManager) -> PluginResult<()> {
        self.store(DocumentStats::default());
        Ok(())
    }

    fn as_editor_state(&self) -> Option<&dyn EditorStatePlugin> {
        Some(self)
    }
}

impl EditorStatePlugin for WordCountPlugin {
    fn on_content_changed(&self, content: &str) -> PluginResult<()> {
        let stats = DocumentStats::compute(content);
        log::trace!("Document stats: {}", stats);
        self.store(stats);
        self.updates.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

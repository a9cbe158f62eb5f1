//! In-memory document editor
//!
//! A text buffer with a selection and a dialog slot. It implements
//! [`EditorAdapter`] for plugins and publishes `editor:contentChanged` on the
//! attached hook bus after every mutation.

use crate::editor::adapter::{DialogOptions, EditorAdapter};
use crate::hooks::api::{Hook, HookHandle, HookPayload};
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct Buffer {
    text: String,
    /// Selection in character indices; empty range is a caret
    selection: Range<usize>,
}

impl Buffer {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

/// Editor host backed by a string buffer
#[derive(Debug)]
pub struct DocumentEditor {
    buffer: Mutex<Buffer>,
    dialog: Mutex<Option<Arc<DialogOptions>>>,
    notifier: Mutex<HookHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DocumentEditor {
    /// Create an editor with the caret at the end of `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            buffer: Mutex::new(Buffer {
                text,
                selection: end..end,
            }),
            dialog: Mutex::new(None),
            notifier: Mutex::new(HookHandle::detached()),
        }
    }

    /// Publish content changes on this bus from now on
    pub fn attach(&self, notifier: HookHandle) {
        *lock(&self.notifier) = notifier;
    }

    /// Replace the whole document; the caret moves to the end
    pub fn set_content(&self, text: impl Into<String>) {
        let snapshot = {
            let mut buffer = lock(&self.buffer);
            buffer.text = text.into();
            let end = buffer.char_len();
            buffer.selection = end..end;
            buffer.text.clone()
        };
        self.notify_changed(snapshot);
    }

    /// Select a character range; bounds are clamped and ordered
    pub fn select(&self, start: usize, end: usize) {
        let mut buffer = lock(&self.buffer);
        let len = buffer.char_len();
        let (start, end) = (start.min(len), end.min(len));
        buffer.selection = start.min(end)..start.max(end);
    }

    /// Collapse the selection to a caret
    pub fn set_cursor(&self, position: usize) {
        self.select(position, position);
    }

    /// Current selection as character indices
    pub fn selection(&self) -> Range<usize> {
        lock(&self.buffer).selection.clone()
    }

    pub fn caret(&self) -> usize {
        lock(&self.buffer).selection.end
    }

    /// Dialog currently shown, if any
    pub fn current_dialog(&self) -> Option<Arc<DialogOptions>> {
        lock(&self.dialog).clone()
    }

    /// Deliver a user choice to the current dialog.
    ///
    /// Returns false when no dialog is open or the key is not offered.
    pub fn choose(&self, key: &str) -> bool {
        match self.current_dialog() {
            Some(dialog) => dialog.select(key),
            None => {
                log::debug!("No dialog open for choice '{}'", key);
                false
            }
        }
    }

    fn notify_changed(&self, content: String) {
        let notifier = lock(&self.notifier).clone();
        notifier.publish(Hook::ContentChanged, HookPayload::Text(content));
    }
}

impl Default for DocumentEditor {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl EditorAdapter for DocumentEditor {
    fn content(&self) -> String {
        lock(&self.buffer).text.clone()
    }

    fn insert_text(&self, text: &str) {
        let snapshot = {
            let mut buffer = lock(&self.buffer);
            let Range { start, end } = buffer.selection.clone();
            let (start_byte, end_byte) = (buffer.byte_offset(start), buffer.byte_offset(end));
            buffer.text.replace_range(start_byte..end_byte, text);
            let caret = start + text.chars().count();
            buffer.selection = caret..caret;
            buffer.text.clone()
        };
        log::trace!("Inserted {} bytes into document", text.len());
        self.notify_changed(snapshot);
    }

    fn show_dialog(&self, options: Arc<DialogOptions>) {
        log::debug!("Showing dialog '{}'", options.title);
        *lock(&self.dialog) = Some(options);
    }

    fn hide_dialog(&self) {
        if lock(&self.dialog).take().is_some() {
            log::debug!("Dialog closed");
        }
    }
}

//! Toolbar button descriptors and the host toolbar model

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use strum_macros::{Display, EnumString};

/// Side of the toolbar a button is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ButtonPosition {
    #[default]
    Left,
    Right,
}

type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Button a plugin contributes to the toolbar.
///
/// `id` is the stable identity: the host adds and removes buttons by id,
/// since click handlers cannot be compared.
#[derive(Clone)]
pub struct ToolbarButton {
    pub id: String,
    pub icon: String,
    pub tooltip: String,
    pub position: ButtonPosition,
    on_click: ClickHandler,
}

impl std::fmt::Debug for ToolbarButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarButton")
            .field("id", &self.id)
            .field("icon", &self.icon)
            .field("tooltip", &self.tooltip)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl ToolbarButton {
    pub fn new<F>(
        id: impl Into<String>,
        icon: impl Into<String>,
        tooltip: impl Into<String>,
        position: ButtonPosition,
        on_click: F,
    ) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            icon: icon.into(),
            tooltip: tooltip.into(),
            position,
            on_click: Arc::new(on_click),
        }
    }

    pub fn click(&self) {
        (self.on_click)();
    }
}

/// Host-side toolbar assembled from `toolbar:addButton`/`toolbar:removeButton`
#[derive(Debug, Default)]
pub struct Toolbar {
    buttons: RwLock<Vec<Arc<ToolbarButton>>>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<ToolbarButton>>> {
        self.buttons.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<ToolbarButton>>> {
        self.buttons.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a button; a second button with the same id is ignored
    pub fn add(&self, button: Arc<ToolbarButton>) -> bool {
        let mut buttons = self.write();
        if buttons.iter().any(|existing| existing.id == button.id) {
            log::warn!("Toolbar button '{}' is already present", button.id);
            return false;
        }
        log::debug!("Toolbar button '{}' added ({})", button.id, button.position);
        buttons.push(button);
        true
    }

    /// Remove the button with this id
    pub fn remove(&self, id: &str) -> bool {
        let mut buttons = self.write();
        let before = buttons.len();
        buttons.retain(|button| button.id != id);
        let removed = buttons.len() != before;
        if removed {
            log::debug!("Toolbar button '{}' removed", id);
        }
        removed
    }

    /// All buttons in insertion order
    pub fn buttons(&self) -> Vec<Arc<ToolbarButton>> {
        self.read().clone()
    }

    pub fn buttons_at(&self, position: ButtonPosition) -> Vec<Arc<ToolbarButton>> {
        self.read()
            .iter()
            .filter(|button| button.position == position)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<ToolbarButton>> {
        self.read().iter().find(|button| button.id == id).cloned()
    }

    /// Run the click handler of the button with this id
    pub fn click(&self, id: &str) -> bool {
        // Handler runs without the toolbar lock; it may publish toolbar hooks.
        match self.get(id) {
            Some(button) => {
                button.click();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

//! Editor Host Adapter
//!
//! The narrow surface between the plugin core and the editor UI: what
//! plugins may ask of the host (insert text, show/hide dialogs) and the host
//! models fed by hooks (toolbar, rendered preview).

// Internal modules - all access should go through api module
pub(crate) mod adapter;
pub(crate) mod document;
pub(crate) mod preview;
pub(crate) mod toolbar;

// Public API module - the only public interface for the editor host
pub mod api;

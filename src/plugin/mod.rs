//! Plugin System Module
//!
//! Named plugins with optional capabilities (toolbar button, editor state,
//! preview enhancement) registered against a hook bus. Registration checks
//! API compatibility and capabilities, initializes the plugin and subscribes
//! its hooks; unregistration reverses every step.

// Internal modules - all access should go through api module
pub(crate) mod builtin;
pub(crate) mod error;
pub(crate) mod manager;
pub(crate) mod registry;
pub(crate) mod settings;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the plugin system
pub mod api;

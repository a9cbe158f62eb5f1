//! Built-in Plugin Implementations
//!
//! Plugins that ship with the host. The catalog in [`api`] lists them in
//! registration order.

pub mod api;
pub mod diagram;
pub mod diagram_toolbar;
pub mod word_count;

pub mod app;
pub mod core;
pub mod editor;
pub mod hooks;
pub mod plugin;

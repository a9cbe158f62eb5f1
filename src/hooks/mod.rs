//! Hook Bus
//!
//! Named extension points connecting host-side events to plugin callbacks.
//! Each hook name has one explicit dispatch mode: notify (side effects only)
//! or pipeline (each callback may replace the value handed to the next one).

// Internal modules - all access should go through api module
pub(crate) mod bus;
pub(crate) mod error;
pub(crate) mod names;
pub(crate) mod payload;

// Public API module - the only public interface for the hook system
pub mod api;

#[cfg(test)]
mod tests;

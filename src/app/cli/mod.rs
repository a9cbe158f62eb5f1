//! Command-line surface of the quickmd binary

pub mod args;
pub mod commands;
pub mod display;
pub mod error;

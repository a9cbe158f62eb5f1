//! Application host: editor session and command-line entry point

pub mod cli;
pub mod session;
pub mod startup;

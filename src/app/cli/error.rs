//! Errors surfaced by CLI commands

use crate::core::error_handling::ContextualError;
use crate::plugin::api::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Plugin '{name}' is disabled; enable it with `quickmd plugins enable {name}`")]
    PluginDisabled { name: String },

    #[error("Output formatting failed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CommandError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CommandError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CommandError::Write {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Read { .. } | CommandError::Write { .. } => 3,
            CommandError::Settings(_) | CommandError::PluginDisabled { .. } => 2,
            CommandError::Format(_) | CommandError::Runtime(_) => 1,
        }
    }
}

impl ContextualError for CommandError {
    fn is_user_actionable(&self) -> bool {
        match self {
            CommandError::Settings(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            CommandError::Settings(e) => e.user_message(),
            _ => None,
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

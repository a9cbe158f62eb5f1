//! Hook Error Types

use std::any::Any;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HookError {
    #[error("unexpected payload: expected {expected}, got {actual}")]
    UnexpectedPayload {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("callback failed: {message}")]
    Callback { message: String },

    #[error("callback panicked: {message}")]
    Panicked { message: String },
}

/// Result type for hook callbacks
pub type HookResult<T> = Result<T, HookError>;

impl HookError {
    pub fn callback(message: impl Into<String>) -> Self {
        HookError::Callback {
            message: message.into(),
        }
    }
}

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

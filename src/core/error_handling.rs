//! Generic error handling utilities
//!
//! Lets the command-line host report failures from any subsystem with the
//! right amount of detail.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// True if the error carries a message the user can act on directly
    /// (unknown plugin name, malformed configuration file, bad argument).
    fn is_user_actionable(&self) -> bool;

    /// The user-facing message for actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log an error with detail matched to who can fix it
///
/// User-actionable errors log their own message; system errors log the
/// operation context. Full detail always goes to debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Message to print on stderr for a failed command
pub fn describe_for_user<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => user_msg.to_string(),
        None => format!("{operation_context}: {error}"),
    }
}

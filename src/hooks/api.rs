//! Public API for the hook system
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::hooks::bus::{HookBus, HookHandle};
pub use crate::hooks::error::{HookError, HookResult};
pub use crate::hooks::names::{DispatchMode, Hook};
pub use crate::hooks::payload::{notify_callback, pipeline_callback, HookCallback, HookPayload};

//! HookBus implementation

use crate::hooks::error::{panic_message, HookError, HookResult};
use crate::hooks::names::{DispatchMode, Hook};
use crate::hooks::payload::{HookCallback, HookPayload};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use strum::IntoEnumIterator;

/// One entry in a hook's subscriber list
#[derive(Clone)]
struct Subscriber {
    callback: HookCallback,
    owner: Option<String>,
    /// Cleared on unsubscribe so in-flight snapshots skip the entry
    active: Arc<AtomicBool>,
}

impl Subscriber {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or("host")
    }
}

struct BusState {
    subscribers: HashMap<String, Vec<Subscriber>>,
    modes: HashMap<String, DispatchMode>,
}

impl BusState {
    fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            modes: Hook::iter()
                .map(|hook| (hook.name().to_string(), hook.dispatch_mode()))
                .collect(),
        }
    }

    fn mode_of(&self, hook: &str) -> DispatchMode {
        self.modes.get(hook).copied().unwrap_or_default()
    }
}

/// Publish/subscribe registry keyed by hook name.
///
/// Cloning yields another handle to the same bus. Dispatch iterates over a
/// snapshot of the subscriber list and holds no lock while callbacks run, so
/// callbacks may publish other hooks or (un)subscribe freely.
#[derive(Clone)]
pub struct HookBus {
    inner: Arc<RwLock<BusState>>,
}

impl std::fmt::Debug for HookBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        let counts: HashMap<&str, usize> = state
            .subscribers
            .iter()
            .map(|(hook, subs)| (hook.as_str(), subs.len()))
            .collect();
        f.debug_struct("HookBus").field("subscribers", &counts).finish()
    }
}

impl HookBus {
    /// Create a bus that knows the built-in hook vocabulary
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BusState::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BusState> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BusState> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Declare (or re-declare) the dispatch mode of a hook name
    pub fn declare(&self, hook: impl AsRef<str>, mode: DispatchMode) {
        let hook = hook.as_ref();
        log::debug!("Declaring hook '{}' as {:?}", hook, mode);
        self.write().modes.insert(hook.to_string(), mode);
    }

    /// Dispatch mode of a hook name; undeclared names notify
    pub fn dispatch_mode(&self, hook: impl AsRef<str>) -> DispatchMode {
        self.read().mode_of(hook.as_ref())
    }

    /// Append a host-owned callback to the hook's subscriber list
    pub fn subscribe(&self, hook: impl AsRef<str>, callback: HookCallback) {
        self.insert(hook.as_ref(), callback, None);
    }

    /// Append a callback owned by the named plugin
    pub fn subscribe_as(&self, hook: impl AsRef<str>, callback: HookCallback, owner: &str) {
        self.insert(hook.as_ref(), callback, Some(owner.to_string()));
    }

    fn insert(&self, hook: &str, callback: HookCallback, owner: Option<String>) {
        log::trace!(
            "Subscribing {} to hook '{}'",
            owner.as_deref().unwrap_or("host"),
            hook
        );
        self.write()
            .subscribers
            .entry(hook.to_string())
            .or_default()
            .push(Subscriber {
                callback,
                owner,
                active: Arc::new(AtomicBool::new(true)),
            });
    }

    /// Remove the first subscription of this exact callback.
    ///
    /// Returns false when the callback was not subscribed to the hook.
    pub fn unsubscribe(&self, hook: impl AsRef<str>, callback: &HookCallback) -> bool {
        let hook = hook.as_ref();
        let mut state = self.write();
        let Some(subscribers) = state.subscribers.get_mut(hook) else {
            return false;
        };
        let Some(index) = subscribers
            .iter()
            .position(|sub| std::ptr::addr_eq(Arc::as_ptr(&sub.callback), Arc::as_ptr(callback)))
        else {
            return false;
        };

        let removed = subscribers.remove(index);
        removed.active.store(false, Ordering::Release);
        if subscribers.is_empty() {
            state.subscribers.remove(hook);
        }
        log::trace!("Unsubscribed {} from hook '{}'", removed.owner(), hook);
        true
    }

    /// Number of callbacks currently subscribed to a hook
    pub fn subscriber_count(&self, hook: impl AsRef<str>) -> usize {
        self.read()
            .subscribers
            .get(hook.as_ref())
            .map_or(0, Vec::len)
    }

    /// Hook names with at least one subscriber, sorted
    pub fn hook_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().subscribers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke every subscriber of `hook` in registration order.
    ///
    /// Notify hooks return `payload` unchanged. Pipeline hooks return the
    /// last replacement produced by a subscriber, or `payload` if none
    /// replaced it. A failing or panicking subscriber is logged and skipped;
    /// it never stops the dispatch.
    pub fn publish(&self, hook: impl AsRef<str>, payload: HookPayload) -> HookPayload {
        let hook = hook.as_ref();
        let (mode, snapshot) = {
            let state = self.read();
            (
                state.mode_of(hook),
                state.subscribers.get(hook).cloned().unwrap_or_default(),
            )
        };

        if snapshot.is_empty() {
            log::trace!("No subscribers for hook '{}'", hook);
            return payload;
        }
        log::trace!(
            "Publishing hook '{}' ({:?}) to {} subscribers",
            hook,
            mode,
            snapshot.len()
        );

        match mode {
            DispatchMode::Notify => {
                for subscriber in snapshot.iter().filter(|sub| sub.is_active()) {
                    let _ = invoke(hook, subscriber, &payload);
                }
                payload
            }
            DispatchMode::Pipeline => {
                let mut current = payload;
                for subscriber in &snapshot {
                    if !subscriber.is_active() {
                        continue;
                    }
                    if let Some(next) = invoke(hook, subscriber, &current) {
                        current = next;
                    }
                }
                current
            }
        }
    }

    /// Weak handle for publishing without keeping the bus alive
    pub fn handle(&self) -> HookHandle {
        HookHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for HookBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one callback, turning a panic into [`HookError::Panicked`]
pub(crate) fn call_contained(
    callback: &HookCallback,
    payload: &HookPayload,
) -> HookResult<Option<HookPayload>> {
    panic::catch_unwind(AssertUnwindSafe(|| callback(payload))).unwrap_or_else(|panic| {
        Err(HookError::Panicked {
            message: panic_message(panic.as_ref()),
        })
    })
}

fn invoke(hook: &str, subscriber: &Subscriber, payload: &HookPayload) -> Option<HookPayload> {
    match call_contained(&subscriber.callback, payload) {
        Ok(result) => result,
        Err(error) => {
            log::error!(
                "Error in hook {} (subscriber: {}): {}",
                hook,
                subscriber.owner(),
                error
            );
            None
        }
    }
}

/// Non-owning reference to a [`HookBus`].
///
/// Plugins keep one of these inside callbacks they hand to the host, which
/// would otherwise form a reference cycle through the bus.
#[derive(Clone)]
pub struct HookHandle {
    inner: Weak<RwLock<BusState>>,
}

impl std::fmt::Debug for HookHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl HookHandle {
    /// A handle that is not attached to any bus
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn upgrade(&self) -> Option<HookBus> {
        self.inner.upgrade().map(|inner| HookBus { inner })
    }

    /// Publish through the bus if it still exists; otherwise return `payload`
    pub fn publish(&self, hook: impl AsRef<str>, payload: HookPayload) -> HookPayload {
        match self.upgrade() {
            Some(bus) => bus.publish(hook, payload),
            None => {
                log::debug!("Dropping hook '{}': bus is gone", hook.as_ref());
                payload
            }
        }
    }
}

//! # Callback Dispatcher
//!
//! Fans host key presses and intents out to every registered playback
//! controller. One dispatcher exists per package and is shared by all views.
//!
//! ## Semantics
//!
//! - Key and intent handlers live in two independent sets.
//! - `dispatch_*` calls every live handler and ORs the results. Evaluation
//!   never short-circuits, so every view observes every event.
//! - Registration is idempotent by handler identity (the `Arc` allocation).
//! - Only weak references are stored. A controller that is dropped without
//!   unregistering simply disappears from the set.
//! - Handlers run outside the lock and may register or unregister handlers
//!   themselves.
//!
//! No ordering between handlers is guaranteed.

use bridge_traits::{HostIntent, KeyEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Returns `true` when the key press was consumed.
pub type KeyHandler = Arc<dyn Fn(&KeyEvent) -> bool + Send + Sync>;

/// Returns `true` when the intent was consumed.
pub type IntentHandler = Arc<dyn Fn(&HostIntent) -> bool + Send + Sync>;

type HandlerKey = usize;

fn handler_key<T: ?Sized>(handler: &Arc<T>) -> HandlerKey {
    Arc::as_ptr(handler) as *const () as usize
}

/// Weak handler set keyed by allocation identity.
struct HandlerSet<T: ?Sized> {
    handlers: Mutex<HashMap<HandlerKey, Weak<T>>>,
}

impl<T: ?Sized> HandlerSet<T> {
    fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
        }
    }

    fn add(&self, handler: &Arc<T>) {
        self.handlers
            .lock()
            .insert(handler_key(handler), Arc::downgrade(handler));
    }

    fn remove(&self, handler: &Arc<T>) {
        self.handlers.lock().remove(&handler_key(handler));
    }

    /// Upgrade every live handler and prune the dead ones.
    fn snapshot(&self) -> Vec<Arc<T>> {
        let mut handlers = self.handlers.lock();
        handlers.retain(|_, weak| weak.strong_count() > 0);
        handlers.values().filter_map(Weak::upgrade).collect()
    }

    fn len(&self) -> usize {
        self.handlers
            .lock()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

pub struct CallbackDispatcher {
    key_handlers: HandlerSet<dyn Fn(&KeyEvent) -> bool + Send + Sync>,
    intent_handlers: HandlerSet<dyn Fn(&HostIntent) -> bool + Send + Sync>,
}

impl CallbackDispatcher {
    pub fn new() -> Self {
        Self {
            key_handlers: HandlerSet::new(),
            intent_handlers: HandlerSet::new(),
        }
    }

    pub fn add_key_handler(&self, handler: &KeyHandler) {
        self.key_handlers.add(handler);
    }

    pub fn remove_key_handler(&self, handler: &KeyHandler) {
        self.key_handlers.remove(handler);
    }

    pub fn add_intent_handler(&self, handler: &IntentHandler) {
        self.intent_handlers.add(handler);
    }

    pub fn remove_intent_handler(&self, handler: &IntentHandler) {
        self.intent_handlers.remove(handler);
    }

    /// Deliver a key press to every handler. Returns `true` if any handled it.
    pub fn dispatch_key_down(&self, event: &KeyEvent) -> bool {
        let handled = self
            .key_handlers
            .snapshot()
            .iter()
            .fold(false, |handled, handler| handler(event) | handled);

        trace!(code = ?event.code, handled, "Key dispatched");
        handled
    }

    /// Deliver an intent to every handler. Returns `true` if any handled it.
    pub fn dispatch_intent(&self, intent: &HostIntent) -> bool {
        let handled = self
            .intent_handlers
            .snapshot()
            .iter()
            .fold(false, |handled, handler| handler(intent) | handled);

        trace!(action = intent.action(), handled, "Intent dispatched");
        handled
    }

    pub fn key_handler_count(&self) -> usize {
        self.key_handlers.len()
    }

    pub fn intent_handler_count(&self) -> usize {
        self.intent_handlers.len()
    }
}

impl Default for CallbackDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("key_handlers", &self.key_handler_count())
            .field("intent_handlers", &self.intent_handler_count())
            .finish()
    }
}

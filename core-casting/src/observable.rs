//! Shared observable value.
//!
//! A single slot of state that notifies subscribers synchronously whenever the
//! stored value actually changes. The selected renderer is the one instance
//! the package creates; every playback controller and the casting module
//! subscribe to it.

use bridge_traits::RendererItem;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observer callback. Invoked on the thread that called [`Observable::set`].
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Currently selected cast target; `None` means local playback.
pub type SelectedRenderer = Observable<Option<RendererItem>>;

pub struct Observable<T> {
    value: Mutex<T>,
    observers: Mutex<Vec<(SubscriptionId, Observer<T>)>>,
    next_id: AtomicU64,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq,
{
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn get(&self) -> T {
        self.value.lock().clone()
    }

    /// Store `value` and notify observers if it differs from the current one.
    ///
    /// Returns `true` when observers were notified. Observers run after both
    /// locks are released, so they may read or set the slot again.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.lock();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }

        let observers: Vec<Observer<T>> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(&value);
        }
        true
    }

    /// Register an observer. It is not called with the current value.
    pub fn subscribe(&self, observer: Observer<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.lock().push((id, observer));
        id
    }

    /// Remove an observer. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.lock().retain(|(existing, _)| *existing != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.lock().len()
    }
}

impl<T: Default + Clone + PartialEq> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.lock())
            .field("subscribers", &self.observers.lock().len())
            .finish()
    }
}

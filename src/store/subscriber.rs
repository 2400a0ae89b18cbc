//! Subscribers, subscription handles, and sub-state filtering.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

/// A listener called any time the state changes.
pub trait Subscriber<S>: Send + Sync {
    fn on_state_changed(&self, state: &S);
}

impl<S, F> Subscriber<S> for F
where
    F: Fn(&S) + Send + Sync,
{
    fn on_state_changed(&self, state: &S) {
        self(state)
    }
}

type Entry<S> = (u64, Arc<dyn Subscriber<S>>);

/// Insertion-ordered subscriber registry.
///
/// Notification passes iterate over a snapshot, so subscribing or
/// unsubscribing while a pass is running never affects that pass.
pub struct SubscriberList<S> {
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry<S>>>,
}

impl<S: 'static> SubscriberList<S> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(0),
            entries: RwLock::new(Vec::new()),
        })
    }

    /// Append a subscriber and return the handle that detaches it.
    pub fn add(self: &Arc<Self>, subscriber: Arc<dyn Subscriber<S>>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().push((id, subscriber));

        let list: Weak<Self> = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.remove(id);
            }
        })
    }

    fn remove(&self, id: u64) {
        self.entries.write().retain(|(entry_id, _)| *entry_id != id);
    }

    /// Current subscribers in registration order.
    pub fn snapshot(&self) -> Vec<Arc<dyn Subscriber<S>>> {
        self.entries
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// A reference to a registered subscriber that allows unsubscription.
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    detach: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Mutex::new(Some(Box::new(detach))),
        }
    }

    /// Unsubscribe the subscriber from the store. Calling this twice is a no-op.
    pub fn unsubscribe(&self) {
        let detach = self.detach.lock().take();
        if let Some(detach) = detach {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.lock().is_some())
            .finish()
    }
}

/// A subscriber that only forwards when a projected sub-state changes.
///
/// The first state seen is always forwarded.
pub struct PartialSubscriber<S, T, P, L> {
    project: P,
    listener: L,
    previous: Mutex<Option<T>>,
    _state: std::marker::PhantomData<fn(&S)>,
}

impl<S, T, P, L> PartialSubscriber<S, T, P, L>
where
    T: PartialEq + Clone + Send,
    P: Fn(&S) -> T + Send + Sync,
    L: Fn(&T) + Send + Sync,
{
    pub fn new(project: P, listener: L) -> Self {
        Self {
            project,
            listener,
            previous: Mutex::new(None),
            _state: std::marker::PhantomData,
        }
    }
}

impl<S, T, P, L> Subscriber<S> for PartialSubscriber<S, T, P, L>
where
    T: PartialEq + Clone + Send,
    P: Fn(&S) -> T + Send + Sync,
    L: Fn(&T) + Send + Sync,
{
    fn on_state_changed(&self, state: &S) {
        let sub_state = (self.project)(state);
        {
            let mut previous = self.previous.lock();
            if previous.as_ref() == Some(&sub_state) {
                return;
            }
            *previous = Some(sub_state.clone());
        }
        (self.listener)(&sub_state);
    }
}

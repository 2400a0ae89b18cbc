//! The base store: single-writer reducer application and subscriber
//! notification.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::{fatal_error_sink, ErrorSink, StoreError};
use super::executor::{Executor, ImmediateExecutor};
use super::subscriber::{Subscriber, SubscriberList, Subscription};
use super::{Action, Dispatcher, SharedReducer, SharedStore, State, Store};
use crate::enhancers::StoreCreator;

/// Base implementation of [`Store`].
///
/// Only one reducer application runs at a time. A dispatch that arrives while
/// another one holds the guard is dropped, not queued: callers that need
/// delivery guarantees wrap the store with the async dispatch enhancer.
pub struct BaseStore<S, A> {
    state: RwLock<S>,
    reducer: RwLock<SharedReducer<S, A>>,
    subscribers: Arc<SubscriberList<S>>,
    is_reducing: AtomicBool,
    notifier: Arc<dyn Executor>,
    on_error: ErrorSink,
}

impl<S: State, A: Action> BaseStore<S, A> {
    /// Store that notifies inline and treats reducer failures as fatal.
    pub fn new(initial_state: S, reducer: SharedReducer<S, A>) -> Self {
        Self::with_notifier(
            initial_state,
            reducer,
            Arc::new(ImmediateExecutor),
            fatal_error_sink(),
        )
    }

    /// Store that delivers notifications and reducer failures on `notifier`.
    pub fn with_notifier(
        initial_state: S,
        reducer: SharedReducer<S, A>,
        notifier: Arc<dyn Executor>,
        on_error: ErrorSink,
    ) -> Self {
        Self {
            state: RwLock::new(initial_state),
            reducer: RwLock::new(reducer),
            subscribers: SubscriberList::new(),
            is_reducing: AtomicBool::new(false),
            notifier,
            on_error,
        }
    }

    /// Creator for plain base stores.
    pub fn creator() -> StoreCreator<S, A> {
        Box::new(|initial_state, reducer| {
            Arc::new(Self::new(initial_state, reducer)) as SharedStore<S, A>
        })
    }

    /// Creator for base stores bound to a notification executor and error sink.
    pub fn creator_with(notifier: Arc<dyn Executor>, on_error: ErrorSink) -> StoreCreator<S, A> {
        Box::new(move |initial_state, reducer| {
            Arc::new(Self::with_notifier(initial_state, reducer, notifier, on_error))
                as SharedStore<S, A>
        })
    }

    /// Whether a reducer application is in progress.
    pub fn is_reducing(&self) -> bool {
        self.is_reducing.load(Ordering::Acquire)
    }

    fn notify(&self, state: S) {
        let snapshot = Arc::new(state);
        for subscriber in self.subscribers.snapshot() {
            let snapshot = Arc::clone(&snapshot);
            self.notifier
                .execute(Box::new(move || subscriber.on_state_changed(&snapshot)));
        }
    }

    fn report(&self, err: StoreError) {
        let on_error = Arc::clone(&self.on_error);
        self.notifier.execute(Box::new(move || on_error(err)));
    }
}

impl<S: State, A: Action> Dispatcher<A> for BaseStore<S, A> {
    fn dispatch(&self, action: A) {
        if self
            .is_reducing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::trace!(?action, "Reducer busy, action dropped");
            return;
        }
        let _release = scopeguard::guard((), |_| {
            self.is_reducing.store(false, Ordering::Release);
        });

        let reducer = Arc::clone(&*self.reducer.read());
        let previous = self.state.read().clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            reducer.reduce(previous.clone(), &action)
        }));

        match outcome {
            Ok(next) if next == previous => {}
            Ok(next) => {
                *self.state.write() = next.clone();
                self.notify(next);
            }
            Err(payload) => {
                let err = StoreError::from_panic(payload);
                tracing::warn!(error = %err, ?action, "Reducer panicked");
                self.report(err);
            }
        }
    }
}

impl<S: State, A: Action> Store<S, A> for BaseStore<S, A> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<S>>) -> Subscription {
        self.subscribers.add(subscriber)
    }

    fn get_state(&self) -> S {
        self.state.read().clone()
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        *self.reducer.write() = reducer;
    }
}

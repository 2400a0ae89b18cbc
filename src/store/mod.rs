//! Unidirectional data flow primitives.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Middleware ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                                                 │
//!    └─────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot of the application state tree
//! - **Action**: user actions, system events, or internal commands
//! - **Reducer**: pure function that transforms state based on actions
//! - **Store**: owns the state, serializes reducer application, notifies
//!   subscribers

mod action;
mod base;
mod error;
mod executor;
mod reducer;
mod state;
mod subscriber;

use std::sync::Arc;

pub use action::Action;
pub use base::BaseStore;
pub use error::{fatal_error_sink, ErrorSink, StoreError};
pub use executor::{Executor, ImmediateExecutor, QueueExecutor, Task, WorkerExecutor};
pub use reducer::{chain_reducers, ChainedReducer, Reducer, SharedReducer};
pub use state::State;
pub use subscriber::{PartialSubscriber, Subscriber, SubscriberList, Subscription};

/// Accepts actions. This is the only way to trigger a state change.
pub trait Dispatcher<A>: Send + Sync {
    fn dispatch(&self, action: A);
}

/// An object that holds the application's state tree.
pub trait Store<S, A>: Dispatcher<A> {
    /// Register a change listener.
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<S>>) -> Subscription;

    /// The current state tree.
    fn get_state(&self) -> S;

    /// Replace the reducer used for subsequent dispatches.
    fn replace_reducer(&self, reducer: SharedReducer<S, A>);
}

/// Stores are shared between the dispatching caller, middleware, and
/// subscribers that dispatch follow-up actions.
pub type SharedStore<S, A> = Arc<dyn Store<S, A>>;

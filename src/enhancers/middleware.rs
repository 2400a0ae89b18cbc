use std::sync::Arc;

use super::{Enhancer, StoreCreator};
use crate::store::{
    Action, Dispatcher, SharedReducer, SharedStore, State, Store, Subscriber, Subscription,
};

/// Intercepts dispatched actions.
///
/// Implementations must eventually call `next.dispatch(action)`; an action
/// that is not forwarded never reaches later middleware or the reducer.
pub trait Middleware<S, A>: Send + Sync {
    /// * `state` - reads the current state
    /// * `next` - the next dispatcher in the chain
    /// * `root` - the enhanced store, for dispatching additional actions
    fn dispatch(
        &self,
        state: &dyn Fn() -> S,
        action: A,
        next: &dyn Dispatcher<A>,
        root: &dyn Dispatcher<A>,
    );
}

/// An [`Enhancer`] that runs every dispatch through `middlewares`.
///
/// Middlewares see an action in registration order; the last one registered
/// hands it to the wrapped store.
pub fn apply_middlewares<S: State, A: Action>(
    middlewares: Vec<Arc<dyn Middleware<S, A>>>,
) -> Enhancer<S, A> {
    Box::new(move |next: StoreCreator<S, A>| -> StoreCreator<S, A> {
        Box::new(move |initial_state: S, reducer: SharedReducer<S, A>| -> SharedStore<S, A> {
            Arc::new(MiddlewareStore {
                inner: next(initial_state, reducer),
                middlewares,
            })
        })
    })
}

struct MiddlewareStore<S, A> {
    inner: SharedStore<S, A>,
    middlewares: Vec<Arc<dyn Middleware<S, A>>>,
}

impl<S: State, A: Action> MiddlewareStore<S, A> {
    fn dispatch_from(&self, index: usize, action: A) {
        match self.middlewares.get(index) {
            Some(middleware) => {
                let state = || self.inner.get_state();
                let next = Link { store: self, index: index + 1 };
                middleware.dispatch(&state, action, &next, self);
            }
            None => self.inner.dispatch(action),
        }
    }
}

/// The rest of the chain after a given middleware.
struct Link<'a, S, A> {
    store: &'a MiddlewareStore<S, A>,
    index: usize,
}

impl<S: State, A: Action> Dispatcher<A> for Link<'_, S, A> {
    fn dispatch(&self, action: A) {
        self.store.dispatch_from(self.index, action);
    }
}

impl<S: State, A: Action> Dispatcher<A> for MiddlewareStore<S, A> {
    fn dispatch(&self, action: A) {
        self.dispatch_from(0, action);
    }
}

impl<S: State, A: Action> Store<S, A> for MiddlewareStore<S, A> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<S>>) -> Subscription {
        self.inner.subscribe(subscriber)
    }

    fn get_state(&self) -> S {
        self.inner.get_state()
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        self.inner.replace_reducer(reducer);
    }
}

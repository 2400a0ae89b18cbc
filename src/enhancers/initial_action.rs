use std::sync::Arc;

use super::{Enhancer, StoreCreator};
use crate::store::{
    Action, Dispatcher, SharedReducer, SharedStore, State, Store, Subscriber, Subscription,
};

/// An [`Enhancer`] that dispatches `initial_action` as soon as the store is
/// created, and again after every `replace_reducer` when
/// `dispatch_when_replaced` is set.
pub fn apply_initial_action<S: State, A: Action>(
    initial_action: A,
    dispatch_when_replaced: bool,
) -> Enhancer<S, A> {
    Box::new(move |next: StoreCreator<S, A>| -> StoreCreator<S, A> {
        Box::new(move |initial_state: S, reducer: SharedReducer<S, A>| -> SharedStore<S, A> {
            let store = InitialActionStore {
                inner: next(initial_state, reducer),
                initial_action,
                dispatch_when_replaced,
            };
            tracing::debug!(action = ?store.initial_action, "Dispatching initial action");
            store.dispatch(store.initial_action.clone());
            Arc::new(store)
        })
    })
}

struct InitialActionStore<S, A> {
    inner: SharedStore<S, A>,
    initial_action: A,
    dispatch_when_replaced: bool,
}

impl<S: State, A: Action> Dispatcher<A> for InitialActionStore<S, A> {
    fn dispatch(&self, action: A) {
        self.inner.dispatch(action);
    }
}

impl<S: State, A: Action> Store<S, A> for InitialActionStore<S, A> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<S>>) -> Subscription {
        self.inner.subscribe(subscriber)
    }

    fn get_state(&self) -> S {
        self.inner.get_state()
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        self.inner.replace_reducer(reducer);
        if self.dispatch_when_replaced {
            self.dispatch(self.initial_action.clone());
        }
    }
}

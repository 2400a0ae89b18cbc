use std::sync::Arc;

use super::Middleware;
use crate::store::{Action, Dispatcher, State};

/// A middleware that reacts to an action after it has been applied.
///
/// The action is forwarded down the chain first, so by the time `react` runs
/// the reducer has finished and the store's single-writer guard is free:
/// follow-up actions dispatched through `dispatcher` are never dropped as
/// reentrant.
pub trait SideEffect<S, A>: Send + Sync {
    /// * `state` - reads the current state (already reduced with `action`)
    /// * `dispatcher` - the enhanced store, for dispatching additional actions
    fn react(&self, state: &dyn Fn() -> S, action: &A, dispatcher: &dyn Dispatcher<A>);
}

/// Wrap a side effect as middleware for [`super::apply_middlewares`].
pub fn side_effect<S, A, E>(effect: E) -> Arc<dyn Middleware<S, A>>
where
    S: State,
    A: Action,
    E: SideEffect<S, A> + 'static,
{
    Arc::new(PropagateThenReact(effect))
}

struct PropagateThenReact<E>(E);

impl<S: State, A: Action, E: SideEffect<S, A>> Middleware<S, A> for PropagateThenReact<E> {
    fn dispatch(
        &self,
        state: &dyn Fn() -> S,
        action: A,
        next: &dyn Dispatcher<A>,
        root: &dyn Dispatcher<A>,
    ) {
        next.dispatch(action.clone());
        self.0.react(state, &action, root);
    }
}

impl<S, A, E: SideEffect<S, A>> SideEffect<S, A> for Arc<E> {
    fn react(&self, state: &dyn Fn() -> S, action: &A, dispatcher: &dyn Dispatcher<A>) {
        (**self).react(state, action, dispatcher);
    }
}

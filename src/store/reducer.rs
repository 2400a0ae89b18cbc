//! Reducer trait and sequential composition.

use std::sync::Arc;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Action) -> State
pub trait Reducer<S, A>: Send + Sync {
    /// Process an action and return the new state.
    ///
    /// This should be a pure function with no side effects.
    fn reduce(&self, state: S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(S, &A) -> S + Send + Sync,
{
    fn reduce(&self, state: S, action: &A) -> S {
        self(state, action)
    }
}

/// Reference-counted reducer, swappable at runtime via `replace_reducer`.
pub type SharedReducer<S, A> = Arc<dyn Reducer<S, A>>;

/// Reducers applied one after another, each receiving the previous output.
pub struct ChainedReducer<S, A> {
    reducers: Vec<SharedReducer<S, A>>,
}

impl<S, A> Reducer<S, A> for ChainedReducer<S, A> {
    fn reduce(&self, state: S, action: &A) -> S {
        self.reducers
            .iter()
            .fold(state, |state, reducer| reducer.reduce(state, action))
    }
}

/// Combine multiple reducers into a single reducer.
///
/// Reducers run in the order given; an empty chain is the identity.
pub fn chain_reducers<S, A>(reducers: Vec<SharedReducer<S, A>>) -> ChainedReducer<S, A> {
    ChainedReducer { reducers }
}

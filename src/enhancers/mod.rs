//! Store composition: enhancers, middleware, and side effects.
//!
//! An enhancer wraps a store-creation function and returns a new one:
//!
//! ```text
//! create = enhancerN( … enhancer2( enhancer1( base_creator ) ) )
//! ```
//!
//! so the last enhancer supplied is the outermost layer a caller talks to.

mod async_dispatch;
mod initial_action;
mod logging;
mod middleware;
mod side_effect;

pub use async_dispatch::{apply_async_dispatch, AsyncStore, AsyncStoreOptions};
pub use initial_action::apply_initial_action;
pub use logging::LoggingMiddleware;
pub use middleware::{apply_middlewares, Middleware};
pub use side_effect::{side_effect, SideEffect};

use crate::store::{Action, SharedReducer, SharedStore, State};

/// Creates a store from an initial state and a reducer.
pub type StoreCreator<S, A> =
    Box<dyn FnOnce(S, SharedReducer<S, A>) -> SharedStore<S, A> + Send>;

/// Composes a store creator into a new, enhanced store creator.
pub type Enhancer<S, A> = Box<dyn FnOnce(StoreCreator<S, A>) -> StoreCreator<S, A> + Send>;

/// Create a store from `creator`, enhanced by `enhancers` in the order given.
pub fn create_store<S: State, A: Action>(
    creator: StoreCreator<S, A>,
    initial_state: S,
    reducer: SharedReducer<S, A>,
    enhancers: Vec<Enhancer<S, A>>,
) -> SharedStore<S, A> {
    let creator = enhancers
        .into_iter()
        .fold(creator, |creator, enhancer| enhancer(creator));
    creator(initial_state, reducer)
}

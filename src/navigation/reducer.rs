use super::action::{NavigationAction, NavigationIntent};
use super::state::NavigationState;
use crate::store::Reducer;

/// Installs trees computed by [`super::NavigationSideEffect`].
///
/// Every other action leaves the navigation state unchanged; embed this in
/// the application reducer for the navigation slice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigationReducer;

impl<A: NavigationIntent> Reducer<NavigationState, A> for NavigationReducer {
    fn reduce(&self, state: NavigationState, action: &A) -> NavigationState {
        match action.as_navigation() {
            Some(NavigationAction::ReplaceState { state: next }) => next.clone(),
            _ => state,
        }
    }
}

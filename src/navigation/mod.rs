//! Navigation as state: the stack of screens and the panels nested in them.
//!
//! The tree lives in [`NavigationState`]. [`NavigationSideEffect`] decides how
//! each [`NavigationAction`] changes it, commits the result through
//! [`NavigationReducer`], and tells a [`NavigationHandler`] what to show.

mod action;
mod error;
mod handler;
mod reducer;
mod side_effect;
mod state;

pub use action::{HideType, NavigationAction, NavigationIntent, ReplaceType};
pub use error::{HandlerError, NavigationError};
pub use handler::{HandlerCall, NavigationHandler, RecordingHandler};
pub use reducer::NavigationReducer;
pub use side_effect::{NavigationSideEffect, SubStateAccessor};
pub use state::{
    ActivityNode, FragmentNode, NavigationComponent, NavigationContainerId, NavigationState,
    NavigationTag,
};

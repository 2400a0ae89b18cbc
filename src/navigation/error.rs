use thiserror::Error;

use super::state::NavigationTag;

/// Structural problems found while editing or validating a navigation tree.
///
/// The side-effect engine treats these as no-ops: a stale or duplicate
/// navigation request must not take the application down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Component '{tag}' references missing parent '{parent}'")]
    MissingParent { tag: NavigationTag, parent: NavigationTag },

    #[error("Attaching '{tag}' under '{parent}' would create a cycle")]
    Cycle { tag: NavigationTag, parent: NavigationTag },

    #[error("Component '{tag}' already exists with a different kind")]
    KindMismatch { tag: NavigationTag },

    #[error("Component '{tag}' is not an activity")]
    NotAnActivity { tag: NavigationTag },

    #[error("Unknown navigation component '{tag}'")]
    UnknownComponent { tag: NavigationTag },

    #[error("Component stored under '{key}' carries tag '{tag}'")]
    KeyMismatch { key: NavigationTag, tag: NavigationTag },
}

/// Failure reported by a [`super::NavigationHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Nothing currently holds input focus.
    #[error("No input target to dismiss the keyboard from")]
    NoInputTarget,

    #[error("Navigation handler failed: {0}")]
    Platform(String),
}

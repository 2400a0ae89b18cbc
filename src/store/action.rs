//! Base trait for actions dispatched through a store.

use std::fmt::Debug;

/// Marker trait for action objects.
///
/// Actions represent:
/// - User actions (button presses, back navigation)
/// - System events (a screen came to front, a panel was hidden)
/// - Internal commands (installing a precomputed state snapshot)
///
/// Actions are cloned when a side effect needs to both forward and inspect
/// them, and logged with their `Debug` form.
pub trait Action: Clone + Debug + Send + Sync + 'static {}

impl<T> Action for T where T: Clone + Debug + Send + Sync + 'static {}

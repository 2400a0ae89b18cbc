//! Base trait for state trees held by a store.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable snapshots (Clone to create new states)
/// - Comparable (PartialEq for detecting changes)
/// - Shareable across the dispatch worker and notification executor
pub trait State: Clone + PartialEq + Send + Sync + 'static {}

impl<T> State for T where T: Clone + PartialEq + Send + Sync + 'static {}

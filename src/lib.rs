//! Redux-style state store with composable enhancers, and a navigation engine
//! that models screens and nested panels as a tree in that store.

pub mod config;
pub mod enhancers;
pub mod logging;
pub mod navigation;
pub mod replay;
pub mod store;

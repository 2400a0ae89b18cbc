//! Configuration for the store and its logging.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, DispatchMode, LoggingConfig, StoreConfig};

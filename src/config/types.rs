use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How dispatched actions reach the reducer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Reduce on the caller's thread; contending dispatches are dropped.
    #[default]
    Sync,
    /// Queue every dispatch on one dedicated worker thread.
    Async,
}

/// Store construction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub mode: DispatchMode,
    /// Name given to the dispatch worker in async mode (default: "navflux-dispatch").
    #[serde(default = "default_worker_thread_name")]
    pub worker_thread_name: String,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive (default: "info"). `RUST_LOG` takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Log every dispatched action at debug level (default: true).
    #[serde(default = "default_log_actions")]
    pub log_actions: bool,
    /// Write logs to this file instead of stderr. `NAVFLUX_LOG` takes precedence.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_worker_thread_name() -> String {
    "navflux-dispatch".to_string()
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_log_actions() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            worker_thread_name: default_worker_thread_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            log_actions: default_log_actions(),
            file: None,
        }
    }
}

//! Replaying a scripted sequence of navigation actions against a recording
//! handler.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, DispatchMode};
use crate::enhancers::{
    apply_middlewares, create_store, side_effect, AsyncStore, AsyncStoreOptions, LoggingMiddleware,
    Middleware,
};
use crate::navigation::{
    HandlerCall, NavigationAction, NavigationError, NavigationHandler, NavigationReducer,
    NavigationSideEffect, NavigationState, RecordingHandler,
};
use crate::store::{BaseStore, Dispatcher, SharedReducer, Store, StoreError};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML script '{path}': {source}")]
    TomlError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON script '{path}': {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Script initial state is not a valid navigation tree: {0}")]
    InvalidState(#[from] NavigationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A navigation script: an optional starting tree and the actions to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub initial_state: Option<NavigationState>,
    #[serde(default)]
    pub steps: Vec<NavigationAction>,
}

impl ReplayScript {
    /// Load a script from disk. Files ending in `.json` are parsed as JSON,
    /// anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|e| ScriptError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).map_err(|e| ScriptError::JsonError {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            toml::from_str(&content).map_err(|e| ScriptError::TomlError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

/// What a replay produced: every handler call in order, and the final tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub calls: Vec<HandlerCall>,
    pub state: NavigationState,
}

/// Run `script` through a fully composed navigation store built from `config`.
pub fn run_replay(script: &ReplayScript, config: &Config) -> Result<ReplayReport, ScriptError> {
    let initial_state = script.initial_state.clone().unwrap_or_default();
    initial_state.validate()?;

    let handler = Arc::new(RecordingHandler::new());
    let mut middlewares: Vec<Arc<dyn Middleware<NavigationState, NavigationAction>>> = Vec::new();
    if config.logging.log_actions {
        middlewares.push(Arc::new(LoggingMiddleware));
    }
    middlewares.push(side_effect(NavigationSideEffect::standalone(
        Arc::clone(&handler) as Arc<dyn NavigationHandler>
    )));

    let reducer: SharedReducer<NavigationState, NavigationAction> = Arc::new(NavigationReducer);
    let enhancers = vec![apply_middlewares(middlewares)];

    tracing::info!(
        steps = script.steps.len(),
        mode = ?config.store.mode,
        "Replaying navigation script"
    );

    let state = match config.store.mode {
        DispatchMode::Sync => {
            let store = create_store(BaseStore::creator(), initial_state, reducer, enhancers);
            for step in &script.steps {
                store.dispatch(step.clone());
            }
            store.get_state()
        }
        DispatchMode::Async => {
            let options = AsyncStoreOptions {
                worker_thread_name: config.store.worker_thread_name.clone(),
                ..AsyncStoreOptions::default()
            };
            let store = AsyncStore::create(options, initial_state, reducer, enhancers)?;
            for step in &script.steps {
                store.dispatch(step.clone());
            }
            store.wait_idle();
            store.get_state()
        }
    };

    Ok(ReplayReport {
        calls: handler.take(),
        state,
    })
}

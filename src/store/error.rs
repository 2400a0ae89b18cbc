use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A reducer panicked while applying an action.
    #[error("Dispatch exception: {message}")]
    Dispatch { message: String },

    /// The dedicated dispatch worker thread could not be started.
    #[error("Failed to spawn dispatch worker '{name}': {source}")]
    WorkerSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Build a dispatch error from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "reducer panicked".to_string()
        };
        StoreError::Dispatch { message }
    }
}

/// Receives reducer failures on the store's notification executor.
pub type ErrorSink = Arc<dyn Fn(StoreError) + Send + Sync>;

/// The default sink: reducer failures are fatal.
pub fn fatal_error_sink() -> ErrorSink {
    Arc::new(|err: StoreError| {
        tracing::error!(error = %err, "Reducer failed");
        panic!("{err}");
    })
}

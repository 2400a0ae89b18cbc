use std::time::Instant;

use super::Middleware;
use crate::store::{Action, Dispatcher, State};

/// Logs every action before handing it down the chain.
///
/// Register it first so the log line reflects the order callers dispatched
/// in, including follow-up actions dispatched by side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl<S: State, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn dispatch(
        &self,
        _state: &dyn Fn() -> S,
        action: A,
        next: &dyn Dispatcher<A>,
        _root: &dyn Dispatcher<A>,
    ) {
        tracing::debug!(?action, "Dispatch");
        let started = Instant::now();
        next.dispatch(action);
        tracing::trace!(elapsed_us = started.elapsed().as_micros() as u64, "Dispatch complete");
    }
}

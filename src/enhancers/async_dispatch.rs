//! Fire-and-forget dispatch on a dedicated worker thread.

use std::sync::Arc;

use super::{create_store, Enhancer, StoreCreator};
use crate::store::{
    fatal_error_sink, Action, BaseStore, Dispatcher, ErrorSink, Executor, ImmediateExecutor,
    SharedReducer, SharedStore, State, Store, StoreError, Subscriber, Subscription,
    WorkerExecutor,
};

/// An [`Enhancer`] that submits every dispatch to `worker` instead of running
/// it on the caller's thread.
///
/// `dispatch` returns before the action is applied. Actions are applied in
/// submission order.
pub fn apply_async_dispatch<S: State, A: Action>(worker: Arc<dyn Executor>) -> Enhancer<S, A> {
    Box::new(move |next: StoreCreator<S, A>| -> StoreCreator<S, A> {
        Box::new(move |initial_state: S, reducer: SharedReducer<S, A>| -> SharedStore<S, A> {
            Arc::new(AsyncDispatchStore {
                inner: next(initial_state, reducer),
                worker,
            })
        })
    })
}

struct AsyncDispatchStore<S, A> {
    inner: SharedStore<S, A>,
    worker: Arc<dyn Executor>,
}

impl<S: State, A: Action> Dispatcher<A> for AsyncDispatchStore<S, A> {
    fn dispatch(&self, action: A) {
        let inner = Arc::clone(&self.inner);
        self.worker.execute(Box::new(move || inner.dispatch(action)));
    }
}

impl<S: State, A: Action> Store<S, A> for AsyncDispatchStore<S, A> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<S>>) -> Subscription {
        self.inner.subscribe(subscriber)
    }

    fn get_state(&self) -> S {
        self.inner.get_state()
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        self.inner.replace_reducer(reducer);
    }
}

/// Settings for [`AsyncStore::create`].
pub struct AsyncStoreOptions {
    /// Name of the dedicated dispatch thread.
    pub worker_thread_name: String,
    /// Where state notifications and reducer failures are delivered.
    pub notifier: Arc<dyn Executor>,
    pub on_error: ErrorSink,
}

impl Default for AsyncStoreOptions {
    fn default() -> Self {
        Self {
            worker_thread_name: "navflux-dispatch".to_string(),
            notifier: Arc::new(ImmediateExecutor),
            on_error: fatal_error_sink(),
        }
    }
}

/// A store whose dispatches run on one dedicated worker, while state
/// notifications and reducer failures are delivered on a caller-supplied
/// executor.
///
/// The async dispatch layer is outermost, so every enhancer passed to
/// [`AsyncStore::create`] (middleware and side effects included) runs on the
/// worker thread.
pub struct AsyncStore<S, A> {
    store: SharedStore<S, A>,
    worker: Arc<WorkerExecutor>,
}

impl<S: State, A: Action> AsyncStore<S, A> {
    pub fn create(
        options: AsyncStoreOptions,
        initial_state: S,
        reducer: SharedReducer<S, A>,
        mut enhancers: Vec<Enhancer<S, A>>,
    ) -> Result<Self, StoreError> {
        let worker = Arc::new(WorkerExecutor::spawn(options.worker_thread_name)?);
        enhancers.push(apply_async_dispatch(Arc::clone(&worker) as Arc<dyn Executor>));

        let store = create_store(
            BaseStore::creator_with(options.notifier, options.on_error),
            initial_state,
            reducer,
            enhancers,
        );
        Ok(Self { store, worker })
    }

    /// Block until every action dispatched before this call has been applied.
    ///
    /// Must not be called from the dispatch worker (a subscriber running on
    /// an immediate notifier, for example).
    pub fn wait_idle(&self) {
        self.worker.wait_idle();
    }

    /// The enhanced store as a shareable handle.
    pub fn shared(&self) -> SharedStore<S, A> {
        Arc::clone(&self.store)
    }
}

impl<S: State, A: Action> Dispatcher<A> for AsyncStore<S, A> {
    fn dispatch(&self, action: A) {
        self.store.dispatch(action);
    }
}

impl<S: State, A: Action> Store<S, A> for AsyncStore<S, A> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<S>>) -> Subscription {
        self.store.subscribe(subscriber)
    }

    fn get_state(&self) -> S {
        self.store.get_state()
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        self.store.replace_reducer(reducer);
    }
}

//! Enhancer composition: middleware order, side effects, initial action, async dispatch.

mod common;

use std::sync::Arc;

use navflux::enhancers::{
    apply_initial_action, apply_middlewares, create_store, side_effect, AsyncStore,
    AsyncStoreOptions, LoggingMiddleware, Middleware, SideEffect,
};
use navflux::store::{
    BaseStore, Dispatcher, Executor, QueueExecutor, SharedReducer, Store, StoreError, Task,
};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Push(&'static str),
    Reset,
}

fn list_reducer() -> SharedReducer<Vec<&'static str>, Msg> {
    Arc::new(|mut state: Vec<&'static str>, action: &Msg| {
        match action {
            Msg::Push(item) => state.push(item),
            Msg::Reset => state.clear(),
        }
        state
    })
}

struct Tracer {
    name: &'static str,
    log: Log,
}

impl Middleware<Vec<&'static str>, Msg> for Tracer {
    fn dispatch(
        &self,
        _state: &dyn Fn() -> Vec<&'static str>,
        action: Msg,
        next: &dyn Dispatcher<Msg>,
        _root: &dyn Dispatcher<Msg>,
    ) {
        self.log.lock().push(format!("{} before {:?}", self.name, action));
        next.dispatch(action);
        self.log.lock().push(format!("{} after", self.name));
    }
}

/// Pushes "echo" after every "ping", observing the already-reduced state.
struct Echo {
    seen: Log,
}

impl SideEffect<Vec<&'static str>, Msg> for Echo {
    fn react(
        &self,
        state: &dyn Fn() -> Vec<&'static str>,
        action: &Msg,
        dispatcher: &dyn Dispatcher<Msg>,
    ) {
        self.seen.lock().push(format!("{:?}", state()));
        if *action == Msg::Push("ping") {
            dispatcher.dispatch(Msg::Push("echo"));
        }
    }
}

#[test]
fn test_first_registered_middleware_is_outermost() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let middlewares: Vec<Arc<dyn Middleware<Vec<&'static str>, Msg>>> = vec![
        Arc::new(Tracer {
            name: "outer",
            log: Arc::clone(&log),
        }),
        Arc::new(Tracer {
            name: "inner",
            log: Arc::clone(&log),
        }),
    ];
    let store = create_store(
        BaseStore::creator(),
        Vec::new(),
        list_reducer(),
        vec![apply_middlewares(middlewares)],
    );

    store.dispatch(Msg::Push("a"));
    assert_eq!(store.get_state(), vec!["a"]);
    assert_eq!(
        *log.lock(),
        vec![
            "outer before Push(\"a\")".to_string(),
            "inner before Push(\"a\")".to_string(),
            "inner after".to_string(),
            "outer after".to_string(),
        ]
    );
}

#[test]
fn test_side_effect_reacts_after_reduce_and_dispatches_from_root() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let seen: Log = Arc::new(Mutex::new(Vec::new()));
    let middlewares: Vec<Arc<dyn Middleware<Vec<&'static str>, Msg>>> = vec![
        Arc::new(Tracer {
            name: "tracer",
            log: Arc::clone(&log),
        }),
        side_effect(Echo { seen: Arc::clone(&seen) }),
    ];
    let store = create_store(
        BaseStore::creator(),
        Vec::new(),
        list_reducer(),
        vec![apply_middlewares(middlewares)],
    );

    store.dispatch(Msg::Push("ping"));

    assert_eq!(store.get_state(), vec!["ping", "echo"]);
    // The follow-up went through the whole chain again, starting at the root.
    assert_eq!(
        log.lock().iter().filter(|line| line.contains("before")).count(),
        2
    );
    assert_eq!(
        *seen.lock(),
        vec!["[\"ping\"]".to_string(), "[\"ping\", \"echo\"]".to_string()]
    );
}

#[test]
fn test_chained_side_effects_keep_propagate_then_react_order() {
    let order: Log = Arc::new(Mutex::new(Vec::new()));

    struct Named {
        name: &'static str,
        order: Log,
    }
    impl SideEffect<Vec<&'static str>, Msg> for Named {
        fn react(&self, state: &dyn Fn() -> Vec<&'static str>, _: &Msg, _: &dyn Dispatcher<Msg>) {
            self.order.lock().push(format!("{} saw {}", self.name, state().len()));
        }
    }

    let store = create_store(
        BaseStore::creator(),
        Vec::new(),
        list_reducer(),
        vec![apply_middlewares(vec![
            side_effect(Named {
                name: "first",
                order: Arc::clone(&order),
            }),
            side_effect(Named {
                name: "second",
                order: Arc::clone(&order),
            }),
        ])],
    );

    store.dispatch(Msg::Push("x"));
    assert_eq!(
        *order.lock(),
        vec!["second saw 1".to_string(), "first saw 1".to_string()]
    );
}

#[test]
fn test_initial_action_dispatched_on_create_and_replace() {
    let store = create_store(
        BaseStore::creator(),
        vec!["stale"],
        list_reducer(),
        vec![apply_initial_action(Msg::Reset, true)],
    );
    assert!(store.get_state().is_empty());

    store.dispatch(Msg::Push("kept until replace"));
    store.replace_reducer(list_reducer());
    assert!(store.get_state().is_empty());
}

#[test]
fn test_initial_action_not_repeated_when_disabled() {
    let store = create_store(
        BaseStore::creator(),
        vec!["stale"],
        list_reducer(),
        vec![apply_initial_action(Msg::Reset, false)],
    );
    store.dispatch(Msg::Push("kept"));
    store.replace_reducer(list_reducer());
    assert_eq!(store.get_state(), vec!["kept"]);
}

#[test]
fn test_logging_middleware_forwards_actions() {
    let store = create_store(
        BaseStore::creator(),
        Vec::new(),
        list_reducer(),
        vec![apply_middlewares(vec![
            Arc::new(LoggingMiddleware) as Arc<dyn Middleware<_, _>>
        ])],
    );
    store.dispatch(Msg::Push("logged"));
    assert_eq!(store.get_state(), vec!["logged"]);
}

#[test]
fn test_async_store_applies_in_submission_order() {
    let store = AsyncStore::create(
        AsyncStoreOptions {
            worker_thread_name: "enhancer-test-dispatch".to_string(),
            ..AsyncStoreOptions::default()
        },
        Vec::new(),
        list_reducer(),
        Vec::new(),
    )
    .unwrap();

    for item in ["a", "b", "c", "d"] {
        store.dispatch(Msg::Push(item));
    }
    store.wait_idle();
    assert_eq!(store.get_state(), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_async_store_runs_middleware_on_worker_thread() {
    let threads: Log = Arc::new(Mutex::new(Vec::new()));

    struct ThreadName(Log);
    impl Middleware<Vec<&'static str>, Msg> for ThreadName {
        fn dispatch(
            &self,
            _: &dyn Fn() -> Vec<&'static str>,
            action: Msg,
            next: &dyn Dispatcher<Msg>,
            _: &dyn Dispatcher<Msg>,
        ) {
            let name = std::thread::current().name().unwrap_or("<unnamed>").to_string();
            self.0.lock().push(name);
            next.dispatch(action);
        }
    }

    let store = AsyncStore::create(
        AsyncStoreOptions {
            worker_thread_name: "nav-worker-thread".to_string(),
            ..AsyncStoreOptions::default()
        },
        Vec::new(),
        list_reducer(),
        vec![apply_middlewares(vec![
            Arc::new(ThreadName(Arc::clone(&threads))) as Arc<dyn Middleware<_, _>>
        ])],
    )
    .unwrap();

    store.dispatch(Msg::Push("x"));
    store.wait_idle();
    assert_eq!(*threads.lock(), vec!["nav-worker-thread".to_string()]);
}

#[test]
fn test_async_store_notifies_and_reports_on_supplied_executor() {
    let queue = Arc::new(QueueExecutor::new());
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let reducer: SharedReducer<i32, i32> = Arc::new(|state: i32, action: &i32| {
        assert!(*action >= 0, "negative step");
        state + action
    });

    let store = AsyncStore::create(
        AsyncStoreOptions {
            worker_thread_name: "notifier-test-dispatch".to_string(),
            notifier: Arc::clone(&queue) as Arc<dyn Executor>,
            on_error: Arc::new(move |err: StoreError| sink.lock().push(err.to_string())),
        },
        0,
        reducer,
        Vec::new(),
    )
    .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_sink = Arc::clone(&seen);
    store.subscribe(Arc::new(move |state: &i32| seen_sink.lock().push(*state)));

    store.dispatch(1);
    store.dispatch(-1);
    store.dispatch(2);
    store.wait_idle();

    assert!(seen.lock().is_empty());
    assert_eq!(queue.run_pending(), 3);
    assert_eq!(*seen.lock(), vec![1, 3]);
    assert_eq!(*errors.lock(), vec!["Dispatch exception: negative step".to_string()]);
}

#[test]
fn test_closure_executor_receives_tasks() {
    let ran = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&ran);
    let executor = move |task: Task| {
        *counter.lock() += 1;
        task();
    };
    let store: BaseStore<i32, i32> = BaseStore::with_notifier(
        0,
        Arc::new(|state: i32, action: &i32| state + action),
        Arc::new(executor),
        Arc::new(|_: StoreError| {}),
    );
    store.subscribe(Arc::new(|_: &i32| {}));
    store.dispatch(1);
    assert_eq!(*ran.lock(), 1);
}

//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use navflux::enhancers::{apply_middlewares, create_store, side_effect, Middleware};
use navflux::navigation::{
    ActivityNode, FragmentNode, HandlerCall, NavigationAction, NavigationHandler, NavigationReducer,
    NavigationSideEffect, NavigationState, RecordingHandler,
};
use navflux::store::{BaseStore, Dispatcher, SharedReducer, SharedStore};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Records every action that enters the middleware chain.
pub struct ActionRecorder(pub Arc<Mutex<Vec<NavigationAction>>>);

impl Middleware<NavigationState, NavigationAction> for ActionRecorder {
    fn dispatch(
        &self,
        _state: &dyn Fn() -> NavigationState,
        action: NavigationAction,
        next: &dyn Dispatcher<NavigationAction>,
        _root: &dyn Dispatcher<NavigationAction>,
    ) {
        self.0.lock().push(action.clone());
        next.dispatch(action);
    }
}

/// A synchronous navigation store wired to a recording handler.
pub struct NavHarness {
    pub store: SharedStore<NavigationState, NavigationAction>,
    pub handler: Arc<RecordingHandler>,
    pub actions: Arc<Mutex<Vec<NavigationAction>>>,
}

impl NavHarness {
    pub fn new() -> Self {
        Self::with_state(NavigationState::new())
    }

    pub fn with_state(initial: NavigationState) -> Self {
        Self::with_handler(initial, RecordingHandler::new())
    }

    pub fn with_handler(initial: NavigationState, handler: RecordingHandler) -> Self {
        let handler = Arc::new(handler);
        let effect =
            NavigationSideEffect::standalone(Arc::clone(&handler) as Arc<dyn NavigationHandler>);
        let actions = Arc::new(Mutex::new(Vec::new()));
        let middlewares: Vec<Arc<dyn Middleware<NavigationState, NavigationAction>>> =
            vec![Arc::new(ActionRecorder(Arc::clone(&actions))), side_effect(effect)];
        let reducer: SharedReducer<NavigationState, NavigationAction> = Arc::new(NavigationReducer);
        let store = create_store(
            BaseStore::creator(),
            initial,
            reducer,
            vec![apply_middlewares(middlewares)],
        );
        Self {
            store,
            handler,
            actions,
        }
    }

    pub fn dispatch(&self, action: NavigationAction) {
        self.store.dispatch(action);
    }

    pub fn state(&self) -> NavigationState {
        self.store.get_state()
    }

    /// Handler calls recorded since the last call, keyboard dismissals left out.
    pub fn take_calls(&self) -> Vec<HandlerCall> {
        self.handler
            .take()
            .into_iter()
            .filter(|call| *call != HandlerCall::DismissKeyboard)
            .collect()
    }

    /// Tags announced through `RemovingComponent`, in dispatch order.
    pub fn removed_tags(&self) -> Vec<String> {
        self.actions
            .lock()
            .iter()
            .filter_map(|action| match action {
                NavigationAction::RemovingComponent { tag } => Some(tag.to_string()),
                _ => None,
            })
            .collect()
    }
}

pub fn activity(tag: &str, parent: Option<&str>) -> ActivityNode {
    ActivityNode {
        tag: tag.into(),
        request_code: None,
        is_visible: true,
        parent_tag: parent.map(Into::into),
    }
}

pub fn fragment(tag: &str, parent: &str, container: &str) -> FragmentNode {
    FragmentNode {
        tag: tag.into(),
        container_id: container.into(),
        is_visible: true,
        parent_tag: parent.into(),
    }
}

pub fn open_panel(parent: &str, container: &str, tag: &str) -> HandlerCall {
    HandlerCall::OpenPanel {
        parent_tag: parent.into(),
        container_id: container.into(),
        tag: tag.into(),
    }
}

pub fn remove_panel(parent: &str, tag: &str) -> HandlerCall {
    HandlerCall::RemovePanel {
        parent_tag: parent.into(),
        tag: tag.into(),
    }
}

pub fn hide_panel(parent: &str, tag: &str) -> HandlerCall {
    HandlerCall::HidePanel {
        parent_tag: parent.into(),
        tag: tag.into(),
    }
}

pub fn start_screen(tag: &str, request_code: Option<i32>) -> HandlerCall {
    HandlerCall::StartScreen {
        tag: tag.into(),
        request_code,
    }
}

/// Write `content` to `name` inside a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write temp file");
    (temp_dir, path)
}

//! The platform-facing half of navigation.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use super::error::HandlerError;
use super::state::{NavigationContainerId, NavigationTag};

/// Performs the visible effects the navigation engine decides on.
///
/// Calls are best-effort: the engine neither waits for nor interprets their
/// outcome. A handler that cannot resolve a tag (no mounting surface
/// registered, say) reports or swallows that itself.
pub trait NavigationHandler: Send + Sync {
    fn start_screen(&self, tag: &NavigationTag, request_code: Option<i32>);

    fn open_panel(
        &self,
        parent_tag: &NavigationTag,
        container_id: &NavigationContainerId,
        tag: &NavigationTag,
    );

    fn show_modal(
        &self,
        parent_tag: &NavigationTag,
        target_tag: &NavigationTag,
        request_code: i32,
        tag: &NavigationTag,
    );

    fn hide_panel(&self, parent_tag: &NavigationTag, tag: &NavigationTag);

    fn deliver_back_pressed(&self, parent_tag: &NavigationTag, tag: &NavigationTag);

    fn remove_panel(&self, parent_tag: &NavigationTag, tag: &NavigationTag);

    fn finish_active_screen(&self);

    /// May fail when nothing holds input focus; the engine ignores failures.
    fn dismiss_keyboard(&self) -> Result<(), HandlerError>;
}

/// One call received by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HandlerCall {
    StartScreen {
        tag: NavigationTag,
        request_code: Option<i32>,
    },
    OpenPanel {
        parent_tag: NavigationTag,
        container_id: NavigationContainerId,
        tag: NavigationTag,
    },
    ShowModal {
        parent_tag: NavigationTag,
        target_tag: NavigationTag,
        request_code: i32,
        tag: NavigationTag,
    },
    HidePanel {
        parent_tag: NavigationTag,
        tag: NavigationTag,
    },
    DeliverBackPressed {
        parent_tag: NavigationTag,
        tag: NavigationTag,
    },
    RemovePanel {
        parent_tag: NavigationTag,
        tag: NavigationTag,
    },
    FinishActiveScreen,
    DismissKeyboard,
}

/// A handler that records calls instead of touching a platform.
pub struct RecordingHandler {
    calls: Mutex<Vec<HandlerCall>>,
    has_input_target: AtomicBool,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            has_input_target: AtomicBool::new(true),
        }
    }

    /// Make keyboard dismissal fail with [`HandlerError::NoInputTarget`].
    /// Failed attempts are still recorded.
    pub fn without_input_target(self) -> Self {
        self.has_input_target.store(false, Ordering::Relaxed);
        self
    }

    pub fn calls(&self) -> Vec<HandlerCall> {
        self.calls.lock().clone()
    }

    /// Return and clear the recorded calls.
    pub fn take(&self) -> Vec<HandlerCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn record(&self, call: HandlerCall) {
        tracing::trace!(?call, "Navigation handler call");
        self.calls.lock().push(call);
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationHandler for RecordingHandler {
    fn start_screen(&self, tag: &NavigationTag, request_code: Option<i32>) {
        self.record(HandlerCall::StartScreen {
            tag: tag.clone(),
            request_code,
        });
    }

    fn open_panel(
        &self,
        parent_tag: &NavigationTag,
        container_id: &NavigationContainerId,
        tag: &NavigationTag,
    ) {
        self.record(HandlerCall::OpenPanel {
            parent_tag: parent_tag.clone(),
            container_id: container_id.clone(),
            tag: tag.clone(),
        });
    }

    fn show_modal(
        &self,
        parent_tag: &NavigationTag,
        target_tag: &NavigationTag,
        request_code: i32,
        tag: &NavigationTag,
    ) {
        self.record(HandlerCall::ShowModal {
            parent_tag: parent_tag.clone(),
            target_tag: target_tag.clone(),
            request_code,
            tag: tag.clone(),
        });
    }

    fn hide_panel(&self, parent_tag: &NavigationTag, tag: &NavigationTag) {
        self.record(HandlerCall::HidePanel {
            parent_tag: parent_tag.clone(),
            tag: tag.clone(),
        });
    }

    fn deliver_back_pressed(&self, parent_tag: &NavigationTag, tag: &NavigationTag) {
        self.record(HandlerCall::DeliverBackPressed {
            parent_tag: parent_tag.clone(),
            tag: tag.clone(),
        });
    }

    fn remove_panel(&self, parent_tag: &NavigationTag, tag: &NavigationTag) {
        self.record(HandlerCall::RemovePanel {
            parent_tag: parent_tag.clone(),
            tag: tag.clone(),
        });
    }

    fn finish_active_screen(&self) {
        self.record(HandlerCall::FinishActiveScreen);
    }

    fn dismiss_keyboard(&self) -> Result<(), HandlerError> {
        self.record(HandlerCall::DismissKeyboard);
        if self.has_input_target.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(HandlerError::NoInputTarget)
        }
    }
}

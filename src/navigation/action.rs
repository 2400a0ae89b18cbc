use serde::{Deserialize, Serialize};

use super::state::{NavigationContainerId, NavigationState, NavigationTag};
use crate::store::Action;

/// Which visible siblings to hide when a fragment opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideType {
    HideNone,
    /// Visible siblings mounted in the same container.
    #[default]
    HideAllInContainer,
    /// Every visible sibling.
    HideAll,
}

/// Which siblings to tear down when a fragment opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceType {
    #[default]
    None,
    ReplaceAllVisibleInContainer,
    ReplaceAllVisible,
    /// Every sibling, visible or not.
    ReplaceAll,
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationAction {
    StartActivity {
        tag: NavigationTag,
        #[serde(default)]
        replace_current_activity: bool,
        #[serde(default)]
        request_code: Option<i32>,
        #[serde(default = "yes")]
        hide_keyboard: bool,
    },
    OpenFragment {
        tag: NavigationTag,
        parent_tag: NavigationTag,
        container_id: NavigationContainerId,
        #[serde(default)]
        hide_type: HideType,
        #[serde(default)]
        replace_type: ReplaceType,
        #[serde(default = "yes")]
        hide_keyboard: bool,
    },
    ShowDialogFragment {
        tag: NavigationTag,
        parent_tag: NavigationTag,
        target_tag: NavigationTag,
        request_code: i32,
        #[serde(default = "yes")]
        hide_keyboard: bool,
    },
    /// The platform reports that a component came to the foreground.
    ComponentStarted { tag: NavigationTag },
    /// The platform reports a visibility change it initiated itself.
    VisibilityChanged { tag: NavigationTag, is_visible: bool },
    DispatchBackPressed { parent_tag: NavigationTag },
    CloseFragment { tag: NavigationTag },
    FinishActivity,
    /// Emitted for every component right before it leaves the tree.
    RemovingComponent { tag: NavigationTag },
    /// Installs a tree computed by the navigation side effect.
    ReplaceState { state: NavigationState },
    HideKeyboard,
}

impl NavigationAction {
    /// Start a screen on top of the active one, hiding the keyboard.
    pub fn start_activity(tag: impl Into<NavigationTag>) -> Self {
        NavigationAction::StartActivity {
            tag: tag.into(),
            replace_current_activity: false,
            request_code: None,
            hide_keyboard: true,
        }
    }

    /// Open a fragment with the default policies: hide visible siblings in
    /// the same container, replace nothing, hide the keyboard.
    pub fn open_fragment(
        tag: impl Into<NavigationTag>,
        parent_tag: impl Into<NavigationTag>,
        container_id: impl Into<NavigationContainerId>,
    ) -> Self {
        NavigationAction::OpenFragment {
            tag: tag.into(),
            parent_tag: parent_tag.into(),
            container_id: container_id.into(),
            hide_type: HideType::default(),
            replace_type: ReplaceType::default(),
            hide_keyboard: true,
        }
    }

    pub fn close_fragment(tag: impl Into<NavigationTag>) -> Self {
        NavigationAction::CloseFragment { tag: tag.into() }
    }

    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            NavigationAction::StartActivity { .. } => "start_activity",
            NavigationAction::OpenFragment { .. } => "open_fragment",
            NavigationAction::ShowDialogFragment { .. } => "show_dialog_fragment",
            NavigationAction::ComponentStarted { .. } => "component_started",
            NavigationAction::VisibilityChanged { .. } => "visibility_changed",
            NavigationAction::DispatchBackPressed { .. } => "dispatch_back_pressed",
            NavigationAction::CloseFragment { .. } => "close_fragment",
            NavigationAction::FinishActivity => "finish_activity",
            NavigationAction::RemovingComponent { .. } => "removing_component",
            NavigationAction::ReplaceState { .. } => "replace_state",
            NavigationAction::HideKeyboard => "hide_keyboard",
        }
    }
}

/// An application action type that can carry navigation actions.
pub trait NavigationIntent: Action + From<NavigationAction> {
    fn as_navigation(&self) -> Option<&NavigationAction>;
}

impl NavigationIntent for NavigationAction {
    fn as_navigation(&self) -> Option<&NavigationAction> {
        Some(self)
    }
}

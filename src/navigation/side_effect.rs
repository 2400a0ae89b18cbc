//! The navigation state machine.
//!
//! Each navigation action is handled in three steps: copy the current tree,
//! transform the copy, commit it with `ReplaceState`. Handler calls that make
//! the change visible come after the commit, so subscribers see the new tree
//! before the platform does. Removals are announced only after the whole edit
//! is known to apply; a rejected request leaves no trace.

use std::sync::Arc;

use super::action::{HideType, NavigationAction, NavigationIntent, ReplaceType};
use super::handler::NavigationHandler;
use super::state::{
    ActivityNode, FragmentNode, NavigationComponent, NavigationContainerId, NavigationState,
    NavigationTag,
};
use crate::enhancers::SideEffect;
use crate::store::{Dispatcher, State};

/// Extracts the navigation tree from the application state.
pub type SubStateAccessor<S> = Arc<dyn Fn(&S) -> NavigationState + Send + Sync>;

pub struct NavigationSideEffect<S> {
    sub_state: SubStateAccessor<S>,
    handler: Arc<dyn NavigationHandler>,
}

impl NavigationSideEffect<NavigationState> {
    /// Engine for a store whose whole state is the navigation tree.
    pub fn standalone(handler: Arc<dyn NavigationHandler>) -> Self {
        Self::new(NavigationState::clone, handler)
    }
}

impl<S> NavigationSideEffect<S> {
    pub fn new(
        sub_state: impl Fn(&S) -> NavigationState + Send + Sync + 'static,
        handler: Arc<dyn NavigationHandler>,
    ) -> Self {
        Self {
            sub_state: Arc::new(sub_state),
            handler,
        }
    }

    fn commit<A: NavigationIntent>(
        &self,
        working: &NavigationState,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        dispatcher.dispatch(A::from(NavigationAction::ReplaceState {
            state: working.clone(),
        }));
    }

    fn dismiss_keyboard(&self) {
        if let Err(err) = self.handler.dismiss_keyboard() {
            tracing::debug!(error = %err, "Keyboard dismissal failed, continuing");
        }
    }

    /// Report the removal of `root` and its subtree, leaves first.
    ///
    /// `snapshot` is the tree as it was before the removal.
    fn announce_removal<A: NavigationIntent>(
        &self,
        snapshot: &NavigationState,
        root: &NavigationTag,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        for tag in snapshot.descendants_bottom_up(root) {
            dispatcher.dispatch(A::from(NavigationAction::RemovingComponent { tag: tag.clone() }));
            if let Some(NavigationComponent::Fragment(fragment)) = snapshot.get(&tag) {
                self.handler.remove_panel(&fragment.parent_tag, &fragment.tag);
            }
        }
    }

    fn start_activity<A: NavigationIntent>(
        &self,
        snapshot: NavigationState,
        tag: &NavigationTag,
        replace_current_activity: bool,
        request_code: Option<i32>,
        hide_keyboard: bool,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        let mut working = snapshot.clone();
        let mut parent_tag = working.active_screen_tag().cloned();
        let mut replaced = None;
        if replace_current_activity {
            let current = parent_tag.as_ref().and_then(|active| working.get(active)).cloned();
            if let Some(current) = current {
                parent_tag = current.parent_tag().cloned();
                working.remove_subtree(current.tag());
                replaced = Some(current.tag().clone());
            }
        }

        let inserted = working.insert(ActivityNode {
            tag: tag.clone(),
            request_code,
            is_visible: true,
            parent_tag,
        });
        if let Err(err) = inserted.and_then(|()| working.set_active_screen(Some(tag.clone()))) {
            tracing::warn!(error = %err, %tag, "Ignoring start_activity");
            return;
        }

        if let Some(replaced) = &replaced {
            self.announce_removal(&snapshot, replaced, dispatcher);
        }
        self.commit(&working, dispatcher);

        if hide_keyboard {
            self.dismiss_keyboard();
        }
        self.handler.start_screen(tag, request_code);
    }

    #[allow(clippy::too_many_arguments)]
    fn open_fragment<A: NavigationIntent>(
        &self,
        snapshot: NavigationState,
        tag: &NavigationTag,
        parent_tag: &NavigationTag,
        container_id: &NavigationContainerId,
        hide_type: HideType,
        replace_type: ReplaceType,
        hide_keyboard: bool,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        if !snapshot.contains(parent_tag) {
            tracing::warn!(
                %tag,
                parent = %parent_tag,
                "Ignoring open_fragment, parent is not in the tree"
            );
            return;
        }

        let mut working = snapshot.clone();
        let doomed: Vec<NavigationTag> = match replace_type {
            ReplaceType::None => Vec::new(),
            ReplaceType::ReplaceAllVisibleInContainer => working
                .visible_children_in_container(parent_tag, container_id)
                .into_iter()
                .map(|fragment| fragment.tag.clone())
                .collect(),
            ReplaceType::ReplaceAllVisible => fragment_tags(working.visible_children(parent_tag)),
            ReplaceType::ReplaceAll => fragment_tags(working.children(parent_tag)),
        };
        let doomed: Vec<NavigationTag> =
            doomed.into_iter().filter(|sibling| sibling != tag).collect();
        for sibling in &doomed {
            working.remove_subtree(sibling);
        }

        let sunset: Vec<FragmentNode> = match hide_type {
            HideType::HideNone => Vec::new(),
            HideType::HideAllInContainer => working
                .visible_children_in_container(parent_tag, container_id)
                .into_iter()
                .cloned()
                .collect(),
            HideType::HideAll => working
                .visible_children(parent_tag)
                .into_iter()
                .filter_map(NavigationComponent::as_fragment)
                .cloned()
                .collect(),
        };

        let inserted = working.insert(FragmentNode {
            tag: tag.clone(),
            container_id: container_id.clone(),
            is_visible: true,
            parent_tag: parent_tag.clone(),
        });
        if let Err(err) = inserted {
            tracing::warn!(error = %err, %tag, "Ignoring open_fragment");
            return;
        }

        for sibling in &doomed {
            self.announce_removal(&snapshot, sibling, dispatcher);
        }
        for sibling in sunset.iter().filter(|sibling| &sibling.tag != tag) {
            self.handler.hide_panel(&sibling.parent_tag, &sibling.tag);
        }
        self.commit(&working, dispatcher);

        if hide_keyboard {
            self.dismiss_keyboard();
        }
        self.handler.open_panel(parent_tag, container_id, tag);
    }

    fn close_fragment<A: NavigationIntent>(
        &self,
        snapshot: NavigationState,
        tag: &NavigationTag,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        let Some(closed) = snapshot.get(tag).and_then(NavigationComponent::as_fragment).cloned()
        else {
            tracing::debug!(%tag, "close_fragment for a tag that is not an open fragment");
            return;
        };

        let mut working = snapshot.clone();
        working.remove_subtree(tag);
        self.announce_removal(&snapshot, tag, dispatcher);
        self.commit(&working, dispatcher);

        let survivors =
            working.visible_children_in_container(&closed.parent_tag, &closed.container_id);
        for sibling in survivors {
            self.handler
                .open_panel(&sibling.parent_tag, &sibling.container_id, &sibling.tag);
        }
    }

    fn finish_activity<A: NavigationIntent>(
        &self,
        snapshot: NavigationState,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        let Some(active) = snapshot.active_screen_tag().cloned() else {
            tracing::debug!("finish_activity without an active screen");
            self.handler.finish_active_screen();
            return;
        };
        let parent_tag = snapshot.get(&active).and_then(NavigationComponent::parent_tag).cloned();

        let mut working = snapshot.clone();
        working.remove_subtree(&active);
        if let Err(err) = working.set_active_screen(parent_tag) {
            tracing::warn!(error = %err, "Parent of the finished screen cannot become active");
            working.clear_active_screen();
        }
        self.announce_removal(&snapshot, &active, dispatcher);
        self.commit(&working, dispatcher);

        let Some(parent) = working.active_screen().cloned() else {
            self.handler.finish_active_screen();
            return;
        };

        // Replay the surviving visible fragments onto the resumed screen,
        // ancestors before descendants.
        let restored: Vec<FragmentNode> = working
            .descendants_bottom_up(&parent.tag)
            .iter()
            .rev()
            .filter_map(|tag| working.get(tag))
            .filter_map(NavigationComponent::as_fragment)
            .filter(|fragment| fragment.is_visible)
            .cloned()
            .collect();
        for fragment in &restored {
            self.handler
                .open_panel(&fragment.parent_tag, &fragment.container_id, &fragment.tag);
        }
        self.handler.start_screen(&parent.tag, parent.request_code);
    }

    fn component_started<A: NavigationIntent>(
        &self,
        mut working: NavigationState,
        tag: &NavigationTag,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        let is_screen = matches!(working.get(tag), Some(NavigationComponent::Activity(_)));
        if !is_screen || working.active_screen_tag() == Some(tag) {
            return;
        }
        if working.set_active_screen(Some(tag.clone())).is_ok() {
            tracing::debug!(%tag, "Started screen became active");
            self.commit(&working, dispatcher);
        }
    }

    fn visibility_changed<A: NavigationIntent>(
        &self,
        mut working: NavigationState,
        tag: &NavigationTag,
        is_visible: bool,
        dispatcher: &dyn Dispatcher<A>,
    ) {
        let Some(component) = working.get_mut(tag) else {
            return;
        };
        if component.is_visible() == is_visible {
            return;
        }
        component.set_visible(is_visible);
        self.commit(&working, dispatcher);
    }
}

fn fragment_tags(components: Vec<&NavigationComponent>) -> Vec<NavigationTag> {
    components
        .into_iter()
        .filter_map(NavigationComponent::as_fragment)
        .map(|fragment| fragment.tag.clone())
        .collect()
}

impl<S: State, A: NavigationIntent> SideEffect<S, A> for NavigationSideEffect<S> {
    fn react(&self, state: &dyn Fn() -> S, action: &A, dispatcher: &dyn Dispatcher<A>) {
        let Some(action) = action.as_navigation() else {
            return;
        };
        match action {
            NavigationAction::RemovingComponent { .. }
            | NavigationAction::ReplaceState { .. } => return,
            _ => tracing::debug!(action = action.name(), "Navigation action"),
        }

        let working = (self.sub_state)(&state());
        match action {
            NavigationAction::StartActivity {
                tag,
                replace_current_activity,
                request_code,
                hide_keyboard,
            } => self.start_activity(
                working,
                tag,
                *replace_current_activity,
                *request_code,
                *hide_keyboard,
                dispatcher,
            ),
            NavigationAction::OpenFragment {
                tag,
                parent_tag,
                container_id,
                hide_type,
                replace_type,
                hide_keyboard,
            } => self.open_fragment(
                working,
                tag,
                parent_tag,
                container_id,
                *hide_type,
                *replace_type,
                *hide_keyboard,
                dispatcher,
            ),
            NavigationAction::ShowDialogFragment {
                tag,
                parent_tag,
                target_tag,
                request_code,
                hide_keyboard,
            } => {
                if *hide_keyboard {
                    self.dismiss_keyboard();
                }
                self.handler.show_modal(parent_tag, target_tag, *request_code, tag);
            }
            NavigationAction::ComponentStarted { tag } => {
                self.component_started(working, tag, dispatcher)
            }
            NavigationAction::VisibilityChanged { tag, is_visible } => {
                self.visibility_changed(working, tag, *is_visible, dispatcher)
            }
            NavigationAction::DispatchBackPressed { parent_tag } => {
                for child in working.visible_children(parent_tag) {
                    if let Some(fragment) = child.as_fragment() {
                        self.handler.deliver_back_pressed(&fragment.parent_tag, &fragment.tag);
                    }
                }
            }
            NavigationAction::CloseFragment { tag } => {
                self.close_fragment(working, tag, dispatcher)
            }
            NavigationAction::FinishActivity => self.finish_activity(working, dispatcher),
            NavigationAction::HideKeyboard => self.dismiss_keyboard(),
            NavigationAction::RemovingComponent { .. } | NavigationAction::ReplaceState { .. } => {}
        }
    }
}

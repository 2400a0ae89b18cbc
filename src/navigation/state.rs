//! The navigation tree: screens (activities) and nested panels (fragments).

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::NavigationError;

/// Opaque identifier of a navigation component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationTag(String);

impl NavigationTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NavigationTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for NavigationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a mounting point that hosts fragments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationContainerId(String);

impl NavigationContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NavigationContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for NavigationContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityNode {
    pub tag: NavigationTag,
    /// Result code reported back to the parent screen, if started for a result.
    #[serde(default)]
    pub request_code: Option<i32>,
    #[serde(default = "visible")]
    pub is_visible: bool,
    /// `None` only for a root screen.
    #[serde(default)]
    pub parent_tag: Option<NavigationTag>,
}

/// A panel mounted in a container of a screen or of another panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentNode {
    pub tag: NavigationTag,
    pub container_id: NavigationContainerId,
    #[serde(default = "visible")]
    pub is_visible: bool,
    pub parent_tag: NavigationTag,
}

fn visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationComponent {
    Activity(ActivityNode),
    Fragment(FragmentNode),
}

impl NavigationComponent {
    pub fn tag(&self) -> &NavigationTag {
        match self {
            NavigationComponent::Activity(activity) => &activity.tag,
            NavigationComponent::Fragment(fragment) => &fragment.tag,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            NavigationComponent::Activity(activity) => activity.is_visible,
            NavigationComponent::Fragment(fragment) => fragment.is_visible,
        }
    }

    pub fn set_visible(&mut self, is_visible: bool) {
        match self {
            NavigationComponent::Activity(activity) => activity.is_visible = is_visible,
            NavigationComponent::Fragment(fragment) => fragment.is_visible = is_visible,
        }
    }

    pub fn parent_tag(&self) -> Option<&NavigationTag> {
        match self {
            NavigationComponent::Activity(activity) => activity.parent_tag.as_ref(),
            NavigationComponent::Fragment(fragment) => Some(&fragment.parent_tag),
        }
    }

    pub fn as_activity(&self) -> Option<&ActivityNode> {
        match self {
            NavigationComponent::Activity(activity) => Some(activity),
            NavigationComponent::Fragment(_) => None,
        }
    }

    pub fn as_fragment(&self) -> Option<&FragmentNode> {
        match self {
            NavigationComponent::Activity(_) => None,
            NavigationComponent::Fragment(fragment) => Some(fragment),
        }
    }
}

impl From<ActivityNode> for NavigationComponent {
    fn from(activity: ActivityNode) -> Self {
        NavigationComponent::Activity(activity)
    }
}

impl From<FragmentNode> for NavigationComponent {
    fn from(fragment: FragmentNode) -> Self {
        NavigationComponent::Fragment(fragment)
    }
}

/// Snapshot of the whole navigation tree.
///
/// Components are keyed by tag and kept in insertion order; re-inserting an
/// existing tag keeps its position. Published snapshots are never mutated:
/// work on a clone and install it with a replace-state action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    #[serde(default)]
    active_screen_tag: Option<NavigationTag>,
    #[serde(default)]
    components: IndexMap<NavigationTag, NavigationComponent>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_screen_tag(&self) -> Option<&NavigationTag> {
        self.active_screen_tag.as_ref()
    }

    pub fn active_screen(&self) -> Option<&ActivityNode> {
        self.active_screen_tag
            .as_ref()
            .and_then(|tag| self.get(tag))
            .and_then(NavigationComponent::as_activity)
    }

    pub fn get(&self, tag: &NavigationTag) -> Option<&NavigationComponent> {
        self.components.get(tag)
    }

    pub fn get_mut(&mut self, tag: &NavigationTag) -> Option<&mut NavigationComponent> {
        self.components.get_mut(tag)
    }

    pub fn contains(&self, tag: &NavigationTag) -> bool {
        self.components.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &NavigationComponent> {
        self.components.values()
    }

    /// Insert or replace a component.
    ///
    /// The parent must already exist and the new edge must not close a cycle.
    /// A tag already in the tree keeps its kind.
    pub fn insert(
        &mut self,
        component: impl Into<NavigationComponent>,
    ) -> Result<(), NavigationError> {
        let component = component.into();
        if let Some(existing) = self.get(component.tag()) {
            if std::mem::discriminant(existing) != std::mem::discriminant(&component) {
                return Err(NavigationError::KindMismatch {
                    tag: component.tag().clone(),
                });
            }
        }
        if let Some(parent) = component.parent_tag() {
            if !self.contains(parent) {
                return Err(NavigationError::MissingParent {
                    tag: component.tag().clone(),
                    parent: parent.clone(),
                });
            }
            if self.is_ancestor_or_self(component.tag(), parent) {
                return Err(NavigationError::Cycle {
                    tag: component.tag().clone(),
                    parent: parent.clone(),
                });
            }
        }
        self.components.insert(component.tag().clone(), component);
        Ok(())
    }

    /// Remove a single component, keeping the order of the rest.
    ///
    /// Children are left untouched; use bottom-up teardown to remove subtrees.
    pub fn remove(&mut self, tag: &NavigationTag) -> Option<NavigationComponent> {
        let removed = self.components.shift_remove(tag);
        if self.active_screen_tag.as_ref() == Some(tag) {
            self.active_screen_tag = None;
        }
        removed
    }

    /// Remove `root` and its whole subtree, returning the removed tags leaves
    /// first.
    pub fn remove_subtree(&mut self, root: &NavigationTag) -> Vec<NavigationTag> {
        let doomed = self.descendants_bottom_up(root);
        for tag in &doomed {
            self.remove(tag);
        }
        doomed
    }

    pub fn clear_active_screen(&mut self) {
        self.active_screen_tag = None;
    }

    /// Set the active screen. The tag must name an activity.
    pub fn set_active_screen(&mut self, tag: Option<NavigationTag>) -> Result<(), NavigationError> {
        if let Some(tag) = &tag {
            match self.get(tag) {
                Some(NavigationComponent::Activity(_)) => {}
                Some(NavigationComponent::Fragment(_)) => {
                    return Err(NavigationError::NotAnActivity { tag: tag.clone() })
                }
                None => return Err(NavigationError::UnknownComponent { tag: tag.clone() }),
            }
        }
        self.active_screen_tag = tag;
        Ok(())
    }

    /// Direct children of `parent`, in insertion order.
    pub fn children(&self, parent: &NavigationTag) -> Vec<&NavigationComponent> {
        self.components
            .values()
            .filter(|component| component.parent_tag() == Some(parent))
            .collect()
    }

    pub fn visible_children(&self, parent: &NavigationTag) -> Vec<&NavigationComponent> {
        self.children(parent)
            .into_iter()
            .filter(|component| component.is_visible())
            .collect()
    }

    /// Visible fragments of `parent` mounted in `container`.
    pub fn visible_children_in_container(
        &self,
        parent: &NavigationTag,
        container: &NavigationContainerId,
    ) -> Vec<&FragmentNode> {
        self.visible_children(parent)
            .into_iter()
            .filter_map(NavigationComponent::as_fragment)
            .filter(|fragment| &fragment.container_id == container)
            .collect()
    }

    /// `root` and all of its transitive children, every node listed after all
    /// of its descendants.
    ///
    /// Discovery is breadth-first; the result is the discovery order reversed.
    /// An unknown `root` yields just `root`.
    pub fn descendants_bottom_up(&self, root: &NavigationTag) -> Vec<NavigationTag> {
        let mut discovered = vec![root.clone()];
        let mut queue = VecDeque::from([root.clone()]);
        while let Some(tag) = queue.pop_front() {
            for child in self.children(&tag) {
                discovered.push(child.tag().clone());
                queue.push_back(child.tag().clone());
            }
        }
        discovered.reverse();
        discovered
    }

    /// Check the tree invariants over the whole snapshot: every parent
    /// exists, fragments have parents, no cycles, and the active screen is an
    /// activity.
    pub fn validate(&self) -> Result<(), NavigationError> {
        for (key, component) in &self.components {
            if key != component.tag() {
                return Err(NavigationError::KeyMismatch {
                    key: key.clone(),
                    tag: component.tag().clone(),
                });
            }
            if let Some(parent) = component.parent_tag() {
                if !self.contains(parent) {
                    return Err(NavigationError::MissingParent {
                        tag: key.clone(),
                        parent: parent.clone(),
                    });
                }
                if self.is_ancestor_or_self(key, parent) {
                    return Err(NavigationError::Cycle {
                        tag: key.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }
        if let Some(tag) = &self.active_screen_tag {
            match self.get(tag) {
                Some(NavigationComponent::Activity(_)) => {}
                Some(NavigationComponent::Fragment(_)) => {
                    return Err(NavigationError::NotAnActivity { tag: tag.clone() })
                }
                None => return Err(NavigationError::UnknownComponent { tag: tag.clone() }),
            }
        }
        Ok(())
    }

    /// Whether `candidate` is `start` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: &NavigationTag, start: &NavigationTag) -> bool {
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(tag) = current {
            if tag == candidate {
                return true;
            }
            // Bounded walk in case the map already holds a cycle.
            steps += 1;
            if steps > self.components.len() {
                return true;
            }
            current = self.get(tag).and_then(NavigationComponent::parent_tag);
        }
        false
    }
}

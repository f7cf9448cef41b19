//! Focus handling.
//!
//! An element can receive focus when it is focusable and not disabled. Focus
//! managers (every surface is one) keep the focusable elements of their
//! subtree in pre-order and make sure at most one of them is focused at a
//! time. The list is updated as nodes are attached and detached below the
//! manager, and can be walked with [`Scene::focus_next`] and
//! [`Scene::focus_prev`].

use tracing::debug;

use crate::error::SceneResult;
use crate::event::{EventKind, EventPayload};
use crate::node::NodeId;
use crate::scene::Scene;

/// Focus state of a focus manager.
#[derive(Debug, Default)]
pub(crate) struct FocusTracker {
    /// Focusable elements of the subtree, in pre-order.
    pub(crate) elements: Vec<NodeId>,
    pub(crate) focused: Option<NodeId>,
}

impl FocusTracker {
    fn position(&self, id: NodeId) -> Option<usize> {
        self.elements.iter().position(|&element| element == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Prev,
}

impl Scene {
    // ========================================================================
    // Elements
    // ========================================================================

    /// Gives focus to the element.
    ///
    /// Does nothing if the element is not focusable, disabled or already
    /// focused. Otherwise runs the content hook and emits `Focus`; the
    /// enclosing focus managers blur the element they had focused.
    pub fn focus(&mut self, id: NodeId) {
        let Some(state) = self.elements.get_mut(id) else {
            return;
        };
        if !state.focusable || state.focused || state.disabled {
            return;
        }
        state.focused = true;
        debug!(?id, "element focused");
        self.run_content_hook(id);
        self.emit(id, EventKind::Focus, EventPayload::None);
    }

    /// Removes focus from the element, then emits `Blur`.
    pub fn blur(&mut self, id: NodeId) {
        let Some(state) = self.elements.get_mut(id) else {
            return;
        };
        if !state.focusable || !state.focused {
            return;
        }
        state.focused = false;
        debug!(?id, "element blurred");
        self.run_content_hook(id);
        self.emit(id, EventKind::Blur, EventPayload::None);
    }

    /// Disables the element, blurring it first if needed.
    pub fn disable(&mut self, id: NodeId) {
        if self.elements.get(id).is_none_or(|state| state.disabled) {
            return;
        }
        self.blur(id);
        if let Some(state) = self.elements.get_mut(id) {
            state.disabled = true;
        }
        self.run_content_hook(id);
        self.emit(id, EventKind::Disable, EventPayload::None);
    }

    /// Enables the element. Focus is not restored.
    pub fn enable(&mut self, id: NodeId) {
        let Some(state) = self.elements.get_mut(id) else {
            return;
        };
        if !state.disabled {
            return;
        }
        state.disabled = false;
        self.run_content_hook(id);
        self.emit(id, EventKind::Enable, EventPayload::None);
    }

    /// Changes whether the element can receive focus.
    ///
    /// The focus managers above the element add or drop it right away. A
    /// focused element is blurred before it stops being focusable.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) {
        if self
            .elements
            .get(id)
            .is_none_or(|state| state.focusable == focusable)
        {
            return;
        }
        if !focusable {
            self.blur(id);
        }
        if let Some(state) = self.elements.get_mut(id) {
            state.focusable = focusable;
        }

        for manager in self.managers_above(id) {
            if focusable {
                self.track(manager, vec![id]);
            } else if let Some(tracker) = self.trackers.get_mut(manager) {
                tracker.elements.retain(|&element| element != id);
            }
        }
    }

    /// Returns true if the element has focus.
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.elements.get(id).is_some_and(|state| state.focused)
    }

    /// Returns true if the element can receive focus.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.elements.get(id).is_some_and(|state| state.focusable)
    }

    /// Returns true if the element is disabled.
    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.elements.get(id).is_some_and(|state| state.disabled)
    }

    // ========================================================================
    // Managers
    // ========================================================================

    /// Creates a focus manager node, appended to `parent` if given.
    pub fn create_focus_manager(&mut self, parent: Option<NodeId>) -> SceneResult<NodeId> {
        let id = self.create_node();
        self.trackers.insert(id, FocusTracker::default());
        if let Some(parent) = parent {
            if let Err(err) = self.append(parent, id) {
                self.nodes.remove(id);
                self.trackers.remove(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Returns true if `id` tracks focus for its subtree.
    pub fn is_focus_manager(&self, id: NodeId) -> bool {
        self.trackers.contains_key(id)
    }

    /// The element currently focused below `manager`.
    pub fn focused_element(&self, manager: NodeId) -> Option<NodeId> {
        self.trackers.get(manager).and_then(|tracker| tracker.focused)
    }

    /// The focusable elements below `manager`, in pre-order.
    pub fn focusable_elements(&self, manager: NodeId) -> &[NodeId] {
        self.trackers
            .get(manager)
            .map(|tracker| tracker.elements.as_slice())
            .unwrap_or_default()
    }

    /// Focuses the element after the focused one, wrapping around.
    ///
    /// Starts at the first element when nothing is focused. If the next
    /// element is disabled, focus stays where it is. Does nothing with fewer
    /// than two focusable elements.
    pub fn focus_next(&mut self, manager: NodeId) {
        self.step_focus(manager, Direction::Next)
    }

    /// Focuses the element before the focused one, wrapping around.
    ///
    /// Starts at the last element when nothing is focused.
    pub fn focus_prev(&mut self, manager: NodeId) {
        self.step_focus(manager, Direction::Prev)
    }

    fn step_focus(&mut self, manager: NodeId, direction: Direction) {
        let Some(tracker) = self.trackers.get(manager) else {
            return;
        };
        let count = tracker.elements.len();
        if count < 2 {
            return;
        }

        let current = tracker
            .focused
            .and_then(|focused| tracker.position(focused))
            .map(|index| index as i64);
        let (start, delta) = match direction {
            Direction::Next => (current.unwrap_or(-1), 1),
            Direction::Prev => (current.unwrap_or(count as i64), -1),
        };

        let target = tracker.elements[(start + delta).rem_euclid(count as i64) as usize];
        self.focus(target);
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    fn managers_above(&self, id: NodeId) -> Vec<NodeId> {
        let mut managers = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.trackers.contains_key(node) {
                managers.push(node);
            }
            current = self.parent(node);
        }
        managers
    }

    /// Inserts `added` (already in pre-order) after the last tracked element
    /// that comes before `added[0]` in the manager's subtree.
    fn track(&mut self, manager: NodeId, mut added: Vec<NodeId>) {
        let Some(tracker) = self.trackers.get(manager) else {
            return;
        };
        added.retain(|&id| tracker.position(id).is_none());
        let Some(&first) = added.first() else {
            return;
        };

        let mut index = 0;
        for node in self.descendants(manager) {
            if node == first {
                break;
            }
            if let Some(position) = tracker.position(node) {
                index = position + 1;
            }
        }

        if let Some(tracker) = self.trackers.get_mut(manager) {
            tracker.elements.splice(index..index, added);
        }
    }

    pub(crate) fn track_attached(&mut self, manager: NodeId, child: NodeId) {
        let added: Vec<NodeId> = self
            .descendants(child)
            .into_iter()
            .filter(|&id| self.is_focusable(id))
            .collect();
        self.track(manager, added);
    }

    pub(crate) fn track_detached(&mut self, manager: NodeId, child: NodeId) {
        let removed = self.descendants(child);
        let Some(tracker) = self.trackers.get_mut(manager) else {
            return;
        };
        tracker.elements.retain(|id| !removed.contains(id));

        let lost = tracker.focused.filter(|focused| removed.contains(focused));
        if let Some(focused) = lost {
            tracker.focused = None;
            debug!(?manager, ?focused, "focused element left the manager");
            self.blur(focused);
        }
    }

    pub(crate) fn track_focus(&mut self, manager: NodeId, target: NodeId) {
        let Some(tracker) = self.trackers.get_mut(manager) else {
            return;
        };
        if tracker.focused == Some(target) {
            return;
        }
        let previous = tracker.focused.replace(target);
        if let Some(previous) = previous {
            self.blur(previous);
        }
    }

    pub(crate) fn track_blur(&mut self, manager: NodeId, target: NodeId) {
        if let Some(tracker) = self.trackers.get_mut(manager) {
            if tracker.focused == Some(target) {
                tracker.focused = None;
            }
        }
    }
}

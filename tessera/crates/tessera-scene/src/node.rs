//! Tree structure and event bubbling.
//!
//! Every node has at most one parent and appears once in its parent's child
//! list. The order of that list is meaningful: it is the traversal order and,
//! for elements, the paint order (later children are drawn over earlier
//! ones).

use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{SceneError, SceneResult};
use crate::event::{Event, EventKind, EventKinds, EventPayload, Listener, ListenerId};
use crate::scene::Scene;

slotmap::new_key_type! {
    /// A key identifying a node of a [`Scene`].
    pub struct NodeId;
}

/// Tree links and listeners of one node.
#[derive(Default)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
}

impl Scene {
    // ========================================================================
    // Creation
    // ========================================================================

    /// Creates a detached plain node.
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.insert(NodeData::default())
    }

    /// Detaches `node` from its parent, then frees it and its whole subtree.
    pub fn destroy(&mut self, node: NodeId) -> SceneResult<()> {
        let parent = self.try_parent(node)?;
        if let Some(parent) = parent {
            self.remove(parent, node);
        }

        let subtree = self.descendants(node);
        for id in &subtree {
            self.nodes.remove(*id);
            self.elements.remove(*id);
            self.trackers.remove(*id);
            self.surfaces.remove(*id);
        }
        debug!(?node, freed = subtree.len(), "node destroyed");
        Ok(())
    }

    // ========================================================================
    // Tree queries
    // ========================================================================

    /// Returns true if `node` is alive.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Returns the parent of `node`.
    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|data| data.parent)
    }

    /// Returns the children of `node`, in order. Empty for unknown nodes.
    #[inline]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[][..], |data| data.children.as_slice())
    }

    /// Returns `node` and all its descendants, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        if self.contains(node) {
            self.collect_descendants(node, &mut result);
        }
        result
    }

    fn collect_descendants(&self, node: NodeId, result: &mut Vec<NodeId>) {
        result.push(node);
        for &child in self.children(node) {
            self.collect_descendants(child, result);
        }
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn try_parent(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        self.nodes
            .get(node)
            .map(|data| data.parent)
            .ok_or(SceneError::NodeNotFound(node))
    }

    // ========================================================================
    // Tree mutation
    // ========================================================================

    /// Inserts `child` into `parent` at `index`.
    ///
    /// The child is first removed from its previous parent. `index` is clamped
    /// to the number of children. Emits `Attach` on `parent`, then `Adopt` on
    /// `child`.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> SceneResult<()> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let old_parent = self.try_parent(child)?;
        if self.is_ancestor(child, parent) {
            warn!(?parent, ?child, "rejecting insert that would create a cycle");
            return Err(SceneError::CircularReference { parent, child });
        }

        if let Some(old_parent) = old_parent {
            self.remove(old_parent, child);
        }

        // Listeners of the removal may have destroyed either node.
        if !self.contains(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        let Some(data) = self.nodes.get_mut(parent) else {
            return Err(SceneError::NodeNotFound(parent));
        };
        let index = index.min(data.children.len());
        data.children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        debug!(?parent, ?child, index, "node attached");

        self.emit(parent, EventKind::Attach, EventPayload::Node { node: child });
        self.emit(child, EventKind::Adopt, EventPayload::Parent { old_parent });
        Ok(())
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.insert(parent, child, 0)
    }

    /// Inserts `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.insert(parent, child, usize::MAX)
    }

    /// Removes `child` from `parent`.
    ///
    /// Does nothing if `child` is not a direct child of `parent`. Emits
    /// `Detach` on `parent`, then `Orphan` on `child`.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) {
        let Some(data) = self.nodes.get_mut(parent) else {
            return;
        };
        let Some(index) = data.children.iter().position(|&id| id == child) else {
            return;
        };
        data.children.remove(index);
        if let Some(data) = self.nodes.get_mut(child) {
            data.parent = None;
        }
        debug!(?parent, ?child, "node detached");

        self.emit(parent, EventKind::Detach, EventPayload::Node { node: child });
        self.emit(
            child,
            EventKind::Orphan,
            EventPayload::Parent {
                old_parent: Some(parent),
            },
        );
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Registers `handler` on `node` for every kind in `kinds`.
    ///
    /// The returned id removes the handler with [`Scene::off`]. Registering on
    /// an unknown node does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use tessera_scene::{EventKind, EventPayload, Scene};
    ///
    /// let mut scene = Scene::new();
    /// let node = scene.create_node();
    /// let seen = Rc::new(Cell::new(0));
    ///
    /// let counter = Rc::clone(&seen);
    /// scene.on(node, "click keyup", move |_, _| counter.set(counter.get() + 1));
    /// scene.emit(node, EventKind::Click, EventPayload::None);
    /// scene.emit(node, EventKind::KeyUp, EventPayload::None);
    /// scene.emit(node, EventKind::KeyDown, EventPayload::None);
    /// assert_eq!(seen.get(), 2);
    /// ```
    pub fn on<F>(&mut self, node: NodeId, kinds: impl Into<EventKinds>, handler: F) -> ListenerId
    where
        F: Fn(&mut Scene, &mut Event) + 'static,
    {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        let handler: Listener = Rc::new(handler);

        if let Some(data) = self.nodes.get_mut(node) {
            for kind in kinds.into().iter() {
                data.listeners
                    .entry(kind)
                    .or_default()
                    .push((id, Rc::clone(&handler)));
            }
        }
        id
    }

    /// Removes the listener `id` from the given kinds of `node`.
    pub fn off(&mut self, node: NodeId, kinds: impl Into<EventKinds>, id: ListenerId) {
        let Some(data) = self.nodes.get_mut(node) else {
            return;
        };
        for kind in kinds.into().iter() {
            if let Some(list) = data.listeners.get_mut(&kind) {
                list.retain(|(listener, _)| *listener != id);
            }
        }
    }

    /// Removes the listeners of the given kinds, or all of them with `None`.
    pub fn clear_listeners(&mut self, node: NodeId, kinds: Option<EventKinds>) {
        let Some(data) = self.nodes.get_mut(node) else {
            return;
        };
        match kinds {
            None => data.listeners.clear(),
            Some(kinds) => {
                for kind in kinds.iter() {
                    data.listeners.remove(&kind);
                }
            }
        }
    }

    /// Number of listeners of `kind` registered on `node`.
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.nodes
            .get(node)
            .and_then(|data| data.listeners.get(&kind))
            .map_or(0, Vec::len)
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Emits an event on `node` and bubbles it up to the root.
    ///
    /// At each node, built-in reactions run first (element placement on
    /// `Adopt`/`Orphan`, focus tracking on surfaces and focus managers), then
    /// the listeners in registration order. The listener list is captured
    /// before the first call, so listeners may register or remove listeners
    /// freely; the change applies to the next emission.
    pub fn emit(&mut self, node: NodeId, kind: EventKind, payload: EventPayload) {
        if !self.contains(node) {
            return;
        }
        let mut event = Event::new(kind, node, payload);
        let mut current = Some(node);

        while let Some(id) = current {
            event.set_current(id);
            self.react(id, &mut event);
            if event.is_immediate_stopped() {
                return;
            }

            let listeners: SmallVec<[Listener; 4]> = self
                .nodes
                .get(id)
                .and_then(|data| data.listeners.get(&kind))
                .map(|list| list.iter().map(|(_, listener)| Rc::clone(listener)).collect())
                .unwrap_or_default();

            for listener in listeners {
                listener(self, &mut event);
                if event.is_immediate_stopped() {
                    return;
                }
            }

            if event.is_propagation_stopped() {
                return;
            }
            current = self.parent(id);
        }
    }

    /// Built-in reactions of `node` to an event passing through it.
    fn react(&mut self, node: NodeId, event: &mut Event) {
        match event.kind() {
            EventKind::Adopt if event.target() == node => self.on_adopt(node, event),
            EventKind::Orphan if event.target() == node => self.on_orphan(node, event),
            EventKind::Attach | EventKind::Detach if self.trackers.contains_key(node) => {
                if let Some(child) = event.node() {
                    if event.kind() == EventKind::Attach {
                        self.track_attached(node, child);
                    } else {
                        self.track_detached(node, child);
                    }
                }
            }
            EventKind::Focus | EventKind::Blur
                if event.target() != node && self.trackers.contains_key(node) =>
            {
                if event.kind() == EventKind::Focus {
                    self.track_focus(node, event.target());
                } else {
                    self.track_blur(node, event.target());
                }
            }
            _ => {}
        }
    }
}

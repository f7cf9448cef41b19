//! The scene arena.

use std::fmt;

use slotmap::{SecondaryMap, SlotMap};
use tessera_buffer::TileBuffer;

use crate::element::ElementState;
use crate::focus::FocusTracker;
use crate::node::{NodeData, NodeId};

/// Owns every node of a UI and the surfaces they are drawn on.
///
/// Nodes are addressed by [`NodeId`]. What a node can do depends on the state
/// attached to it: a plain node only takes part in the tree and in event
/// bubbling, an element also has a position, a size and content, and a
/// surface owns a [`TileBuffer`] and tracks the focusable elements below it.
///
/// Operations are spread over several modules: tree and events in
/// [`node`](crate::node), elements in [`element`](crate::element), focus in
/// [`focus`](crate::focus), compositing in [`surface`](crate::surface) and
/// input routing in [`input`](crate::input).
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    pub(crate) elements: SecondaryMap<NodeId, ElementState>,
    pub(crate) trackers: SecondaryMap<NodeId, FocusTracker>,
    pub(crate) surfaces: SecondaryMap<NodeId, TileBuffer>,
    pub(crate) next_listener: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            elements: SecondaryMap::new(),
            trackers: SecondaryMap::new(),
            surfaces: SecondaryMap::new(),
            next_listener: 0,
        }
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the scene has no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.nodes.len())
            .field("elements", &self.elements.len())
            .field("focus_managers", &self.trackers.len())
            .field("surfaces", &self.surfaces.len())
            .finish()
    }
}

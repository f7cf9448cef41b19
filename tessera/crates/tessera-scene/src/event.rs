//! Scene events.
//!
//! Events are emitted on a node and bubble up through its ancestors. They
//! never reach descendants. A listener receives the scene itself, so it can
//! mutate the tree or emit further events while handling one.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tessera_input::{KeyEventData, KeyEventKind, MouseEventData, MouseEventKind};
use tracing::debug;

use crate::node::NodeId;
use crate::scene::Scene;

/// Every kind of event a node can emit or listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A child was inserted into the node. Payload: [`EventPayload::Node`].
    Attach,
    /// A child was removed from the node. Payload: [`EventPayload::Node`].
    Detach,
    /// The node got a parent. Payload: [`EventPayload::Parent`].
    Adopt,
    /// The node lost its parent. Payload: [`EventPayload::Parent`].
    Orphan,
    /// The element changed size.
    Resize,
    /// The element gained focus.
    Focus,
    /// The element lost focus.
    Blur,
    /// The element was enabled.
    Enable,
    /// The element was disabled.
    Disable,
    /// Mouse click.
    Click,
    /// Mouse button pressed.
    MouseDown,
    /// Pointer entered the surface.
    MouseEnter,
    /// Pointer left the surface.
    MouseLeave,
    /// Pointer moved.
    MouseMove,
    /// Pointer moved out.
    MouseOut,
    /// Pointer moved over.
    MouseOver,
    /// Mouse button released.
    MouseUp,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Character key pressed.
    KeyPress,
}

impl EventKind {
    /// All event kinds.
    pub const ALL: [EventKind; 20] = [
        EventKind::Attach,
        EventKind::Detach,
        EventKind::Adopt,
        EventKind::Orphan,
        EventKind::Resize,
        EventKind::Focus,
        EventKind::Blur,
        EventKind::Enable,
        EventKind::Disable,
        EventKind::Click,
        EventKind::MouseDown,
        EventKind::MouseEnter,
        EventKind::MouseLeave,
        EventKind::MouseMove,
        EventKind::MouseOut,
        EventKind::MouseOver,
        EventKind::MouseUp,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::KeyPress,
    ];

    /// Returns the lowercase name of the event.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Attach => "attach",
            EventKind::Detach => "detach",
            EventKind::Adopt => "adopt",
            EventKind::Orphan => "orphan",
            EventKind::Resize => "resize",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Enable => "enable",
            EventKind::Disable => "disable",
            EventKind::Click => "click",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseOut => "mouseout",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseUp => "mouseup",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::KeyPress => "keypress",
        }
    }

    /// Parses an event name. `"dettach"` is accepted as an alias of
    /// `"detach"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dettach" => Some(EventKind::Detach),
            _ => Self::ALL.into_iter().find(|kind| kind.name() == name),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MouseEventKind> for EventKind {
    fn from(kind: MouseEventKind) -> Self {
        match kind {
            MouseEventKind::Click => EventKind::Click,
            MouseEventKind::MouseDown => EventKind::MouseDown,
            MouseEventKind::MouseEnter => EventKind::MouseEnter,
            MouseEventKind::MouseLeave => EventKind::MouseLeave,
            MouseEventKind::MouseMove => EventKind::MouseMove,
            MouseEventKind::MouseOut => EventKind::MouseOut,
            MouseEventKind::MouseOver => EventKind::MouseOver,
            MouseEventKind::MouseUp => EventKind::MouseUp,
        }
    }
}

impl From<KeyEventKind> for EventKind {
    fn from(kind: KeyEventKind) -> Self {
        match kind {
            KeyEventKind::KeyDown => EventKind::KeyDown,
            KeyEventKind::KeyUp => EventKind::KeyUp,
            KeyEventKind::KeyPress => EventKind::KeyPress,
        }
    }
}

/// A set of event kinds, as accepted by [`Scene::on`] and friends.
///
/// Built from a single kind, a list of kinds, or a string of event names
/// separated by spaces or commas. Unknown names are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventKinds(SmallVec<[EventKind; 4]>);

impl EventKinds {
    /// Iterates the kinds in the set.
    pub fn iter(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.0.iter().copied()
    }

    /// Returns true if the set holds no kind.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, kind: EventKind) {
        if !self.0.contains(&kind) {
            self.0.push(kind);
        }
    }
}

impl From<EventKind> for EventKinds {
    fn from(kind: EventKind) -> Self {
        let mut kinds = Self::default();
        kinds.push(kind);
        kinds
    }
}

impl From<&[EventKind]> for EventKinds {
    fn from(list: &[EventKind]) -> Self {
        let mut kinds = Self::default();
        for &kind in list {
            kinds.push(kind);
        }
        kinds
    }
}

impl<const N: usize> From<[EventKind; N]> for EventKinds {
    fn from(list: [EventKind; N]) -> Self {
        Self::from(&list[..])
    }
}

impl From<&str> for EventKinds {
    fn from(names: &str) -> Self {
        let mut kinds = Self::default();
        for name in names.split([' ', ',']).filter(|name| !name.is_empty()) {
            match EventKind::from_name(name) {
                Some(kind) => kinds.push(kind),
                None => debug!(name, "ignoring unknown event name"),
            }
        }
        kinds
    }
}

/// Data carried by an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// No data.
    None,
    /// The child concerned by an `Attach` or `Detach`.
    Node {
        /// The attached or detached child.
        node: NodeId,
    },
    /// The previous parent, for `Adopt` and `Orphan`.
    Parent {
        /// The parent before the change, if there was one.
        old_parent: Option<NodeId>,
    },
    /// A mouse event.
    Mouse(MouseEventData),
    /// A keyboard event.
    Key(KeyEventData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Propagation {
    Continue,
    Stop,
    StopImmediate,
}

/// An event travelling up the tree.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: NodeId,
    current: NodeId,
    payload: EventPayload,
    propagation: Propagation,
}

impl Event {
    pub(crate) fn new(kind: EventKind, target: NodeId, payload: EventPayload) -> Self {
        Self {
            kind,
            target,
            current: target,
            payload,
            propagation: Propagation::Continue,
        }
    }

    /// Kind of the event.
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The node the event was emitted on. Stays the same while bubbling.
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listeners are running.
    #[inline]
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Data carried by the event.
    #[inline]
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The attached or detached child, for `Attach` and `Detach`.
    pub fn node(&self) -> Option<NodeId> {
        match self.payload {
            EventPayload::Node { node } => Some(node),
            _ => None,
        }
    }

    /// The previous parent, for `Adopt` and `Orphan`.
    pub fn old_parent(&self) -> Option<NodeId> {
        match self.payload {
            EventPayload::Parent { old_parent } => old_parent,
            _ => None,
        }
    }

    /// Mouse data, for mouse events.
    pub fn mouse(&self) -> Option<&MouseEventData> {
        match &self.payload {
            EventPayload::Mouse(data) => Some(data),
            _ => None,
        }
    }

    /// Key data, for keyboard events.
    pub fn key(&self) -> Option<&KeyEventData> {
        match &self.payload {
            EventPayload::Key(data) => Some(data),
            _ => None,
        }
    }

    /// Lets the remaining listeners of the current node run, then stops.
    pub fn stop_propagation(&mut self) {
        if self.propagation == Propagation::Continue {
            self.propagation = Propagation::Stop;
        }
    }

    /// Stops right away: no other listener sees the event.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation = Propagation::StopImmediate;
    }

    /// Returns true once either stop method was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation != Propagation::Continue
    }

    pub(crate) fn set_current(&mut self, node: NodeId) {
        self.current = node;
    }

    pub(crate) fn is_immediate_stopped(&self) -> bool {
        self.propagation == Propagation::StopImmediate
    }
}

/// Identifies a registered listener, for [`Scene::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A shared event handler.
pub type Listener = Rc<dyn Fn(&mut Scene, &mut Event)>;

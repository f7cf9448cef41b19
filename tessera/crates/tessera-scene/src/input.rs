//! Input routing.
//!
//! Normalized [`InputEvent`]s are delivered to a surface and turned into
//! scene events. Mouse events go to the topmost visible element under the
//! pointer, key events to the focused element; both fall back to the surface
//! itself and bubble up from there.

use tessera_core::Viewport;
use tessera_input::InputEvent;
use tracing::trace;

use crate::error::SceneResult;
use crate::event::{EventKind, EventPayload};
use crate::node::NodeId;
use crate::scene::Scene;

impl Scene {
    /// Returns the topmost visible element of `surface` covering the tile at
    /// `(col, row)`.
    ///
    /// Elements are hit where they are drawn: an element is only hit inside
    /// its box, cut to the boxes of the elements above it.
    pub fn hit_test(&self, surface: NodeId, col: i32, row: i32) -> Option<NodeId> {
        let clip = self.surfaces.get(surface)?.bounds();
        self.hit_below(surface, clip, col, row)
    }

    fn hit_below(&self, container: NodeId, clip: Viewport, col: i32, row: i32) -> Option<NodeId> {
        for &child in self.children(container).iter().rev() {
            let Some(state) = self.elements.get(child) else {
                if let Some(hit) = self.hit_below(child, clip, col, row) {
                    return Some(hit);
                }
                continue;
            };
            if !state.visible {
                continue;
            }
            let visible = state.bounds.intersection(clip);
            if visible.contains(col, row) {
                return Some(self.hit_below(child, visible, col, row).unwrap_or(child));
            }
        }
        None
    }

    /// Delivers an input event to `surface`.
    ///
    /// - mouse events are emitted on [`Scene::hit_test`]'s result for the
    ///   event's tile, or on the surface when nothing is hit;
    /// - key events are emitted on the focused element of the surface, or on
    ///   the surface when nothing is focused;
    /// - focus and blur of the host window are emitted on the surface.
    ///
    /// # Errors
    ///
    /// Fails when `surface` is not a surface.
    pub fn dispatch_input(&mut self, surface: NodeId, event: InputEvent) -> SceneResult<()> {
        if !self.is_surface(surface) {
            return Err(self.not_a_surface(surface));
        }

        match event {
            InputEvent::Mouse(kind, data) => {
                let target = self.hit_test(surface, data.col, data.row).unwrap_or(surface);
                trace!(?target, ?kind, col = data.col, row = data.row, "dispatching mouse event");
                self.emit(target, kind.into(), EventPayload::Mouse(data));
            }
            InputEvent::Key(kind, data) => {
                let target = self.focused_element(surface).unwrap_or(surface);
                trace!(?target, ?kind, key = %data, "dispatching key event");
                self.emit(target, kind.into(), EventPayload::Key(data));
            }
            InputEvent::Focus => self.emit(surface, EventKind::Focus, EventPayload::None),
            InputEvent::Blur => self.emit(surface, EventKind::Blur, EventPayload::None),
        }
        Ok(())
    }
}

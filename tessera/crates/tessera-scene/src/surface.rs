//! Surfaces and compositing.
//!
//! A surface is a node that owns a [`TileBuffer`]. Elements attached below
//! it are drawn into that buffer by [`Scene::render`], which walks the
//! subtree back to front:
//!
//! 1. children are visited in list order, so later siblings cover earlier
//!    ones;
//! 2. hidden elements are skipped together with their subtree;
//! 3. the box of each element is cut to the active viewport, and the
//!    content tiles of what is left are written with `set_tile`, which only
//!    queues cells that really change;
//! 4. the children of an element are drawn with its box pushed as viewport,
//!    so they never paint outside of it.
//!
//! Plain nodes and focus managers in the tree draw nothing; their children
//! are drawn in the viewport of the closest element above them.
//!
//! The buffer is then flushed to its paint backend.

use slotmap::{SecondaryMap, SlotMap};
use tessera_buffer::{BufferOptions, PaintBackend, TileBuffer};
use tracing::{debug, trace};

use crate::element::ElementState;
use crate::error::{SceneError, SceneResult};
use crate::focus::FocusTracker;
use crate::node::{NodeData, NodeId};
use crate::scene::Scene;

impl Scene {
    /// Creates a surface drawing to `backend`.
    ///
    /// The buffer is allocated and painted with the clear style right away.
    /// Surfaces are focus managers for the elements below them.
    pub fn create_surface(
        &mut self,
        options: &BufferOptions,
        backend: Box<dyn PaintBackend>,
    ) -> SceneResult<NodeId> {
        let buffer = TileBuffer::new(options, backend)?;
        let id = self.create_node();
        debug!(?id, cols = buffer.width(), rows = buffer.height(), "surface created");
        self.surfaces.insert(id, buffer);
        self.trackers.insert(id, FocusTracker::default());
        Ok(id)
    }

    /// Returns true if `id` is a surface.
    #[inline]
    pub fn is_surface(&self, id: NodeId) -> bool {
        self.surfaces.contains_key(id)
    }

    /// The tile buffer of a surface.
    pub fn buffer(&self, surface: NodeId) -> Option<&TileBuffer> {
        self.surfaces.get(surface)
    }

    /// The tile buffer of a surface, for direct drawing.
    ///
    /// Tiles written here are overwritten by elements on the next render
    /// wherever an element covers them.
    pub fn buffer_mut(&mut self, surface: NodeId) -> Option<&mut TileBuffer> {
        self.surfaces.get_mut(surface)
    }

    /// Resizes the buffer of a surface to `cols` x `rows` and repaints it.
    pub fn resize_surface(&mut self, surface: NodeId, cols: i32, rows: i32) -> SceneResult<()> {
        let buffer = self.surface_buffer(surface)?;
        buffer.resize(cols, rows)?;
        debug!(?surface, cols, rows, "surface resized");
        Ok(())
    }

    /// Draws the elements below `surface` into its buffer, then flushes the
    /// buffer to the paint backend.
    pub fn render(&mut self, surface: NodeId) -> SceneResult<()> {
        if !self.is_surface(surface) {
            return Err(self.not_a_surface(surface));
        }
        let Scene {
            nodes,
            elements,
            surfaces,
            ..
        } = self;
        let buffer = surfaces
            .get_mut(surface)
            .ok_or(SceneError::NotASurface(surface))?;

        composite(nodes, elements, surface, buffer);
        trace!(?surface, dirty = buffer.dirty_len(), "surface composited");
        buffer.render()?;
        Ok(())
    }

    fn surface_buffer(&mut self, surface: NodeId) -> SceneResult<&mut TileBuffer> {
        if !self.is_surface(surface) {
            return Err(self.not_a_surface(surface));
        }
        self.surfaces
            .get_mut(surface)
            .ok_or(SceneError::NotASurface(surface))
    }

    pub(crate) fn not_a_surface(&self, id: NodeId) -> SceneError {
        if self.contains(id) {
            SceneError::NotASurface(id)
        } else {
            SceneError::NodeNotFound(id)
        }
    }
}

/// Draws the children of `container`, back to front, clipped to the active
/// viewport of `buffer`.
fn composite(
    nodes: &SlotMap<NodeId, NodeData>,
    elements: &SecondaryMap<NodeId, ElementState>,
    container: NodeId,
    buffer: &mut TileBuffer,
) {
    let Some(data) = nodes.get(container) else {
        return;
    };

    for &child in &data.children {
        let Some(state) = elements.get(child) else {
            composite(nodes, elements, child, buffer);
            continue;
        };
        if !state.visible {
            continue;
        }

        let bounds = state.bounds;
        let visible = bounds.intersection(buffer.viewport());
        if visible.is_empty() {
            continue;
        }

        for (col, row) in visible.positions() {
            if let Some(tile) = state.content.get(col - bounds.col0, row - bounds.row0) {
                buffer.set_tile(col, row, tile);
            }
        }

        if nodes.get(child).is_some_and(|data| !data.children.is_empty()) {
            buffer.push_viewport(bounds);
            composite(nodes, elements, child, buffer);
            buffer.pop_viewport();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ChildSlot, ElementBehavior, ElementOptions, ElementView, Placement};
    use pretty_assertions::assert_eq;
    use tessera_buffer::{PaintLogHandle, RecordingBackend};
    use tessera_core::{Color, Padding, PaddingPatch, Tile, Viewport};

    fn surface(scene: &mut Scene, cols: u32, rows: u32) -> (NodeId, PaintLogHandle) {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let options = BufferOptions::default().with_size(cols, rows);
        let id = scene.create_surface(&options, Box::new(backend)).unwrap();
        log.borrow_mut().clear();
        (id, log)
    }

    fn filled(scene: &mut Scene, options: ElementOptions, ch: char) -> NodeId {
        let id = scene.create_element(options).unwrap();
        if let Some(content) = scene.content_mut(id) {
            content.fill(Tile::new().with_char(ch));
        }
        id
    }

    fn glyph(scene: &Scene, surface: NodeId, col: i32, row: i32) -> Option<char> {
        scene.buffer(surface).and_then(|buffer| buffer.get_tile(col, row)).and_then(|tile| tile.ch)
    }

    fn row_text(scene: &Scene, surface: NodeId, row: i32) -> String {
        let width = scene.buffer(surface).map_or(0, TileBuffer::width);
        (0..width)
            .map(|col| glyph(scene, surface, col, row).unwrap_or('.'))
            .collect()
    }

    #[test]
    fn test_surface_is_a_focus_manager() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 4, 4);
        assert!(scene.is_surface(id));
        assert!(scene.is_focus_manager(id));
        assert_eq!(scene.buffer(id).map(TileBuffer::width), Some(4));
    }

    #[test]
    fn test_render_draws_elements() {
        let mut scene = Scene::new();
        let (id, log) = surface(&mut scene, 6, 2);
        let element = filled(&mut scene, ElementOptions::new().at(1, 0).size(3, 1).parent(id), 'x');
        assert_eq!(scene.element_surface(element), Some(id));

        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), ".xxx..");
        assert_eq!(log.borrow().positions(), vec![(1, 0), (2, 0), (3, 0)]);
        assert_eq!(log.borrow().presents, 1);
    }

    #[test]
    fn test_unchanged_render_paints_nothing() {
        let mut scene = Scene::new();
        let (id, log) = surface(&mut scene, 4, 1);
        filled(&mut scene, ElementOptions::new().size(2, 1).parent(id), 'x');
        scene.render(id).unwrap();
        log.borrow_mut().clear();

        scene.render(id).unwrap();
        assert!(log.borrow().cells.is_empty());
    }

    #[test]
    fn test_later_siblings_paint_on_top() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 5, 1);
        filled(&mut scene, ElementOptions::new().size(3, 1).parent(id), 'a');
        filled(&mut scene, ElementOptions::new().at(2, 0).size(3, 1).parent(id), 'b');

        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "aabbb");
    }

    #[test]
    fn test_children_are_clipped_to_parent() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 8, 3);
        let parent = filled(&mut scene, ElementOptions::new().at(1, 1).size(3, 1).parent(id), 'p');
        filled(&mut scene, ElementOptions::new().at(-2, -1).size(10, 3).parent(parent), 'c');

        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "........");
        assert_eq!(row_text(&scene, id, 1), ".ccc....");
        assert_eq!(row_text(&scene, id, 2), "........");
    }

    #[test]
    fn test_padding_limits_children() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 6, 1);
        let parent = filled(
            &mut scene,
            ElementOptions::new().size(6, 1).padding(Padding::new(0, 1, 0, 1)).parent(id),
            '#',
        );
        filled(&mut scene, ElementOptions::new().size(10, 1).parent(parent), '-');

        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "#----#");
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 4, 1);
        let parent = filled(&mut scene, ElementOptions::new().size(4, 1).hidden().parent(id), 'p');
        filled(&mut scene, ElementOptions::new().size(2, 1).parent(parent), 'c');

        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "....");
    }

    #[test]
    fn test_hide_clears_footprint() {
        let mut scene = Scene::new();
        let (id, log) = surface(&mut scene, 4, 1);
        let element = filled(&mut scene, ElementOptions::new().at(1, 0).size(2, 1).parent(id), 'x');
        scene.render(id).unwrap();
        log.borrow_mut().clear();

        scene.hide(element);
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "....");
        assert_eq!(log.borrow().positions(), vec![(1, 0), (2, 0)]);
        let clear_style = scene.buffer(id).unwrap().clear_style().clone();
        assert_eq!(log.borrow().cells[0].tile, clear_style);
    }

    #[test]
    fn test_moving_clears_old_position() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 5, 1);
        let element = filled(&mut scene, ElementOptions::new().size(2, 1).parent(id), 'x');
        scene.render(id).unwrap();

        scene.move_by(element, 3, 0);
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "...xx");
    }

    #[test]
    fn test_padding_change_clears_old_child_position() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 6, 1);
        let parent = scene
            .create_element(ElementOptions::new().size(6, 1).parent(id))
            .unwrap();
        filled(&mut scene, ElementOptions::new().size(1, 1).parent(parent), 'c');
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "c.....");

        scene.set_padding(parent, PaddingPatch::default().left(3));
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "...c..");
        let clear_style = scene.buffer(id).unwrap().clear_style().clone();
        assert_eq!(scene.buffer(id).unwrap().get_tile(0, 0), Some(&clear_style));
    }

    #[test]
    fn test_unchanged_padding_queues_nothing() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 4, 1);
        let element = filled(&mut scene, ElementOptions::new().size(4, 1).parent(id), 'x');
        scene.render(id).unwrap();

        scene.set_padding(element, PaddingPatch::default().left(0));
        assert_eq!(scene.buffer(id).unwrap().dirty_len(), 0);
    }

    #[test]
    fn test_shrinking_clears_cut_off_cells() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 5, 1);
        let element = filled(&mut scene, ElementOptions::new().size(4, 1).parent(id), 'x');
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "xxxx.");

        scene.resize(element, 2, 1);
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "xx...");
    }

    /// One full-width row per child, in child order.
    struct Rows;

    impl ElementBehavior for Rows {
        fn position_child(&self, parent: &ElementView, slot: ChildSlot) -> Option<Placement> {
            Some(Placement::new(0, slot.index as i32, parent.width, 1))
        }
    }

    #[test]
    fn test_placement_change_clears_old_position() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 4, 3);
        let list = scene
            .create_element_with(ElementOptions::new().size(4, 3).parent(id), Rows)
            .unwrap();
        let first = filled(&mut scene, ElementOptions::new().size(4, 1).parent(list), 'a');
        filled(&mut scene, ElementOptions::new().size(4, 1).parent(list), 'b');
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "aaaa");
        assert_eq!(row_text(&scene, id, 1), "bbbb");

        scene.remove(list, first);
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "bbbb");
        assert_eq!(row_text(&scene, id, 1), "....");
    }

    #[test]
    fn test_detach_clears_and_forgets_surface() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 3, 1);
        let element = filled(&mut scene, ElementOptions::new().size(3, 1).parent(id), 'x');
        scene.render(id).unwrap();

        scene.remove(id, element);
        assert_eq!(scene.element_surface(element), None);
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "...");
    }

    #[test]
    fn test_surface_propagates_to_subtree_on_attach() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 3, 3);
        let group = scene.create_node();
        let parent = filled(&mut scene, ElementOptions::new().size(3, 3), 'p');
        let child = filled(&mut scene, ElementOptions::new().size(1, 1).parent(parent), 'c');
        scene.append(group, parent).unwrap();
        assert_eq!(scene.element_surface(child), None);

        scene.append(id, group).unwrap();
        assert_eq!(scene.element_surface(parent), Some(id));
        assert_eq!(scene.element_surface(child), Some(id));

        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "cpp");
    }

    #[test]
    fn test_content_edits_show_on_next_render() {
        let mut scene = Scene::new();
        let (id, _) = surface(&mut scene, 2, 1);
        let element = filled(&mut scene, ElementOptions::new().size(2, 1).parent(id), 'a');
        scene.render(id).unwrap();

        scene.set_content_tile(element, 1, 0, Tile::new().with_char('b').with_fg(Color::RED));
        scene.render(id).unwrap();
        assert_eq!(row_text(&scene, id, 0), "ab");
        assert_eq!(scene.buffer(id).unwrap().get_tile(1, 0).unwrap().fg, Some(Color::RED));
    }

    #[test]
    fn test_resize_surface() {
        let mut scene = Scene::new();
        let (id, log) = surface(&mut scene, 2, 2);
        scene.resize_surface(id, 3, 1).unwrap();
        assert_eq!(scene.buffer(id).unwrap().bounds(), Viewport::new(0, 0, 2, 0));
        assert_eq!(log.borrow().resizes, vec![(36, 16)]);
    }

    #[test]
    fn test_render_rejects_non_surfaces() {
        let mut scene = Scene::new();
        let node = scene.create_node();
        assert!(matches!(scene.render(node), Err(SceneError::NotASurface(_))));

        scene.destroy(node).unwrap();
        assert!(matches!(scene.render(node), Err(SceneError::NodeNotFound(_))));
        assert!(matches!(
            scene.resize_surface(node, 1, 1),
            Err(SceneError::NodeNotFound(_))
        ));
    }
}

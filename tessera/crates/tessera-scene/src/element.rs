//! Positioned elements.
//!
//! An element is a node with a position relative to its parent, a size, an
//! inner padding and a grid of content tiles. Its absolute box is derived
//! from its own geometry and from its parent's box:
//!
//! - inside another element with box `P` and padding `p`, the box starts at
//!   `P.col0 + p.left + x`, `P.row0 + p.top + y` and is cut at the padded
//!   interior of the parent on the right and bottom edges;
//! - anywhere else (detached, or directly under a surface or plain node) the
//!   box is `{x, y, x + width - 1, y + height - 1}`.
//!
//! A zero-width or zero-height element gets `col1 < col0` or `row1 < row0`.
//! Such boxes are empty and never painted.
//!
//! What an element shows and how it lays out its children is provided by an
//! [`ElementBehavior`].

use std::fmt;

use tessera_core::{Matrix, Padding, PaddingPatch, Tile, Viewport};
use tracing::debug;

use crate::error::SceneResult;
use crate::event::{Event, EventKind, EventPayload};
use crate::node::NodeId;
use crate::scene::Scene;

// ============================================================================
// Public types
// ============================================================================

/// Options used to create an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementOptions {
    /// Column, relative to the parent.
    pub x: i32,
    /// Row, relative to the parent.
    pub y: i32,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
    /// Whether the element is drawn.
    pub visible: bool,
    /// Inner spacing applied to children.
    pub padding: Padding,
    /// Whether the element can receive focus.
    pub focusable: bool,
    /// Whether the element starts disabled.
    pub disabled: bool,
    /// Parent to append the element to.
    pub parent: Option<NodeId>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            visible: true,
            padding: Padding::ZERO,
            focusable: false,
            disabled: false,
            parent: None,
        }
    }
}

impl ElementOptions {
    /// Creates default options: a visible 0x0 element at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the size.
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Starts hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Sets the padding.
    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Makes the element focusable.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Starts disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Appends the element to `parent` once created.
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A snapshot of an element's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementView {
    /// The element.
    pub id: NodeId,
    /// Column, relative to the parent.
    pub x: i32,
    /// Row, relative to the parent.
    pub y: i32,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
    /// Absolute box.
    pub bounds: Viewport,
    /// Inner padding.
    pub padding: Padding,
    /// Visibility.
    pub visible: bool,
    /// Whether the element can receive focus.
    pub focusable: bool,
    /// Whether the element has focus.
    pub focused: bool,
    /// Whether the element is disabled.
    pub disabled: bool,
}

/// A child being placed by its parent's [`ElementBehavior::position_child`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSlot {
    /// Index of the child in its parent's child list.
    pub index: usize,
    /// Number of children of the parent.
    pub count: usize,
    /// Current state of the child.
    pub child: ElementView,
}

/// Position and size decided by a parent for one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Column, relative to the parent.
    pub x: i32,
    /// Row, relative to the parent.
    pub y: i32,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
}

impl Placement {
    /// Creates a placement.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// What makes an element more than a box.
///
/// Both methods have a default that does nothing, so a behavior only
/// implements what it needs.
pub trait ElementBehavior {
    /// Fills the content grid of the element.
    ///
    /// Called when the element is created, after each change of position,
    /// size or padding, and after each focus or enabled state change. The
    /// grid is already sized `view.width` x `view.height`. Changes are picked
    /// up by the next render of the surface.
    fn set_content(&mut self, _view: &ElementView, _content: &mut Matrix<Tile>) {}

    /// Decides where a child goes.
    ///
    /// Returning `Some` overrides the child's own position and size each time
    /// its box is recomputed. Returning `None` leaves the child alone.
    fn position_child(&self, _parent: &ElementView, _slot: ChildSlot) -> Option<Placement> {
        None
    }
}

// ============================================================================
// Element state
// ============================================================================

pub(crate) struct ElementState {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) visible: bool,
    pub(crate) padding: Padding,
    pub(crate) bounds: Viewport,
    pub(crate) content: Matrix<Tile>,
    /// Surface the element is drawn on, once attached below one.
    pub(crate) surface: Option<NodeId>,
    pub(crate) focusable: bool,
    pub(crate) focused: bool,
    pub(crate) disabled: bool,
    behavior: Option<Box<dyn ElementBehavior>>,
}

impl ElementState {
    fn new(options: &ElementOptions, behavior: Option<Box<dyn ElementBehavior>>) -> Self {
        let width = options.width.max(0);
        let height = options.height.max(0);
        Self {
            x: options.x,
            y: options.y,
            width,
            height,
            visible: options.visible,
            padding: options.padding,
            bounds: own_box(options.x, options.y, width, height),
            content: Matrix::filled(width as usize, height as usize, Tile::EMPTY),
            surface: None,
            focusable: options.focusable,
            focused: false,
            disabled: options.disabled,
            behavior,
        }
    }

    pub(crate) fn view(&self, id: NodeId) -> ElementView {
        ElementView {
            id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            bounds: self.bounds,
            padding: self.padding,
            visible: self.visible,
            focusable: self.focusable,
            focused: self.focused,
            disabled: self.disabled,
        }
    }

    fn resize_content(&mut self) {
        self.content
            .resize(self.width as usize, self.height as usize, Tile::EMPTY);
    }
}

impl fmt::Debug for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementState")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bounds", &self.bounds)
            .field("visible", &self.visible)
            .field("surface", &self.surface)
            .field("has_behavior", &self.behavior.is_some())
            .finish_non_exhaustive()
    }
}

fn own_box(x: i32, y: i32, width: i32, height: i32) -> Viewport {
    Viewport::new(x, y, x + width - 1, y + height - 1)
}

fn inner_box(parent: Viewport, padding: Padding, x: i32, y: i32, width: i32, height: i32) -> Viewport {
    let col0 = parent.col0 + padding.left + x;
    let row0 = parent.row0 + padding.top + y;
    Viewport::new(
        col0,
        row0,
        (parent.col1 - padding.right).min(col0 + width - 1),
        (parent.row1 - padding.bottom).min(row0 + height - 1),
    )
}

// ============================================================================
// Scene operations
// ============================================================================

impl Scene {
    /// Creates an element without behavior.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::Viewport;
    /// use tessera_scene::{ElementOptions, Scene};
    ///
    /// let mut scene = Scene::new();
    /// let parent = scene.create_element(ElementOptions::new().at(5, 10).size(20, 20)).unwrap();
    /// let child = scene
    ///     .create_element(ElementOptions::new().at(2, 3).size(5, 6).parent(parent))
    ///     .unwrap();
    /// assert_eq!(scene.bounds(child), Some(Viewport::new(7, 13, 11, 18)));
    /// ```
    pub fn create_element(&mut self, options: ElementOptions) -> SceneResult<NodeId> {
        self.spawn_element(&options, None)
    }

    /// Creates an element driven by `behavior`.
    pub fn create_element_with<B>(&mut self, options: ElementOptions, behavior: B) -> SceneResult<NodeId>
    where
        B: ElementBehavior + 'static,
    {
        self.spawn_element(&options, Some(Box::new(behavior)))
    }

    fn spawn_element(
        &mut self,
        options: &ElementOptions,
        behavior: Option<Box<dyn ElementBehavior>>,
    ) -> SceneResult<NodeId> {
        let id = self.create_node();
        self.elements.insert(id, ElementState::new(options, behavior));
        self.run_content_hook(id);

        if let Some(parent) = options.parent {
            if let Err(err) = self.append(parent, id) {
                self.nodes.remove(id);
                self.elements.remove(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    // ========================================================================
    // Readers
    // ========================================================================

    /// Returns true if `id` is an element.
    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.elements.contains_key(id)
    }

    /// Returns a snapshot of the element.
    pub fn element(&self, id: NodeId) -> Option<ElementView> {
        self.elements.get(id).map(|state| state.view(id))
    }

    /// Column of the element, relative to its parent.
    pub fn x(&self, id: NodeId) -> Option<i32> {
        self.elements.get(id).map(|state| state.x)
    }

    /// Row of the element, relative to its parent.
    pub fn y(&self, id: NodeId) -> Option<i32> {
        self.elements.get(id).map(|state| state.y)
    }

    /// Width of the element.
    pub fn width(&self, id: NodeId) -> Option<i32> {
        self.elements.get(id).map(|state| state.width)
    }

    /// Height of the element.
    pub fn height(&self, id: NodeId) -> Option<i32> {
        self.elements.get(id).map(|state| state.height)
    }

    /// Absolute box of the element.
    pub fn bounds(&self, id: NodeId) -> Option<Viewport> {
        self.elements.get(id).map(|state| state.bounds)
    }

    /// Padding of the element.
    pub fn padding(&self, id: NodeId) -> Option<Padding> {
        self.elements.get(id).map(|state| state.padding)
    }

    /// Returns true if `id` is a visible element.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.elements.get(id).is_some_and(|state| state.visible)
    }

    /// Content grid of the element.
    pub fn content(&self, id: NodeId) -> Option<&Matrix<Tile>> {
        self.elements.get(id).map(|state| &state.content)
    }

    /// Mutable content grid of the element.
    ///
    /// Edits show up on the next render of the surface.
    pub fn content_mut(&mut self, id: NodeId) -> Option<&mut Matrix<Tile>> {
        self.elements.get_mut(id).map(|state| &mut state.content)
    }

    /// Replaces one content tile. Returns false outside the grid.
    pub fn set_content_tile(&mut self, id: NodeId, col: i32, row: i32, tile: Tile) -> bool {
        self.elements
            .get_mut(id)
            .is_some_and(|state| state.content.set(col, row, tile))
    }

    /// Surface the element is attached to, if any.
    pub fn element_surface(&self, id: NodeId) -> Option<NodeId> {
        self.elements.get(id).and_then(|state| state.surface)
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Moves the element to `(col, row)`, relative to its parent.
    pub fn set_position(&mut self, id: NodeId, col: i32, row: i32) {
        let Some(state) = self.elements.get(id) else {
            return;
        };
        if state.x == col && state.y == row {
            return;
        }

        self.clear_footprint(id);
        if let Some(state) = self.elements.get_mut(id) {
            state.x = col;
            state.y = row;
        }
        self.recalculate(id);
        self.run_content_hook(id);
    }

    /// Sets the column, keeping the row.
    pub fn set_x(&mut self, id: NodeId, col: i32) {
        if let Some(row) = self.y(id) {
            self.set_position(id, col, row);
        }
    }

    /// Sets the row, keeping the column.
    pub fn set_y(&mut self, id: NodeId, row: i32) {
        if let Some(col) = self.x(id) {
            self.set_position(id, col, row);
        }
    }

    /// Moves the element by `(dx, dy)`.
    pub fn move_by(&mut self, id: NodeId, dx: i32, dy: i32) {
        if let Some(view) = self.element(id) {
            self.set_position(id, view.x + dx, view.y + dy);
        }
    }

    /// Resizes the element to `cols` x `rows`.
    ///
    /// The content grid is cropped or extended with empty tiles, then the
    /// content hook runs and `Resize` is emitted. Negative sizes count as 0.
    pub fn resize(&mut self, id: NodeId, cols: i32, rows: i32) {
        let cols = cols.max(0);
        let rows = rows.max(0);
        let Some(state) = self.elements.get(id) else {
            return;
        };
        if state.width == cols && state.height == rows {
            return;
        }
        if cols < state.width || rows < state.height {
            self.clear_footprint(id);
        }

        if let Some(state) = self.elements.get_mut(id) {
            state.width = cols;
            state.height = rows;
            state.resize_content();
        }
        debug!(?id, cols, rows, "element resized");
        self.recalculate(id);
        self.run_content_hook(id);
        self.emit(id, EventKind::Resize, EventPayload::None);
    }

    /// Sets the width, keeping the height.
    pub fn set_width(&mut self, id: NodeId, cols: i32) {
        if let Some(rows) = self.height(id) {
            self.resize(id, cols, rows);
        }
    }

    /// Sets the height, keeping the width.
    pub fn set_height(&mut self, id: NodeId, rows: i32) {
        if let Some(cols) = self.width(id) {
            self.resize(id, cols, rows);
        }
    }

    /// Applies the given sides of `patch` to the padding of the element.
    ///
    /// Clears the old footprint first. Does nothing if the padding is
    /// unchanged.
    pub fn set_padding(&mut self, id: NodeId, patch: PaddingPatch) {
        let Some(state) = self.elements.get(id) else {
            return;
        };
        let mut padding = state.padding;
        padding.merge(patch);
        if padding == state.padding {
            return;
        }

        self.clear_footprint(id);
        if let Some(state) = self.elements.get_mut(id) {
            state.padding = padding;
        }
        self.recalculate(id);
        self.run_content_hook(id);
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Makes the element visible. It shows up on the next render.
    pub fn show(&mut self, id: NodeId) {
        if let Some(state) = self.elements.get_mut(id) {
            state.visible = true;
        }
    }

    /// Hides the element and clears its footprint from the surface.
    pub fn hide(&mut self, id: NodeId) {
        if !self.is_visible(id) {
            return;
        }
        self.clear_footprint(id);
        if let Some(state) = self.elements.get_mut(id) {
            state.visible = false;
        }
    }

    /// Shows a hidden element, hides a visible one.
    pub fn toggle(&mut self, id: NodeId) {
        if self.is_visible(id) {
            self.hide(id);
        } else {
            self.show(id);
        }
    }

    /// Runs the content hook of the element again.
    pub fn refresh_content(&mut self, id: NodeId) {
        self.run_content_hook(id);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    pub(crate) fn run_content_hook(&mut self, id: NodeId) {
        let Some(state) = self.elements.get_mut(id) else {
            return;
        };
        let view = state.view(id);
        if let Some(behavior) = state.behavior.as_mut() {
            behavior.set_content(&view, &mut state.content);
        }
    }

    /// Resets the area covered by the element to the clear style of its
    /// surface. Plain nodes clear the elements below them.
    pub(crate) fn clear_footprint(&mut self, id: NodeId) {
        match self.elements.get(id) {
            Some(state) => {
                let (Some(surface), true) = (state.surface, state.visible) else {
                    return;
                };
                let bounds = state.bounds;
                if let Some(buffer) = self.surfaces.get_mut(surface) {
                    buffer.clear_region(bounds.col0, bounds.row0, bounds.col1, bounds.row1);
                }
            }
            None => {
                for child in self.children(id).to_vec() {
                    self.clear_footprint(child);
                }
            }
        }
    }

    /// Recomputes the absolute box of `id` and of all its descendants.
    pub(crate) fn recalculate(&mut self, id: NodeId) {
        let parent = self.parent(id);
        let mut resized = false;

        if self.is_element(id) {
            if let Some(placement) = parent.and_then(|parent| self.placement_for(parent, id)) {
                resized = self.apply_placement(id, placement);
            }

            let parent_box = parent
                .and_then(|parent| self.elements.get(parent))
                .map(|parent| (parent.bounds, parent.padding));
            if let Some(state) = self.elements.get_mut(id) {
                state.bounds = match parent_box {
                    Some((bounds, padding)) => {
                        inner_box(bounds, padding, state.x, state.y, state.width, state.height)
                    }
                    None => own_box(state.x, state.y, state.width, state.height),
                };
            }
        }

        for child in self.children(id).to_vec() {
            self.recalculate(child);
        }

        if resized {
            self.run_content_hook(id);
            self.emit(id, EventKind::Resize, EventPayload::None);
        }
    }

    fn placement_for(&self, parent: NodeId, child: NodeId) -> Option<Placement> {
        let parent_state = self.elements.get(parent)?;
        let behavior = parent_state.behavior.as_ref()?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&id| id == child)?;
        let slot = ChildSlot {
            index,
            count: siblings.len(),
            child: self.elements.get(child)?.view(child),
        };
        behavior.position_child(&parent_state.view(parent), slot)
    }

    /// Applies a placement decided by the parent. Returns true if the size
    /// changed.
    fn apply_placement(&mut self, id: NodeId, placement: Placement) -> bool {
        let Some(state) = self.elements.get(id) else {
            return false;
        };
        let width = placement.width.max(0);
        let height = placement.height.max(0);
        let moved = state.x != placement.x || state.y != placement.y;
        let resized = state.width != width || state.height != height;
        if !moved && !resized {
            return false;
        }

        self.clear_footprint(id);
        if let Some(state) = self.elements.get_mut(id) {
            state.x = placement.x;
            state.y = placement.y;
            state.width = width;
            state.height = height;
            if resized {
                state.resize_content();
            }
        }
        resized
    }

    fn has_behavior(&self, id: NodeId) -> bool {
        self.elements
            .get(id)
            .is_some_and(|state| state.behavior.is_some())
    }

    /// Recomputes `id`, or all the children of its parent if the parent may
    /// place them.
    fn reflow(&mut self, id: NodeId) {
        match self.parent(id).filter(|&parent| self.has_behavior(parent)) {
            Some(parent) => {
                for sibling in self.children(parent).to_vec() {
                    self.recalculate(sibling);
                }
            }
            None => self.recalculate(id),
        }
    }

    fn nearest_surface(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.surfaces.contains_key(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    fn set_surface(&mut self, id: NodeId, surface: Option<NodeId>) {
        for node in self.descendants(id) {
            if let Some(state) = self.elements.get_mut(node) {
                state.surface = surface;
            }
        }
    }

    pub(crate) fn on_adopt(&mut self, id: NodeId, event: &mut Event) {
        let surface = self.nearest_surface(id);
        self.set_surface(id, surface);
        self.reflow(id);
        if self.is_element(id) {
            event.stop_propagation();
        }
    }

    pub(crate) fn on_orphan(&mut self, id: NodeId, event: &mut Event) {
        self.clear_footprint(id);
        self.set_surface(id, None);
        if let Some(old_parent) = event.old_parent() {
            if self.has_behavior(old_parent) {
                for sibling in self.children(old_parent).to_vec() {
                    self.recalculate(sibling);
                }
            }
        }
        if self.is_element(id) {
            event.stop_propagation();
        }
    }
}

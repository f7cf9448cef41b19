//! The tile buffer.
//!
//! [`TileBuffer`] holds the matrix of cells shown on a surface and tracks
//! which of them changed since the last flush. Writes go through a stack of
//! viewports: the bottom entry always covers the whole buffer and the top
//! entry is the intersection of everything pushed, so nested pushes can only
//! shrink the writable area.

use std::fmt;
use std::time::Instant;

use smallvec::{smallvec, SmallVec};
use tessera_core::{Matrix, Tile, Viewport};
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::config::BufferOptions;
use crate::decay::{Decay, FrameHandle, Ghost};
use crate::error::BufferResult;
use crate::paint::{GhostPaint, PaintBackend, PaintCell};

/// A matrix of tiles flushed incrementally to a [`PaintBackend`].
///
/// # Examples
///
/// ```
/// use tessera_buffer::{BufferOptions, RecordingBackend, TileBuffer};
/// use tessera_core::{Color, Tile, Viewport};
///
/// let backend = RecordingBackend::new();
/// let log = backend.log();
/// let options = BufferOptions::default().with_size(10, 5);
/// let mut buffer = TileBuffer::new(&options, Box::new(backend)).unwrap();
/// log.borrow_mut().clear();
///
/// buffer.push_viewport(Viewport::new(0, 0, 4, 4));
/// assert!(buffer.set_tile(2, 2, &Tile::new().with_char('@').with_fg(Color::WHITE)));
/// assert!(!buffer.set_tile(8, 2, &Tile::new().with_char('x')));
/// buffer.pop_viewport();
///
/// buffer.render().unwrap();
/// assert_eq!(log.borrow().positions(), vec![(2, 2)]);
/// ```
pub struct TileBuffer {
    /// Cells, `[row][col]`.
    cells: Matrix<Cell>,

    /// Tile width in pixels.
    tile_width: u32,

    /// Tile height in pixels.
    tile_height: u32,

    /// Viewport stack. Index 0 is the whole buffer and is never popped.
    viewports: SmallVec<[Viewport; 8]>,

    /// Cells waiting to be painted, in the order they became dirty.
    dirty: Vec<(i32, i32)>,

    /// Style used by `clear` and for cells created on resize.
    clear_style: Tile,

    /// Decay state, when the effect is enabled.
    decay: Option<Decay>,

    backend: Box<dyn PaintBackend>,
}

impl fmt::Debug for TileBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileBuffer")
            .field("cols", &self.cells.cols())
            .field("rows", &self.cells.rows())
            .field("tile_width", &self.tile_width)
            .field("tile_height", &self.tile_height)
            .field("viewports", &self.viewports)
            .field("dirty", &self.dirty.len())
            .finish_non_exhaustive()
    }
}

impl TileBuffer {
    /// Creates a buffer and paints it once with the clear style.
    pub fn new(options: &BufferOptions, backend: Box<dyn PaintBackend>) -> BufferResult<Self> {
        options.validate()?;

        let mut buffer = Self {
            cells: Matrix::default(),
            tile_width: options.tile_width,
            tile_height: options.tile_height,
            viewports: smallvec![Viewport::from_size(0, 0, 0, 0)],
            dirty: Vec::new(),
            clear_style: options.clear_style.clone(),
            decay: options.decay().map(Decay::new),
            backend,
        };
        buffer.resize(options.cols as i32, options.rows as i32)?;
        Ok(buffer)
    }

    /// Buffer width, in columns.
    #[inline]
    pub fn width(&self) -> i32 {
        self.cells.cols() as i32
    }

    /// Buffer height, in rows.
    #[inline]
    pub fn height(&self) -> i32 {
        self.cells.rows() as i32
    }

    /// Width of one tile, in pixels.
    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Height of one tile, in pixels.
    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// A box covering the whole buffer.
    #[inline]
    pub fn bounds(&self) -> Viewport {
        Viewport::from_size(0, 0, self.width(), self.height())
    }

    /// Number of cells waiting for the next flush.
    #[inline]
    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    /// Returns the cell at `(col, row)`.
    #[inline]
    pub fn cell(&self, col: i32, row: i32) -> Option<&Cell> {
        self.cells.get(col, row)
    }

    // ========================================================================
    // Tile access
    // ========================================================================

    /// Merges `tile` into the cell at `(col, row)`.
    ///
    /// Only the fields set in `tile` are written. The call does nothing when
    /// the position is outside the active viewport or the buffer. The cell is
    /// queued for painting only if a field actually changed, and the return
    /// value tells whether it did.
    pub fn set_tile(&mut self, col: i32, row: i32, tile: &Tile) -> bool {
        if !self.viewport().contains(col, row) {
            return false;
        }
        let Some(cell) = self.cells.get_mut(col, row) else {
            return false;
        };

        let replaced_glyph = match &self.decay {
            Some(_) if tile.ch.is_some() && cell.tile.ch.is_some() && tile.ch != cell.tile.ch => {
                Some(cell.tile.clone())
            }
            _ => None,
        };

        if !cell.tile.merge(tile) {
            return false;
        }

        if let (Some(previous), Some(decay)) = (replaced_glyph, self.decay.as_mut()) {
            if cell.ghost.is_none() {
                decay.ghosts.push((col, row));
            }
            cell.ghost = Some(Ghost::new(previous, Instant::now()));
        }

        if !cell.queued {
            cell.queued = true;
            self.dirty.push((col, row));
        }
        true
    }

    /// Returns the tile at `(col, row)`, or `None` outside the buffer.
    #[inline]
    pub fn get_tile(&self, col: i32, row: i32) -> Option<&Tile> {
        self.cells.get(col, row).map(Cell::tile)
    }

    /// Returns the live tile at `(col, row)`.
    ///
    /// Changes made through this reference are not tracked: the cell is only
    /// repainted once something else marks it dirty.
    #[inline]
    pub fn get_tile_mut(&mut self, col: i32, row: i32) -> Option<&mut Tile> {
        self.cells.get_mut(col, row).map(|cell| &mut cell.tile)
    }

    /// Style used by `clear` and resize.
    #[inline]
    pub fn clear_style(&self) -> &Tile {
        &self.clear_style
    }

    /// Merges `style` into the clear style used from now on.
    pub fn set_clear_style(&mut self, style: &Tile) {
        self.clear_style.merge(style);
    }

    // ========================================================================
    // Viewports
    // ========================================================================

    /// The active viewport.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewports
            .last()
            .copied()
            .unwrap_or_else(|| self.bounds())
    }

    /// Number of viewports pushed on top of the base one.
    #[inline]
    pub fn viewport_depth(&self) -> usize {
        self.viewports.len().saturating_sub(1)
    }

    /// Restricts writes to `viewport`, intersected with the active one.
    pub fn push_viewport(&mut self, viewport: Viewport) {
        let effective = viewport.intersection(self.viewport());
        self.viewports.push(effective);
    }

    /// Removes the last pushed viewport and returns it.
    ///
    /// The base viewport is never removed; popping it returns `None`.
    pub fn pop_viewport(&mut self) -> Option<Viewport> {
        if self.viewports.len() <= 1 {
            debug!("refusing to pop the base viewport");
            return None;
        }
        self.viewports.pop()
    }

    // ========================================================================
    // Clear and resize
    // ========================================================================

    /// Resets every cell to the clear style.
    pub fn clear(&mut self) {
        self.clear_region(0, 0, self.width() - 1, self.height() - 1);
    }

    /// Resets the cells of the given inclusive region to the clear style.
    ///
    /// The region is clamped to the buffer, but not to the active viewport.
    /// Every cell in it is queued, whether it changed or not.
    pub fn clear_region(&mut self, col0: i32, row0: i32, col1: i32, row1: i32) {
        let region = Viewport::new(col0, row0, col1, row1).intersection(self.bounds());
        let now = Instant::now();

        for (col, row) in region.positions() {
            let Some(cell) = self.cells.get_mut(col, row) else {
                continue;
            };

            if let Some(decay) = self.decay.as_mut() {
                if cell.tile.ch.is_some() && cell.tile.ch != self.clear_style.ch {
                    if cell.ghost.is_none() {
                        decay.ghosts.push((col, row));
                    }
                    cell.ghost = Some(Ghost::new(cell.tile.clone(), now));
                }
            }

            cell.tile = self.clear_style.clone();
            if !cell.queued {
                cell.queued = true;
                self.dirty.push((col, row));
            }
        }
    }

    /// Resizes the buffer to `cols` × `rows`.
    ///
    /// Cells still in bounds are kept as they are; new ones get the clear
    /// style. Pushed viewports are dropped and the base viewport is reset to
    /// the new extent. Since the paint surface is resized too, every cell is
    /// queued and the buffer is rendered right away.
    pub fn resize(&mut self, cols: i32, rows: i32) -> BufferResult<()> {
        let cols = cols.max(0);
        let rows = rows.max(0);
        let tile_width = self.tile_width as i32;
        let tile_height = self.tile_height as i32;
        let clear_style = self.clear_style.clone();

        self.cells.resize_with(cols as usize, rows as usize, |col, row| {
            Cell::new(
                col as i32 * tile_width,
                row as i32 * tile_height,
                clear_style.clone(),
            )
        });

        if self.viewports.len() > 1 {
            debug!(dropped = self.viewports.len() - 1, "resize drops pushed viewports");
        }
        self.viewports.truncate(1);
        self.viewports[0] = Viewport::from_size(0, 0, cols, rows);

        let bounds = self.bounds();
        self.dirty.retain(|&(col, row)| bounds.contains(col, row));
        if let Some(decay) = self.decay.as_mut() {
            decay.ghosts.retain(|&(col, row)| bounds.contains(col, row));
        }

        debug!(cols, rows, "tile buffer resized");
        self.backend
            .resize(cols as u32 * self.tile_width, rows as u32 * self.tile_height)?;

        for (col, row) in bounds.positions() {
            if let Some(cell) = self.cells.get_mut(col, row) {
                if !cell.queued {
                    cell.queued = true;
                    self.dirty.push((col, row));
                }
            }
        }

        self.render()
    }

    // ========================================================================
    // Flush
    // ========================================================================

    /// Paints every dirty cell, in the order they became dirty, and empties
    /// the dirty list.
    ///
    /// A pending decay frame is cancelled; if ghosts remain, a new one is
    /// scheduled and can be read with [`TileBuffer::pending_frame`]. If the
    /// backend fails, the cells not yet painted stay queued.
    pub fn render(&mut self) -> BufferResult<()> {
        if let Some(decay) = self.decay.as_mut() {
            decay.pending = None;
        }

        for index in 0..self.dirty.len() {
            let (col, row) = self.dirty[index];
            let Some(cell) = self.cells.get_mut(col, row) else {
                continue;
            };
            cell.queued = false;

            let paint = PaintCell {
                col,
                row,
                x: cell.x(),
                y: cell.y(),
                width: self.tile_width,
                height: self.tile_height,
                tile: &cell.tile,
                ghost: None,
            };
            if let Err(err) = self.backend.paint(&paint) {
                cell.queued = true;
                self.dirty.drain(..index);
                return Err(err.into());
            }
        }

        trace!(painted = self.dirty.len(), "flushed dirty tiles");
        self.dirty.clear();
        self.backend.present()?;

        if let Some(decay) = self.decay.as_mut() {
            if !decay.ghosts.is_empty() {
                decay.schedule();
            }
        }
        Ok(())
    }

    // ========================================================================
    // Decay
    // ========================================================================

    /// The decay frame currently scheduled, if any.
    #[inline]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.decay.as_ref().and_then(|decay| decay.pending)
    }

    /// Runs one decay animation frame.
    ///
    /// Does nothing and returns `None` when `handle` is not the pending
    /// frame. Otherwise every fading cell is repainted with its ghost at the
    /// opacity reached at `now`; ghosts that are fully faded are dropped.
    /// Returns the handle of the next frame while ghosts remain.
    pub fn decay_frame(
        &mut self,
        handle: FrameHandle,
        now: Instant,
    ) -> BufferResult<Option<FrameHandle>> {
        let Some(decay) = self.decay.as_mut() else {
            return Ok(None);
        };
        if decay.pending != Some(handle) {
            trace!(?handle, "ignoring stale decay frame");
            return Ok(None);
        }
        decay.pending = None;

        let duration = decay.duration;
        let mut alive = Vec::with_capacity(decay.ghosts.len());

        for &(col, row) in &decay.ghosts {
            let Some(cell) = self.cells.get_mut(col, row) else {
                continue;
            };
            let opacity = match &cell.ghost {
                Some(ghost) => ghost.opacity(now, duration),
                None => continue,
            };

            let paint = PaintCell {
                col,
                row,
                x: cell.x(),
                y: cell.y(),
                width: self.tile_width,
                height: self.tile_height,
                tile: &cell.tile,
                ghost: cell
                    .ghost
                    .as_ref()
                    .filter(|_| opacity > 0.0)
                    .map(|ghost| GhostPaint {
                        tile: &ghost.tile,
                        opacity,
                    }),
            };
            self.backend.paint(&paint)?;

            if opacity > 0.0 {
                alive.push((col, row));
            } else {
                cell.ghost = None;
            }
        }

        self.backend.present()?;
        decay.ghosts = alive;
        if decay.ghosts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(decay.schedule()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{PaintLogHandle, RecordingBackend};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tessera_core::Color;

    fn buffer_with(options: BufferOptions) -> (TileBuffer, PaintLogHandle) {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let buffer = TileBuffer::new(&options, Box::new(backend)).unwrap();
        log.borrow_mut().clear();
        (buffer, log)
    }

    fn new_buffer(cols: u32, rows: u32) -> (TileBuffer, PaintLogHandle) {
        buffer_with(BufferOptions::default().with_size(cols, rows))
    }

    #[test]
    fn test_new_paints_every_cell_once() {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let options = BufferOptions::default().with_size(3, 2);
        let buffer = TileBuffer::new(&options, Box::new(backend)).unwrap();

        let log = log.borrow();
        assert_eq!(log.resizes, vec![(36, 32)]);
        assert_eq!(
            log.positions(),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(buffer.dirty_len(), 0);
        assert_eq!(buffer.get_tile(2, 1), Some(buffer.clear_style()));
        assert_eq!(buffer.cell(2, 1).map(|c| (c.x(), c.y())), Some((24, 16)));
    }

    #[test]
    fn test_set_tile_change_detection() {
        let (mut buffer, _log) = new_buffer(4, 4);
        let tile = Tile::new().with_char('a');

        assert!(buffer.set_tile(1, 1, &tile));
        assert!(!buffer.set_tile(1, 1, &tile));
        assert_eq!(buffer.dirty_len(), 1);

        // Same value as the clear style: nothing to repaint.
        let (mut buffer, _log) = new_buffer(4, 4);
        assert!(!buffer.set_tile(0, 0, &Tile::new().with_bg(Color::BLACK)));
        assert_eq!(buffer.dirty_len(), 0);
    }

    #[test]
    fn test_set_tile_keeps_unset_fields() {
        let (mut buffer, _log) = new_buffer(2, 2);
        buffer.set_tile(0, 0, &Tile::new().with_char('z'));
        buffer.set_tile(0, 0, &Tile::new().with_bg(Color::BLUE));

        let tile = buffer.get_tile(0, 0).unwrap();
        assert_eq!(tile.ch, Some('z'));
        assert_eq!(tile.bg, Some(Color::BLUE));
        assert_eq!(tile.fg, buffer.clear_style().fg);
    }

    #[test]
    fn test_set_tile_outside_buffer_is_ignored() {
        let (mut buffer, _log) = new_buffer(2, 2);
        assert!(!buffer.set_tile(-1, 0, &Tile::new().with_char('x')));
        assert!(!buffer.set_tile(2, 0, &Tile::new().with_char('x')));
        assert_eq!(buffer.get_tile(2, 0), None);
        assert_eq!(buffer.dirty_len(), 0);
    }

    #[test]
    fn test_viewport_stack_intersects() {
        let (mut buffer, _log) = new_buffer(10, 10);
        assert_eq!(buffer.viewport(), Viewport::new(0, 0, 9, 9));

        buffer.push_viewport(Viewport::new(2, 2, 20, 20));
        assert_eq!(buffer.viewport(), Viewport::new(2, 2, 9, 9));

        buffer.push_viewport(Viewport::new(0, 0, 4, 4));
        assert_eq!(buffer.viewport(), Viewport::new(2, 2, 4, 4));
        assert_eq!(buffer.viewport_depth(), 2);

        assert!(buffer.set_tile(3, 3, &Tile::new().with_char('a')));
        assert!(!buffer.set_tile(5, 5, &Tile::new().with_char('b')));
        assert!(!buffer.set_tile(1, 1, &Tile::new().with_char('c')));

        assert_eq!(buffer.pop_viewport(), Some(Viewport::new(2, 2, 4, 4)));
        assert!(buffer.set_tile(5, 5, &Tile::new().with_char('b')));
    }

    #[test]
    fn test_disjoint_viewport_blocks_everything() {
        let (mut buffer, _log) = new_buffer(10, 10);
        buffer.push_viewport(Viewport::new(0, 0, 2, 2));
        buffer.push_viewport(Viewport::new(5, 5, 8, 8));

        assert!(buffer.viewport().is_empty());
        assert!(!buffer.set_tile(0, 0, &Tile::new().with_char('a')));
        assert!(!buffer.set_tile(6, 6, &Tile::new().with_char('a')));
    }

    #[test]
    fn test_pop_base_viewport() {
        let (mut buffer, _log) = new_buffer(3, 3);
        assert_eq!(buffer.pop_viewport(), None);
        assert_eq!(buffer.pop_viewport(), None);
        assert_eq!(buffer.viewport(), Viewport::new(0, 0, 2, 2));
    }

    #[test]
    fn test_get_tile_mut_is_not_tracked() {
        let (mut buffer, log) = new_buffer(2, 2);
        buffer.get_tile_mut(1, 1).unwrap().ch = Some('q');
        assert_eq!(buffer.dirty_len(), 0);

        buffer.render().unwrap();
        assert!(log.borrow().cells.is_empty());
        assert_eq!(buffer.get_tile(1, 1).unwrap().ch, Some('q'));
    }

    #[test]
    fn test_clear_queues_unconditionally() {
        let (mut buffer, log) = new_buffer(2, 2);
        buffer.clear();
        assert_eq!(buffer.dirty_len(), 4);

        buffer.render().unwrap();
        assert_eq!(log.borrow().cells.len(), 4);
        assert_eq!(buffer.dirty_len(), 0);
    }

    #[test]
    fn test_clear_region_clamps_and_resets() {
        let (mut buffer, _log) = new_buffer(4, 4);
        buffer.set_tile(3, 3, &Tile::new().with_char('a').with_bg(Color::RED));
        buffer.render().unwrap();

        buffer.clear_region(2, 2, 10, 10);
        assert_eq!(buffer.dirty_len(), 4);
        assert_eq!(buffer.get_tile(3, 3), Some(buffer.clear_style()));
    }

    #[test]
    fn test_clear_ignores_viewport() {
        let (mut buffer, _log) = new_buffer(4, 4);
        buffer.set_tile(0, 0, &Tile::new().with_char('a'));
        buffer.push_viewport(Viewport::new(3, 3, 3, 3));
        buffer.clear();
        assert_eq!(buffer.get_tile(0, 0).unwrap().ch, None);
    }

    #[test]
    fn test_set_clear_style() {
        let (mut buffer, _log) = new_buffer(2, 1);
        buffer.set_clear_style(&Tile::new().with_bg(Color::BLUE).with_char('.'));
        buffer.clear();

        let tile = buffer.get_tile(1, 0).unwrap();
        assert_eq!(tile.bg, Some(Color::BLUE));
        assert_eq!(tile.ch, Some('.'));
        assert_eq!(tile.font, buffer.clear_style().font);
    }

    #[test]
    fn test_render_keeps_accumulation_order() {
        let (mut buffer, log) = new_buffer(5, 5);
        buffer.set_tile(4, 4, &Tile::new().with_char('a'));
        buffer.set_tile(0, 0, &Tile::new().with_char('b'));
        buffer.set_tile(2, 1, &Tile::new().with_char('c'));
        buffer.set_tile(4, 4, &Tile::new().with_char('d'));

        buffer.render().unwrap();
        let log = log.borrow();
        assert_eq!(log.positions(), vec![(4, 4), (0, 0), (2, 1)]);
        assert_eq!(log.cells[0].tile.ch, Some('d'));
        assert_eq!(log.presents, 1);
    }

    #[test]
    fn test_resize_keeps_cells_and_renders() {
        let (mut buffer, log) = new_buffer(2, 2);
        buffer.set_tile(1, 1, &Tile::new().with_char('k'));
        buffer.push_viewport(Viewport::new(0, 0, 0, 0));

        buffer.resize(3, 1).unwrap();

        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 1);
        assert_eq!(buffer.viewport(), Viewport::new(0, 0, 2, 0));
        assert_eq!(buffer.viewport_depth(), 0);
        assert_eq!(buffer.get_tile(1, 1), None);
        assert_eq!(buffer.get_tile(2, 0), Some(buffer.clear_style()));
        assert_eq!(buffer.dirty_len(), 0);

        let log = log.borrow();
        assert_eq!(log.resizes, vec![(36, 16)]);
        assert_eq!(log.positions(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_resize_grow_preserves_content() {
        let (mut buffer, _log) = new_buffer(2, 2);
        buffer.set_tile(1, 0, &Tile::new().with_char('p'));
        buffer.resize(4, 4).unwrap();

        assert_eq!(buffer.get_tile(1, 0).unwrap().ch, Some('p'));
        assert_eq!(buffer.get_tile(3, 3), Some(buffer.clear_style()));
        assert_eq!(buffer.cell(3, 3).map(|c| (c.x(), c.y())), Some((36, 48)));
    }

    mod decay_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        fn decaying(cols: u32, rows: u32) -> (TileBuffer, PaintLogHandle) {
            buffer_with(
                BufferOptions::default()
                    .with_size(cols, rows)
                    .with_decay(Duration::from_millis(100)),
            )
        }

        #[test]
        fn test_no_frame_without_decay() {
            let (mut buffer, _log) = new_buffer(2, 2);
            buffer.set_tile(0, 0, &Tile::new().with_char('a'));
            buffer.set_tile(0, 0, &Tile::new().with_char('b'));
            buffer.render().unwrap();
            assert_eq!(buffer.pending_frame(), None);
        }

        #[test]
        fn test_glyph_change_schedules_frame() {
            let (mut buffer, log) = decaying(2, 2);
            buffer.set_tile(0, 0, &Tile::new().with_char('a'));
            buffer.render().unwrap();
            assert_eq!(buffer.pending_frame(), None);

            buffer.set_tile(0, 0, &Tile::new().with_char('b'));
            assert!(buffer.cell(0, 0).unwrap().is_decaying());
            buffer.render().unwrap();
            let handle = buffer.pending_frame().unwrap();

            log.borrow_mut().clear();
            let now = Instant::now() + Duration::from_millis(50);
            let next = buffer.decay_frame(handle, now).unwrap();
            assert!(next.is_some());

            let log = log.borrow();
            assert_eq!(log.positions(), vec![(0, 0)]);
            let (ghost, opacity) = log.cells[0].ghost.clone().unwrap();
            assert_eq!(ghost.ch, Some('a'));
            assert!(opacity > 0.0 && opacity <= 0.5);
            assert_eq!(log.cells[0].tile.ch, Some('b'));
        }

        #[test]
        fn test_render_cancels_pending_frame() {
            let (mut buffer, log) = decaying(2, 2);
            buffer.set_tile(1, 1, &Tile::new().with_char('a'));
            buffer.set_tile(1, 1, &Tile::new().with_char('b'));
            buffer.render().unwrap();
            let stale = buffer.pending_frame().unwrap();

            buffer.render().unwrap();
            let fresh = buffer.pending_frame().unwrap();
            assert_ne!(stale, fresh);

            log.borrow_mut().clear();
            assert_eq!(buffer.decay_frame(stale, Instant::now()).unwrap(), None);
            assert!(log.borrow().cells.is_empty());
        }

        #[test]
        fn test_ghost_dropped_after_duration() {
            let (mut buffer, log) = decaying(2, 2);
            buffer.set_tile(0, 1, &Tile::new().with_char('a'));
            buffer.set_tile(0, 1, &Tile::new().with_char('b'));
            buffer.render().unwrap();
            let handle = buffer.pending_frame().unwrap();

            log.borrow_mut().clear();
            let later = Instant::now() + Duration::from_secs(1);
            assert_eq!(buffer.decay_frame(handle, later).unwrap(), None);
            assert_eq!(buffer.pending_frame(), None);
            assert!(!buffer.cell(0, 1).unwrap().is_decaying());

            let log = log.borrow();
            assert_eq!(log.positions(), vec![(0, 1)]);
            assert_eq!(log.cells[0].ghost, None);
        }

        #[test]
        fn test_clear_starts_decay() {
            let (mut buffer, _log) = decaying(2, 1);
            buffer.set_tile(1, 0, &Tile::new().with_char('x'));
            buffer.render().unwrap();

            buffer.clear();
            buffer.render().unwrap();
            assert!(buffer.cell(1, 0).unwrap().is_decaying());
            assert!(!buffer.cell(0, 0).unwrap().is_decaying());
            assert!(buffer.pending_frame().is_some());
        }
    }
}

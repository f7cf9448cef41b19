//! Paint backends.
//!
//! A [`TileBuffer`](crate::TileBuffer) never draws by itself. On every flush
//! it hands each dirty cell to a [`PaintBackend`], once per cell, in the order
//! the cells became dirty. The backend fills the cell background and draws
//! the glyph at `y + tile_height + offset_y`, `x + offset_x`.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_core::{Result, Tile};

/// A decaying glyph drawn over a cell.
#[derive(Debug, Clone, Copy)]
pub struct GhostPaint<'a> {
    /// The tile the cell showed before its glyph changed.
    pub tile: &'a Tile,
    /// Remaining opacity, in `(0.0, 1.0]`.
    pub opacity: f32,
}

/// Everything a backend needs to paint one cell.
#[derive(Debug, Clone, Copy)]
pub struct PaintCell<'a> {
    /// Column of the cell.
    pub col: i32,
    /// Row of the cell.
    pub row: i32,
    /// Left edge of the cell, in pixels.
    pub x: i32,
    /// Top edge of the cell, in pixels.
    pub y: i32,
    /// Tile width, in pixels.
    pub width: u32,
    /// Tile height, in pixels.
    pub height: u32,
    /// Current content of the cell.
    pub tile: &'a Tile,
    /// Fading previous glyph, when the decay effect is running.
    pub ghost: Option<GhostPaint<'a>>,
}

impl PaintCell<'_> {
    /// Pixel position where the glyph baseline starts.
    pub fn glyph_origin(&self) -> (i32, i32) {
        (
            self.x + self.tile.offset_x.unwrap_or(0),
            self.y + self.height as i32 + self.tile.offset_y.unwrap_or(0),
        )
    }
}

/// Trait for the surface a tile buffer is flushed to.
pub trait PaintBackend {
    /// Called when the buffer changes size, with the new size in pixels.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Paints one cell.
    fn paint(&mut self, cell: &PaintCell<'_>) -> Result<()>;

    /// Called once after a batch of cells was painted.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Recording backend
// ============================================================================

/// One cell as seen by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaintRecord {
    /// Column of the cell.
    pub col: i32,
    /// Row of the cell.
    pub row: i32,
    /// Painted tile.
    pub tile: Tile,
    /// Ghost tile and its opacity, if one was drawn.
    pub ghost: Option<(Tile, f32)>,
}

/// Everything a [`RecordingBackend`] received.
#[derive(Debug, Default)]
pub struct PaintLog {
    /// Painted cells, in call order.
    pub cells: Vec<PaintRecord>,
    /// Pixel sizes passed to `resize`.
    pub resizes: Vec<(u32, u32)>,
    /// Number of `present` calls.
    pub presents: usize,
}

impl PaintLog {
    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.resizes.clear();
        self.presents = 0;
    }

    /// Positions of the painted cells, in call order.
    pub fn positions(&self) -> Vec<(i32, i32)> {
        self.cells.iter().map(|c| (c.col, c.row)).collect()
    }
}

/// Shared handle to a [`PaintLog`].
pub type PaintLogHandle = Rc<RefCell<PaintLog>>;

/// A headless backend that records what it is asked to paint.
///
/// Keep a [`PaintLogHandle`] from [`RecordingBackend::log`] before boxing the
/// backend into a buffer to inspect the output later.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    log: PaintLogHandle,
}

impl RecordingBackend {
    /// Creates a backend with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the log.
    pub fn log(&self) -> PaintLogHandle {
        Rc::clone(&self.log)
    }
}

impl PaintBackend for RecordingBackend {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.log.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn paint(&mut self, cell: &PaintCell<'_>) -> Result<()> {
        self.log.borrow_mut().cells.push(PaintRecord {
            col: cell.col,
            row: cell.row,
            tile: cell.tile.clone(),
            ghost: cell.ghost.map(|g| (g.tile.clone(), g.opacity)),
        });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.log.borrow_mut().presents += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Color;

    #[test]
    fn test_glyph_origin_applies_offsets() {
        let tile = Tile::new().with_char('a').with_offset(2, -1);
        let cell = PaintCell {
            col: 1,
            row: 2,
            x: 12,
            y: 32,
            width: 12,
            height: 16,
            tile: &tile,
            ghost: None,
        };
        assert_eq!(cell.glyph_origin(), (14, 47));
    }

    #[test]
    fn test_recording_backend_shares_log() {
        let mut backend = RecordingBackend::new();
        let log = backend.log();
        let tile = Tile::new().with_bg(Color::RED);

        backend.resize(24, 16).unwrap();
        backend
            .paint(&PaintCell {
                col: 0,
                row: 0,
                x: 0,
                y: 0,
                width: 12,
                height: 16,
                tile: &tile,
                ghost: None,
            })
            .unwrap();
        backend.present().unwrap();

        let log = log.borrow();
        assert_eq!(log.resizes, vec![(24, 16)]);
        assert_eq!(log.positions(), vec![(0, 0)]);
        assert_eq!(log.cells[0].tile, tile);
        assert_eq!(log.presents, 1);
    }
}

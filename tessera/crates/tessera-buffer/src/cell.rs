//! Buffer cells.

use tessera_core::Tile;

use crate::decay::Ghost;

/// One cell of a [`TileBuffer`](crate::TileBuffer).
///
/// A cell keeps its pixel position for its whole life: resizing the buffer
/// keeps the cells that are still in bounds, so this never goes stale.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    x: i32,
    y: i32,
    pub(crate) tile: Tile,
    /// Set while the cell sits in the dirty list.
    pub(crate) queued: bool,
    pub(crate) ghost: Option<Ghost>,
}

impl Cell {
    pub(crate) fn new(x: i32, y: i32, tile: Tile) -> Self {
        Self {
            x,
            y,
            tile,
            queued: false,
            ghost: None,
        }
    }

    /// Left edge of the cell, in pixels.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top edge of the cell, in pixels.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Current content of the cell.
    #[inline]
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    /// Returns true if the cell will be painted on the next flush.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.queued
    }

    /// Returns true if a previous glyph is still fading out of this cell.
    #[inline]
    pub fn is_decaying(&self) -> bool {
        self.ghost.is_some()
    }
}

//! Tile-space geometry: inclusive boxes, padding and small numeric helpers.
//!
//! Every box in Tessera is described by its top-left (`col0`, `row0`) and
//! bottom-right (`col1`, `row1`) corners, both inclusive. A box whose
//! `col1 < col0` or `row1 < row0` is empty. This is what a zero-sized element
//! or the intersection of two disjoint boxes produces, and it is kept as-is
//! instead of being normalized.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns true if `(x, y)` lies inside the box `(x0, y0)`-`(x1, y1)`.
///
/// Borders count as inside.
#[inline]
pub fn is_inside_box(x: i32, y: i32, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
    x >= x0 && x <= x1 && y >= y0 && y <= y1
}

/// Clamps `value` between two bounds given in either order.
///
/// Unlike [`i32::clamp`] this never panics: if `min > max` the bounds are
/// swapped.
#[inline]
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.max(lo).min(hi)
}

// ============================================================================
// Viewport
// ============================================================================

/// An inclusive rectangle of tiles.
///
/// Used both for the absolute box of an element and for the clipping
/// viewports of a tile buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Left-most column.
    pub col0: i32,
    /// Top-most row.
    pub row0: i32,
    /// Right-most column (inclusive).
    pub col1: i32,
    /// Bottom-most row (inclusive).
    pub row1: i32,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport({}, {})-({}, {})",
            self.col0, self.row0, self.col1, self.row1
        )
    }
}

impl Viewport {
    /// Creates a box from its inclusive corners.
    #[inline]
    pub const fn new(col0: i32, row0: i32, col1: i32, row1: i32) -> Self {
        Self {
            col0,
            row0,
            col1,
            row1,
        }
    }

    /// Creates a box from a top-left corner and a size.
    ///
    /// A width or height of 0 yields an empty box.
    #[inline]
    pub const fn from_size(col: i32, row: i32, width: i32, height: i32) -> Self {
        Self::new(col, row, col + width - 1, row + height - 1)
    }

    /// Number of columns covered, 0 when empty.
    #[inline]
    pub fn width(&self) -> i32 {
        (self.col1 - self.col0 + 1).max(0)
    }

    /// Number of rows covered, 0 when empty.
    #[inline]
    pub fn height(&self) -> i32 {
        (self.row1 - self.row0 + 1).max(0)
    }

    /// Returns true if the box covers no tile.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.col1 < self.col0 || self.row1 < self.row0
    }

    /// Returns true if the tile at `(col, row)` is inside the box.
    #[inline]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        is_inside_box(col, row, self.col0, self.row0, self.col1, self.row1)
    }

    /// Returns the overlap of two boxes.
    ///
    /// Disjoint boxes produce an empty box; callers check [`Viewport::is_empty`].
    #[inline]
    pub fn intersection(self, other: Self) -> Self {
        Self {
            col0: self.col0.max(other.col0),
            row0: self.row0.max(other.row0),
            col1: self.col1.min(other.col1),
            row1: self.row1.min(other.row1),
        }
    }

    /// Returns this box moved by the given offset.
    #[inline]
    pub fn translate(self, dcol: i32, drow: i32) -> Self {
        Self::new(
            self.col0 + dcol,
            self.row0 + drow,
            self.col1 + dcol,
            self.row1 + drow,
        )
    }

    /// Iterates the `(col, row)` positions covered, row by row.
    pub fn positions(self) -> impl Iterator<Item = (i32, i32)> {
        (self.row0..=self.row1)
            .flat_map(move |row| (self.col0..=self.col1).map(move |col| (col, row)))
    }
}

// ============================================================================
// Padding
// ============================================================================

/// Inner spacing of an element, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Rows reserved at the top.
    pub top: i32,
    /// Columns reserved on the right.
    pub right: i32,
    /// Rows reserved at the bottom.
    pub bottom: i32,
    /// Columns reserved on the left.
    pub left: i32,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates padding in CSS order: top, right, bottom, left.
    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same padding on every side.
    #[inline]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Applies the sides set in `patch`, keeping the others.
    pub fn merge(&mut self, patch: PaddingPatch) {
        if let Some(top) = patch.top {
            self.top = top;
        }
        if let Some(right) = patch.right {
            self.right = right;
        }
        if let Some(bottom) = patch.bottom {
            self.bottom = bottom;
        }
        if let Some(left) = patch.left {
            self.left = left;
        }
    }
}

/// A partial padding update. Sides left as `None` are not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingPatch {
    /// New top padding.
    pub top: Option<i32>,
    /// New right padding.
    pub right: Option<i32>,
    /// New bottom padding.
    pub bottom: Option<i32>,
    /// New left padding.
    pub left: Option<i32>,
}

impl PaddingPatch {
    /// Sets the top side.
    pub fn top(mut self, value: i32) -> Self {
        self.top = Some(value);
        self
    }

    /// Sets the right side.
    pub fn right(mut self, value: i32) -> Self {
        self.right = Some(value);
        self
    }

    /// Sets the bottom side.
    pub fn bottom(mut self, value: i32) -> Self {
        self.bottom = Some(value);
        self
    }

    /// Sets the left side.
    pub fn left(mut self, value: i32) -> Self {
        self.left = Some(value);
        self
    }
}

impl From<Padding> for PaddingPatch {
    fn from(padding: Padding) -> Self {
        Self {
            top: Some(padding.top),
            right: Some(padding.right),
            bottom: Some(padding.bottom),
            left: Some(padding.left),
        }
    }
}

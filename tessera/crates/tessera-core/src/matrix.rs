//! A resizable 2D grid stored in row-major order.

/// A `cols` × `rows` grid of values.
///
/// Resizing keeps every value whose position is still in bounds and creates
/// the new ones with a caller-supplied function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix<T> {
    cells: Vec<T>,
    cols: usize,
    rows: usize,
}

impl<T> Matrix<T> {
    /// Creates a grid, building each value from its `(col, row)` position.
    pub fn from_fn(cols: usize, rows: usize, mut fill: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(fill(col, row));
            }
        }
        Self { cells, cols, rows }
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns true if the grid holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    /// Returns the value at `(col, row)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, col: i32, row: i32) -> Option<&T> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Returns the value at `(col, row)` mutably, or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut T> {
        self.index(col, row).map(|i| &mut self.cells[i])
    }

    /// Replaces the value at `(col, row)`. Returns false when out of bounds.
    pub fn set(&mut self, col: i32, row: i32, value: T) -> bool {
        match self.get_mut(col, row) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Returns the values of one row.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    /// Iterates over every value in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Iterates mutably over every value in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.cells.iter_mut()
    }

    /// Resizes the grid in place.
    ///
    /// Values inside both the old and the new bounds keep their position.
    /// Rows and columns beyond the new size are dropped; new positions are
    /// filled by calling `fill(col, row)`.
    pub fn resize_with(
        &mut self,
        cols: usize,
        rows: usize,
        mut fill: impl FnMut(usize, usize) -> T,
    ) {
        if cols == self.cols && rows == self.rows {
            return;
        }

        let old_cols = self.cols;
        let old_rows = self.rows;
        let mut old = std::mem::take(&mut self.cells).into_iter();
        let mut cells = Vec::with_capacity(cols * rows);

        for row in 0..rows {
            if row < old_rows {
                let mut kept: Vec<T> = old.by_ref().take(old_cols).collect();
                kept.truncate(cols);
                cells.extend(kept);
                cells.extend((old_cols..cols).map(|col| fill(col, row)));
            } else {
                cells.extend((0..cols).map(|col| fill(col, row)));
            }
        }

        self.cells = cells;
        self.cols = cols;
        self.rows = rows;
    }
}

impl<T: Clone> Matrix<T> {
    /// Creates a grid with every position set to `value`.
    pub fn filled(cols: usize, rows: usize, value: T) -> Self {
        Self {
            cells: vec![value; cols * rows],
            cols,
            rows,
        }
    }

    /// Resizes the grid, filling new positions with clones of `value`.
    pub fn resize(&mut self, cols: usize, rows: usize, value: T) {
        self.resize_with(cols, rows, |_, _| value.clone());
    }

    /// Sets every position to a clone of `value`.
    pub fn fill(&mut self, value: T) {
        for cell in &mut self.cells {
            *cell = value.clone();
        }
    }
}

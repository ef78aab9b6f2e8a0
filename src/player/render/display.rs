//! The believed on-screen state.
//!
//! The real terminal cannot be read back, so the renderer keeps its own
//! copy of every cell it has written and diffs new frames against it.

use image::RgbImage;

use super::cell::TerminalCell;

/// Row-major grid of the cells last written to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    rows: usize,
    cols: usize,
    cells: Vec<TerminalCell>,
}

impl DisplayState {
    /// Cell rows needed for a frame `pixel_height` pixels tall.
    #[inline]
    pub fn rows_for_height(pixel_height: u32) -> usize {
        (pixel_height as usize).div_ceil(2)
    }

    /// Build the grid that exactly represents `frame`.
    pub fn from_frame(frame: &RgbImage) -> Self {
        let rows = Self::rows_for_height(frame.height());
        let cols = frame.width() as usize;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(TerminalCell::from_frame(frame, row as u32, col as u32));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `frame` maps onto a grid of the same shape.
    pub fn matches_frame(&self, frame: &RgbImage) -> bool {
        self.cols == frame.width() as usize && self.rows == Self::rows_for_height(frame.height())
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&TerminalCell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Overwrite one cell. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: TerminalCell) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = cell;
        }
    }

    /// Iterate over the rows of the grid.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[TerminalCell]> {
        // chunks(0) panics; an empty grid simply yields nothing
        self.cells.chunks(self.cols.max(1))
    }
}

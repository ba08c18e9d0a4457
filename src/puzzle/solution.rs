#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A filled grid: one rotated piece per cell.

use crate::puzzle::piece::{ART_LINES, BOUNDARY, Piece};
use std::fmt;

/// Pieces laid out row by row, each carrying the rotation it is placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    width: usize,
    height: usize,
    bounded: bool,
    cells: Vec<Piece>,
}

impl Solution {
    /// Builds a grid from cells in row-major order (`place = y * width + x`).
    ///
    /// Returns `None` if `cells` does not hold exactly `width * height` pieces.
    #[must_use]
    pub fn new(width: usize, height: usize, bounded: bool, cells: Vec<Piece>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            bounded,
            cells,
        })
    }

    /// Grid width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Placed pieces, row by row.
    #[must_use]
    pub fn cells(&self) -> &[Piece] {
        &self.cells
    }

    /// The piece in column `x`, row `y`, or `None` outside the grid.
    #[must_use]
    pub fn piece_at(&self, x: usize, y: usize) -> Option<&Piece> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// Counts adjacent edges whose colors disagree, plus outer edges of a
    /// bounded puzzle that are not the boundary color.
    #[must_use]
    pub fn mismatches(&self) -> usize {
        let mut count = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let piece = &self.cells[y * self.width + x];
                if let Some(right) = self.piece_at(x + 1, y) {
                    count += usize::from(piece.color(1) != right.color(3));
                } else if self.bounded {
                    count += usize::from(piece.color(1) != BOUNDARY);
                }
                if let Some(below) = self.piece_at(x, y + 1) {
                    count += usize::from(piece.color(2) != below.color(0));
                } else if self.bounded {
                    count += usize::from(piece.color(2) != BOUNDARY);
                }
                if self.bounded && x == 0 {
                    count += usize::from(piece.color(3) != BOUNDARY);
                }
                if self.bounded && y == 0 {
                    count += usize::from(piece.color(0) != BOUNDARY);
                }
            }
        }
        count
    }

    /// Whether every edge matches.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.mismatches() == 0
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for line in 0..ART_LINES {
                for piece in row {
                    write!(f, "{}", piece.art_line(line))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! An edge-matching puzzle: grid dimensions, options and the pieces sorted by
//! the kind of cell they fit.

use crate::puzzle::piece::{BOUNDARY, Color, Piece, PieceKind};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Reasons a puzzle cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// A piece fits no cell: three or more boundary edges, or two opposite ones.
    #[error("piece {piece:?} has {zeros} boundary edges in a pattern no cell can hold")]
    InvalidPiece {
        /// The piece's colors.
        piece: [Color; 4],
        /// Its number of boundary edges.
        zeros: usize,
    },

    /// An unbounded puzzle has a piece with a boundary edge.
    #[error("piece {piece:?} has a boundary edge but the puzzle is unbounded")]
    BoundaryInUnbounded {
        /// The piece's colors.
        piece: [Color; 4],
    },

    /// An unsigned puzzle has a piece with a negative color.
    #[error("piece {piece:?} uses a negative color in an unsigned puzzle")]
    NegativeColor {
        /// The piece's colors.
        piece: [Color; 4],
    },

    /// The puzzle is signed.
    #[error("signed puzzles are not supported")]
    SignedUnsupported,

    /// The grid is below the minimum size for its kind.
    #[error("a {width}x{height} grid is too small for a {kind} puzzle")]
    BadDimensions {
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
        /// `"bounded"` or `"unbounded"`.
        kind: &'static str,
    },

    /// A piece group does not match the grid.
    #[error("expected {expected} {kind} pieces, found {found}")]
    WrongCount {
        /// The group.
        kind: PieceKind,
        /// Pieces the grid needs.
        expected: usize,
        /// Pieces read.
        found: usize,
    },
}

/// An edge-matching puzzle instance.
///
/// Pieces are kept in three groups in insertion order. Both color palettes are
/// kept sorted; their order defines the dense color indices of the encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    bounded: bool,
    signed: bool,
    width: usize,
    height: usize,
    corners: Vec<Piece>,
    borders: Vec<Piece>,
    centers: Vec<Piece>,
    unplaceable: Vec<Piece>,
    border_colors: BTreeSet<Color>,
    center_colors: BTreeSet<Color>,
}

impl Problem {
    /// An empty puzzle.
    #[must_use]
    pub const fn new(bounded: bool, signed: bool, width: usize, height: usize) -> Self {
        Self {
            bounded,
            signed,
            width,
            height,
            corners: Vec::new(),
            borders: Vec::new(),
            centers: Vec::new(),
            unplaceable: Vec::new(),
            border_colors: BTreeSet::new(),
            center_colors: BTreeSet::new(),
        }
    }

    /// Sorts a piece into its group and records its colors in the palettes.
    ///
    /// In an unbounded puzzle every piece is a center piece. Pieces with more
    /// than two boundary edges or two opposite ones fit no cell; they are kept
    /// aside, `None` is returned and [`Problem::validate`] reports them.
    pub fn add_piece(&mut self, piece: Piece) -> Option<PieceKind> {
        let Some(kind) = piece.kind() else {
            self.unplaceable.push(piece);
            return None;
        };

        if !self.bounded {
            self.center_colors.extend(piece.colors());
            self.centers.push(piece);
            return Some(PieceKind::Center);
        }

        match kind {
            PieceKind::Corner => self.corners.push(piece),
            PieceKind::Border => {
                self.center_colors.extend(piece.inward_color());
                self.borders.push(piece);
            }
            PieceKind::Center => {
                self.center_colors.extend(piece.colors());
                self.centers.push(piece);
            }
        }
        if kind != PieceKind::Center {
            self.border_colors.extend(piece.border_color_left());
            self.border_colors.extend(piece.border_color_right());
        }
        Some(kind)
    }

    /// Whether the outer edges carry the boundary color.
    #[must_use]
    pub const fn bounded(&self) -> bool {
        self.bounded
    }

    /// Whether matching edges carry opposite colors.
    #[must_use]
    pub const fn signed(&self) -> bool {
        self.signed
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

    /// Number of cells.
    #[must_use]
    pub const fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Pieces with two adjacent boundary edges.
    #[must_use]
    pub fn corners(&self) -> &[Piece] {
        &self.corners
    }

    /// Pieces with one boundary edge.
    #[must_use]
    pub fn borders(&self) -> &[Piece] {
        &self.borders
    }

    /// Pieces without boundary edges, or every placeable piece of an unbounded
    /// puzzle.
    #[must_use]
    pub fn centers(&self) -> &[Piece] {
        &self.centers
    }

    /// Pieces that fit no cell of the grid.
    #[must_use]
    pub fn unplaceable(&self) -> &[Piece] {
        &self.unplaceable
    }

    /// All pieces: corners, then borders, then centers, then any piece that
    /// fits no cell.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.corners
            .iter()
            .chain(&self.borders)
            .chain(&self.centers)
            .chain(&self.unplaceable)
    }

    /// Total number of pieces read, placeable or not.
    #[must_use]
    pub fn num_pieces(&self) -> usize {
        self.corners.len() + self.borders.len() + self.centers.len() + self.unplaceable.len()
    }

    /// Colors that may appear on diamonds along the boundary.
    #[must_use]
    pub const fn border_colors(&self) -> &BTreeSet<Color> {
        &self.border_colors
    }

    /// Colors that may appear on every other diamond.
    #[must_use]
    pub const fn center_colors(&self) -> &BTreeSet<Color> {
        &self.center_colors
    }

    /// Number of corner, border and center pieces the grid requires.
    #[must_use]
    pub const fn expected_counts(&self) -> (usize, usize, usize) {
        let cells = self.cells();
        if self.bounded {
            let border = (2 * (self.width + self.height)).saturating_sub(8);
            (4, border, cells.saturating_sub(4 + border))
        } else {
            (0, 0, cells)
        }
    }

    /// Whether every piece group has exactly the size the grid requires.
    #[must_use]
    pub fn specification_correct(&self) -> bool {
        let (corners, borders, centers) = self.expected_counts();
        self.corners.len() == corners
            && self.borders.len() == borders
            && self.centers.len() == centers
    }

    /// Checks that the puzzle can be encoded.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: signed mode, a degenerate grid, a
    /// piece no cell can hold, a negative color, a boundary edge in an unbounded puzzle, or a piece
    /// group of the wrong size.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.signed {
            return Err(ProblemError::SignedUnsupported);
        }

        let min = if self.bounded { 2 } else { 1 };
        if self.width < min || self.height < min {
            return Err(ProblemError::BadDimensions {
                width: self.width,
                height: self.height,
                kind: if self.bounded { "bounded" } else { "unbounded" },
            });
        }

        if let Some(piece) = self.unplaceable.first() {
            return Err(ProblemError::InvalidPiece {
                piece: piece.colors(),
                zeros: piece.zero_count(),
            });
        }

        for piece in self.pieces() {
            if piece.colors().iter().any(|&c| c < 0) {
                return Err(ProblemError::NegativeColor {
                    piece: piece.colors(),
                });
            }
            if !self.bounded && piece.colors().contains(&BOUNDARY) {
                return Err(ProblemError::BoundaryInUnbounded {
                    piece: piece.colors(),
                });
            }
        }

        let (corners, borders, centers) = self.expected_counts();
        for (kind, expected, found) in [
            (PieceKind::Corner, corners, self.corners.len()),
            (PieceKind::Border, borders, self.borders.len()),
            (PieceKind::Center, centers, self.centers.len()),
        ] {
            if expected != found {
                return Err(ProblemError::WrongCount {
                    kind,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(f, "Edge-Matching Problem:")?;
        writeln!(f, "Bounded: {}", yes_no(self.bounded))?;
        writeln!(f, "Signed:  {}", yes_no(self.signed))?;
        writeln!(f, "Width:   {}", self.width)?;
        writeln!(f, "Height:  {}", self.height)?;
        writeln!(f, "Pieces: ")?;
        for piece in self.pieces() {
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::fixtures::two_by_two;

    #[test]
    fn test_pieces_are_grouped() {
        let mut problem = Problem::new(true, false, 3, 3);
        assert_eq!(
            problem.add_piece(Piece::new([0, 0, 1, 2])),
            Some(PieceKind::Corner)
        );
        assert_eq!(
            problem.add_piece(Piece::new([0, 1, 5, 2])),
            Some(PieceKind::Border)
        );
        assert_eq!(
            problem.add_piece(Piece::new([5, 6, 7, 8])),
            Some(PieceKind::Center)
        );
        assert_eq!(problem.add_piece(Piece::new([0, 1, 0, 1])), None);
        assert_eq!(problem.num_pieces(), 4);
        assert_eq!(problem.unplaceable(), &[Piece::new([0, 1, 0, 1])]);
    }

    #[test]
    fn test_unplaceable_piece_fails_validation() {
        let mut problem = two_by_two();
        problem.add_piece(Piece::new([0, 7, 0, 8]));
        assert_eq!(
            problem.validate(),
            Err(ProblemError::InvalidPiece {
                piece: [0, 7, 0, 8],
                zeros: 2
            })
        );

        let mut three_zeros = Problem::new(false, false, 1, 1);
        assert_eq!(three_zeros.add_piece(Piece::new([0, 0, 0, 1])), None);
        assert!(matches!(
            three_zeros.validate(),
            Err(ProblemError::InvalidPiece { zeros: 3, .. })
        ));
    }

    #[test]
    fn test_palettes() {
        let mut problem = Problem::new(true, false, 3, 3);
        problem.add_piece(Piece::new([0, 0, 1, 2])).unwrap();
        problem.add_piece(Piece::new([0, 3, 5, 4])).unwrap();
        problem.add_piece(Piece::new([5, 6, 7, 8])).unwrap();

        assert_eq!(
            problem.border_colors().iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            problem.center_colors().iter().copied().collect::<Vec<_>>(),
            vec![5, 6, 7, 8]
        );
    }

    #[test]
    fn test_unbounded_puts_everything_in_center() {
        let mut problem = Problem::new(false, false, 1, 2);
        assert_eq!(
            problem.add_piece(Piece::new([1, 2, 3, 4])),
            Some(PieceKind::Center)
        );
        assert_eq!(
            problem.add_piece(Piece::new([3, 4, 1, 2])),
            Some(PieceKind::Center)
        );
        assert!(problem.specification_correct());
        assert!(problem.validate().is_ok());
        assert_eq!(problem.center_colors().len(), 4);
    }

    #[test]
    fn test_expected_counts() {
        assert_eq!(Problem::new(true, false, 2, 2).expected_counts(), (4, 0, 0));
        assert_eq!(Problem::new(true, false, 4, 3).expected_counts(), (4, 6, 2));
        assert_eq!(Problem::new(false, false, 4, 3).expected_counts(), (0, 0, 12));
    }

    #[test]
    fn test_specification_correct() {
        let problem = two_by_two();
        assert!(problem.specification_correct());
        assert!(problem.validate().is_ok());

        let mut short = Problem::new(true, false, 2, 2);
        short.add_piece(Piece::new([0, 1, 2, 0])).unwrap();
        assert!(!short.specification_correct());
        assert_eq!(
            short.validate(),
            Err(ProblemError::WrongCount {
                kind: PieceKind::Corner,
                expected: 4,
                found: 1
            })
        );
    }

    #[test]
    fn test_signed_is_rejected() {
        let mut problem = Problem::new(true, true, 2, 2);
        for colors in [[0, 1, 2, 0], [0, 0, -3, -1], [3, 0, 0, 4], [-2, -4, 0, 0]] {
            problem.add_piece(Piece::new(colors)).unwrap();
        }
        assert!(problem.specification_correct());
        assert_eq!(problem.validate(), Err(ProblemError::SignedUnsupported));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut negative = Problem::new(false, false, 1, 1);
        negative.add_piece(Piece::new([1, -2, 3, 4])).unwrap();
        assert!(matches!(
            negative.validate(),
            Err(ProblemError::NegativeColor { .. })
        ));

        let mut boundary = Problem::new(false, false, 1, 1);
        boundary.add_piece(Piece::new([0, 2, 3, 4])).unwrap();
        assert!(matches!(
            boundary.validate(),
            Err(ProblemError::BoundaryInUnbounded { .. })
        ));

        assert!(matches!(
            Problem::new(true, false, 1, 4).validate(),
            Err(ProblemError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_display_header() {
        let text = two_by_two().to_string();
        assert!(text.starts_with("Edge-Matching Problem:\nBounded: yes\nSigned:  no\nWidth:   2\nHeight:  2\n"));
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Square puzzle pieces with four colored edges.
//!
//! Edges are stored clockwise starting at the top: `top, right, bottom, left`.
//! Color `0` marks an edge that must lie on the outer boundary of a bounded
//! puzzle.

use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An edge color. `0` is the boundary.
pub type Color = i32;

/// The boundary color.
pub const BOUNDARY: Color = 0;

/// Where a piece can go in a bounded puzzle, by its number of boundary edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    /// Two adjacent boundary edges.
    Corner,
    /// One boundary edge.
    Border,
    /// No boundary edge.
    Center,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corner => write!(f, "corner"),
            Self::Border => write!(f, "border"),
            Self::Center => write!(f, "center"),
        }
    }
}

/// The rotational symmetry of a piece's color pattern, read clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symmetry {
    /// `aaaa`
    Uniform,
    /// `aaab`
    Triple,
    /// `aabb`
    AdjacentPairs,
    /// `abab`
    DiagonalPairs,
    /// `aabc`
    AdjacentPair,
    /// `abac`
    DiagonalPair,
    /// `abcd`
    Distinct,
}

/// A symmetry class together with the canonical colors that parameterize it.
///
/// | symmetry        | colors                                     |
/// |-----------------|--------------------------------------------|
/// | `Uniform`       | `[a]`                                      |
/// | `Triple`        | `[a, b]`, `a` occurs three times           |
/// | `AdjacentPairs` | `[min, max]`                               |
/// | `DiagonalPairs` | `[min, max]`                               |
/// | `AdjacentPair`  | `[a, b, c]`, `b` then `c` follow the pair clockwise |
/// | `DiagonalPair`  | `[a, min(x, y), max(x, y)]`                |
/// | `Distinct`      | clockwise order, starting at the smallest  |
///
/// The result does not depend on the rotation the piece is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    /// How the colors repeat around the piece.
    pub symmetry: Symmetry,
    /// The distinct colors in canonical order.
    pub colors: SmallVec<[Color; 4]>,
}

/// A puzzle piece and its current rotation.
///
/// Equality and hashing ignore rotation: two pieces are equal when one is a
/// rotation of the other.
#[derive(Debug, Clone, Copy)]
pub struct Piece {
    colors: [Color; 4],
    rotation: u8,
}

impl Piece {
    /// A piece with `colors` clockwise from the top, not turned.
    #[must_use]
    pub const fn new(colors: [Color; 4]) -> Self {
        Self {
            colors,
            rotation: 0,
        }
    }

    /// The colors as given, ignoring rotation.
    #[must_use]
    pub const fn colors(&self) -> [Color; 4] {
        self.colors
    }

    /// Number of clockwise quarter turns, `0..4`.
    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Sets the number of clockwise quarter turns (taken modulo 4).
    pub const fn set_rotation(&mut self, rotation: u8) {
        self.rotation = rotation % 4;
    }

    /// A copy of this piece turned to `rotation`.
    #[must_use]
    pub const fn rotated(mut self, rotation: u8) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// The color currently facing `side` (0 = top, then clockwise).
    #[must_use]
    pub const fn color(&self, side: usize) -> Color {
        self.colors[(side + 4 - self.rotation as usize) % 4]
    }

    /// The four colors as currently facing: top, right, bottom, left.
    #[must_use]
    pub const fn oriented(&self) -> [Color; 4] {
        [self.color(0), self.color(1), self.color(2), self.color(3)]
    }

    /// Number of boundary edges.
    #[must_use]
    pub fn zero_count(&self) -> usize {
        self.colors.iter().filter(|&&c| c == BOUNDARY).count()
    }

    /// The placement class of the piece, or `None` if no cell of a bounded
    /// grid can hold it (three or more boundary edges, or two opposite ones).
    #[must_use]
    pub fn kind(&self) -> Option<PieceKind> {
        match self.zero_count() {
            0 => Some(PieceKind::Center),
            1 => Some(PieceKind::Border),
            2 if (0..4)
                .any(|i| self.colors[i] == BOUNDARY && self.colors[(i + 1) % 4] == BOUNDARY) =>
            {
                Some(PieceKind::Corner)
            }
            _ => None,
        }
    }

    /// The non-boundary color just counter-clockwise of a boundary edge.
    ///
    /// Seen from inside the puzzle with the boundary at the top, this is the
    /// color on the left.
    #[must_use]
    pub fn border_color_left(&self) -> Option<Color> {
        (0..4)
            .find(|&i| self.colors[i] != BOUNDARY && self.colors[(i + 1) % 4] == BOUNDARY)
            .map(|i| self.colors[i])
    }

    /// The non-boundary color just clockwise of a boundary edge.
    #[must_use]
    pub fn border_color_right(&self) -> Option<Color> {
        (0..4)
            .find(|&i| self.colors[i] == BOUNDARY && self.colors[(i + 1) % 4] != BOUNDARY)
            .map(|i| self.colors[(i + 1) % 4])
    }

    /// For a border piece, the color opposite its boundary edge.
    #[must_use]
    pub fn inward_color(&self) -> Option<Color> {
        if self.zero_count() != 1 {
            return None;
        }
        (0..4)
            .find(|&i| self.colors[i] == BOUNDARY)
            .map(|i| self.colors[(i + 2) % 4])
    }

    /// Whether `other` is `self` turned by some number of quarter turns.
    #[must_use]
    pub fn is_rotation_of(&self, other: &Self) -> bool {
        (0..4).any(|r| (0..4).all(|i| self.colors[i] == other.colors[(i + r) % 4]))
    }

    /// The lexicographically smallest clockwise reading of the colors.
    fn canonical(&self) -> [Color; 4] {
        (0..4)
            .map(|r| {
                [
                    self.colors[r],
                    self.colors[(r + 1) % 4],
                    self.colors[(r + 2) % 4],
                    self.colors[(r + 3) % 4],
                ]
            })
            .min()
            .unwrap_or(self.colors)
    }

    /// Classifies the color pattern into one of the seven symmetry classes.
    #[must_use]
    pub fn classification(&self) -> Classification {
        let c = self.colors;
        let at = |i: usize| c[i % 4];
        let mut distinct: SmallVec<[Color; 4]> = c.iter().copied().collect();
        distinct.sort_unstable();
        distinct.dedup();

        let (symmetry, colors): (Symmetry, SmallVec<[Color; 4]>) = match distinct.len() {
            1 => (Symmetry::Uniform, SmallVec::from_slice(&[c[0]])),
            2 => {
                let count = |color: Color| c.iter().filter(|&&x| x == color).count();
                let (lo, hi) = (distinct[0], distinct[1]);
                if count(lo) == 3 {
                    (Symmetry::Triple, SmallVec::from_slice(&[lo, hi]))
                } else if count(hi) == 3 {
                    (Symmetry::Triple, SmallVec::from_slice(&[hi, lo]))
                } else if c[0] == c[2] {
                    (Symmetry::DiagonalPairs, SmallVec::from_slice(&[lo, hi]))
                } else {
                    (Symmetry::AdjacentPairs, SmallVec::from_slice(&[lo, hi]))
                }
            }
            3 => {
                if c[0] == c[2] || c[1] == c[3] {
                    let pair = if c[0] == c[2] { 0 } else { 1 };
                    let (x, y) = (at(pair + 1), at(pair + 3));
                    (
                        Symmetry::DiagonalPair,
                        SmallVec::from_slice(&[at(pair), x.min(y), x.max(y)]),
                    )
                } else {
                    let start = (0..4).find(|&i| at(i) == at(i + 1)).unwrap_or(0);
                    (
                        Symmetry::AdjacentPair,
                        SmallVec::from_slice(&[at(start), at(start + 2), at(start + 3)]),
                    )
                }
            }
            _ => (Symmetry::Distinct, SmallVec::from_slice(&self.canonical())),
        };

        Classification { symmetry, colors }
    }

    /// One of the seven lines of the piece's ASCII drawing, using the current
    /// orientation.
    #[must_use]
    pub fn art_line(&self, line: usize) -> String {
        match line {
            1 => format!("|\\  {}  /|", self.color(0)),
            2 => "|  \\ /  |".to_string(),
            3 => format!("|{}  X  {}|", self.color(3), self.color(1)),
            4 => "|  / \\  |".to_string(),
            5 => format!("|/  {}  \\|", self.color(2)),
            _ => "+-------+".to_string(),
        }
    }
}

/// Number of lines in [`Piece::art_line`] drawings.
pub const ART_LINES: usize = 7;

impl From<[Color; 4]> for Piece {
    fn from(colors: [Color; 4]) -> Self {
        Self::new(colors)
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.is_rotation_of(other)
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in 0..ART_LINES {
            writeln!(f, "{}", self.art_line(line))?;
        }
        Ok(())
    }
}

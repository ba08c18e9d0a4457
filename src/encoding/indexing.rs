#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variable numbering for the puzzle encodings.
//!
//! Places are numbered row by row (`place = y * width + x`). Diamonds, the
//! edges shared by two neighbouring cells, are numbered row by row as well:
//! each grid row contributes its `width - 1` vertical edges followed by the
//! `width` horizontal edges below it, so a row spans `2 * width - 1` ids.
//!
//! Variables are laid out in contiguous ranges:
//!
//! | range                               | meaning                               |
//! |-------------------------------------|---------------------------------------|
//! | `1 ..= cells²`                      | piece `p` sits on place `l`           |
//! | `border_start ..`                   | border diamond `d` has border color `c` |
//! | `center_start ..`                   | center diamond `d` has center color `c` |
//! | `aux_start ..`                      | auxiliaries allocated by encoders     |

use crate::encoding::EncodeError;
use crate::puzzle::piece::{Color, Piece, PieceKind};
use crate::puzzle::problem::Problem;
use crate::sat::literal::{Literal, Variable};
use std::ops::Range;

/// A bijection between a set of ids and the dense positions `0..len`.
///
/// The forward direction is a plain vector; the reverse direction is a
/// vector indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenseMap {
    ids: Vec<usize>,
    positions: Vec<Option<usize>>,
}

impl DenseMap {
    /// Assigns positions to `ids` in iteration order. Repeated ids keep their
    /// first position.
    pub fn new(ids: impl IntoIterator<Item = usize>) -> Self {
        let mut map = Self::default();
        for id in ids {
            if id >= map.positions.len() {
                map.positions.resize(id + 1, None);
            }
            if map.positions[id].is_none() {
                map.positions[id] = Some(map.ids.len());
                map.ids.push(id);
            }
        }
        map
    }

    /// Number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the map holds no id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Dense position of `id`, if mapped.
    #[must_use]
    pub fn position(&self, id: usize) -> Option<usize> {
        self.positions.get(id).copied().flatten()
    }

    /// Id at dense `position`.
    #[must_use]
    pub fn id(&self, position: usize) -> Option<usize> {
        self.ids.get(position).copied()
    }

    /// Ids in position order.
    #[must_use]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }
}

/// A boundary cell and the diamonds its corner or border piece must match.
///
/// `left` and `right` are positions among the border diamonds, named as seen
/// from inside the grid looking out over the boundary. `inward` is the
/// position of the center diamond opposite the boundary edge (border cells
/// only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// The boundary cell.
    pub place: usize,
    /// Position of the border diamond on the left.
    pub left: usize,
    /// Position of the border diamond on the right.
    pub right: usize,
    /// Position of the center diamond facing inward.
    pub inward: Option<usize>,
}

/// What a variable of the encoding stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// A piece sits on a place.
    Placement {
        /// Dense piece index.
        piece: usize,
        /// Place id.
        place: usize,
    },
    /// A border diamond has a border color.
    BorderDiamond {
        /// Diamond id.
        diamond: usize,
        /// The color.
        color: Color,
    },
    /// A center diamond has a center color.
    CenterDiamond {
        /// Diamond id.
        diamond: usize,
        /// The color.
        color: Color,
    },
    /// A variable allocated by an encoder past the fixed ranges.
    Auxiliary,
}

/// The numbering shared by all encoders for one puzzle.
#[derive(Debug, Clone)]
pub struct IndexingScheme {
    width: usize,
    height: usize,
    bounded: bool,
    pieces: Vec<Piece>,
    piece_groups: [Range<usize>; 3],
    place_groups: [Vec<usize>; 3],
    border_diamonds: DenseMap,
    center_diamonds: DenseMap,
    border_colors: DenseMap,
    center_colors: DenseMap,
    corner_slots: Vec<Slot>,
    border_slots: Vec<Slot>,
    border_start: usize,
    center_start: usize,
    aux_start: usize,
    max_variable: usize,
}

const fn group_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Corner => 0,
        PieceKind::Border => 1,
        PieceKind::Center => 2,
    }
}

/// Dense color ids. Colors are non-negative once the puzzle is validated.
fn color_ids<'a>(colors: impl IntoIterator<Item = &'a Color>) -> DenseMap {
    DenseMap::new(
        colors
            .into_iter()
            .filter_map(|&color| usize::try_from(color).ok()),
    )
}

impl IndexingScheme {
    /// Builds the numbering for a puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Problem`] if the puzzle does not validate, and
    /// [`EncodeError::TooManyVariables`] if the variables would not fit in a
    /// DIMACS literal.
    pub fn new(problem: &Problem) -> Result<Self, EncodeError> {
        problem.validate()?;

        let width = problem.width();
        let height = problem.height();
        let bounded = problem.bounded();
        let cells = width * height;

        let pieces: Vec<Piece> = problem.pieces().copied().collect();
        let corners = problem.corners().len();
        let borders = problem.borders().len();
        let piece_groups = [
            0..corners,
            corners..corners + borders,
            corners + borders..pieces.len(),
        ];

        let mut scheme = Self {
            width,
            height,
            bounded,
            pieces,
            piece_groups,
            place_groups: [Vec::new(), Vec::new(), Vec::new()],
            border_diamonds: DenseMap::default(),
            center_diamonds: DenseMap::default(),
            border_colors: color_ids(problem.border_colors()),
            center_colors: color_ids(problem.center_colors()),
            corner_slots: Vec::new(),
            border_slots: Vec::new(),
            border_start: 0,
            center_start: 0,
            aux_start: 0,
            max_variable: 0,
        };

        scheme.place_groups = scheme.build_place_groups();
        scheme.border_diamonds = DenseMap::new(scheme.border_diamond_ids());
        scheme.center_diamonds = DenseMap::new(
            (0..scheme.num_diamonds()).filter(|&d| scheme.border_diamonds.position(d).is_none()),
        );
        if bounded {
            scheme.corner_slots = scheme.build_corner_slots()?;
            scheme.border_slots = scheme.build_border_slots()?;
        }

        let placements = cells.saturating_mul(cells);
        let border_vars = scheme.border_diamonds.len() * scheme.border_colors.len();
        let center_vars = scheme.center_diamonds.len() * scheme.center_colors.len();
        scheme.border_start = placements.saturating_add(1);
        scheme.center_start = scheme.border_start.saturating_add(border_vars);
        scheme.aux_start = scheme.center_start.saturating_add(center_vars);

        // a ladder over n variables adds n - 1 auxiliaries: each placement
        // variable sits in one piece ladder and one place ladder, each color
        // variable in one diamond ladder
        scheme.max_variable = (scheme.aux_start - 1)
            .saturating_add(placements.saturating_mul(2))
            .saturating_add(border_vars + center_vars);
        if scheme.max_variable > Literal::MAX as usize {
            return Err(EncodeError::TooManyVariables {
                needed: scheme.max_variable,
            });
        }

        Ok(scheme)
    }

    fn build_place_groups(&self) -> [Vec<usize>; 3] {
        let (w, h) = (self.width, self.height);
        if !self.bounded {
            let centers = (0..w)
                .flat_map(|x| (0..h).map(move |y| self.place(x, y)))
                .collect();
            return [Vec::new(), Vec::new(), centers];
        }

        let corners = vec![
            self.place(0, 0),
            self.place(0, h - 1),
            self.place(w - 1, 0),
            self.place(w - 1, h - 1),
        ];
        let mut borders = Vec::with_capacity(2 * (w + h));
        for x in 1..w - 1 {
            borders.push(self.place(x, 0));
            borders.push(self.place(x, h - 1));
        }
        for y in 1..h - 1 {
            borders.push(self.place(0, y));
            borders.push(self.place(w - 1, y));
        }
        let centers = (1..w - 1)
            .flat_map(|x| (1..h - 1).map(move |y| self.place(x, y)))
            .collect();
        [corners, borders, centers]
    }

    fn border_diamond_ids(&self) -> Vec<usize> {
        if !self.bounded {
            return Vec::new();
        }
        let (w, h) = (self.width, self.height);
        let mut ids = Vec::with_capacity(2 * (w + h));
        for x in 1..w {
            ids.extend(self.left_diamond(x, 0));
            ids.extend(self.left_diamond(x, h - 1));
        }
        for y in 1..h {
            ids.extend(self.top_diamond(0, y));
            ids.extend(self.top_diamond(w - 1, y));
        }
        ids
    }

    fn slot(
        &self,
        (x, y): (usize, usize),
        left: Option<usize>,
        right: Option<usize>,
        inward: Option<usize>,
    ) -> Result<Slot, EncodeError> {
        let place = self.place(x, y);
        let missing = || EncodeError::Geometry { place };
        let border = |d: Option<usize>| d.and_then(|d| self.border_diamonds.position(d));
        Ok(Slot {
            place,
            left: border(left).ok_or_else(missing)?,
            right: border(right).ok_or_else(missing)?,
            inward: match inward {
                Some(d) => Some(self.center_diamonds.position(d).ok_or_else(missing)?),
                None => None,
            },
        })
    }

    fn build_corner_slots(&self) -> Result<Vec<Slot>, EncodeError> {
        let (r, b) = (self.width - 1, self.height - 1);
        Ok(vec![
            self.slot(
                (0, 0),
                self.bottom_diamond(0, 0),
                self.right_diamond(0, 0),
                None,
            )?,
            self.slot(
                (0, b),
                self.right_diamond(0, b),
                self.top_diamond(0, b),
                None,
            )?,
            self.slot(
                (r, 0),
                self.left_diamond(r, 0),
                self.bottom_diamond(r, 0),
                None,
            )?,
            self.slot(
                (r, b),
                self.top_diamond(r, b),
                self.left_diamond(r, b),
                None,
            )?,
        ])
    }

    fn build_border_slots(&self) -> Result<Vec<Slot>, EncodeError> {
        let (r, b) = (self.width - 1, self.height - 1);
        let mut slots = Vec::with_capacity(2 * (r + b));
        for x in 1..r {
            slots.push(self.slot(
                (x, 0),
                self.left_diamond(x, 0),
                self.right_diamond(x, 0),
                self.bottom_diamond(x, 0),
            )?);
            slots.push(self.slot(
                (x, b),
                self.right_diamond(x, b),
                self.left_diamond(x, b),
                self.top_diamond(x, b),
            )?);
        }
        for y in 1..b {
            slots.push(self.slot(
                (0, y),
                self.bottom_diamond(0, y),
                self.top_diamond(0, y),
                self.right_diamond(0, y),
            )?);
            slots.push(self.slot(
                (r, y),
                self.top_diamond(r, y),
                self.bottom_diamond(r, y),
                self.left_diamond(r, y),
            )?);
        }
        Ok(slots)
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

    /// Whether the outer edges carry the boundary color.
    #[must_use]
    pub const fn bounded(&self) -> bool {
        self.bounded
    }

    /// Number of places, and of pieces.
    #[must_use]
    pub const fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Place id of column `x`, row `y`.
    #[must_use]
    pub const fn place(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Column and row of `place`.
    #[must_use]
    pub const fn coordinates(&self, place: usize) -> (usize, usize) {
        (place % self.width, place / self.width)
    }

    /// All pieces: corners, then borders, then centers.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Dense indices of the pieces in a group.
    #[must_use]
    pub fn group_pieces(&self, kind: PieceKind) -> Range<usize> {
        self.piece_groups[group_index(kind)].clone()
    }

    /// Places a group's pieces may occupy, in encoding order.
    #[must_use]
    pub fn group_places(&self, kind: PieceKind) -> &[usize] {
        &self.place_groups[group_index(kind)]
    }

    /// The four corner cells.
    #[must_use]
    pub fn corner_slots(&self) -> &[Slot] {
        &self.corner_slots
    }

    /// Boundary cells that are not corners.
    #[must_use]
    pub fn border_slots(&self) -> &[Slot] {
        &self.border_slots
    }

    /// Number of edges shared by two cells.
    #[must_use]
    pub const fn num_diamonds(&self) -> usize {
        2 * self.width * self.height - self.width - self.height
    }

    /// Diamonds on the boundary ring, which take border colors.
    #[must_use]
    pub const fn border_diamonds(&self) -> &DenseMap {
        &self.border_diamonds
    }

    /// Diamonds that take center colors.
    #[must_use]
    pub const fn center_diamonds(&self) -> &DenseMap {
        &self.center_diamonds
    }

    /// Dense positions of the border palette.
    #[must_use]
    pub const fn border_colors(&self) -> &DenseMap {
        &self.border_colors
    }

    /// Dense positions of the center palette.
    #[must_use]
    pub const fn center_colors(&self) -> &DenseMap {
        &self.center_colors
    }

    const fn stride(&self) -> usize {
        2 * self.width - 1
    }

    /// The diamond between `(x, y)` and `(x - 1, y)`.
    #[must_use]
    pub const fn left_diamond(&self, x: usize, y: usize) -> Option<usize> {
        if x == 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some(self.stride() * y + x - 1)
        }
    }

    /// The diamond between `(x, y)` and `(x + 1, y)`.
    #[must_use]
    pub const fn right_diamond(&self, x: usize, y: usize) -> Option<usize> {
        if x + 1 >= self.width || y >= self.height {
            None
        } else {
            Some(self.stride() * y + x)
        }
    }

    /// The diamond between `(x, y)` and `(x, y - 1)`.
    #[must_use]
    pub const fn top_diamond(&self, x: usize, y: usize) -> Option<usize> {
        if y == 0 || y >= self.height || x >= self.width {
            None
        } else {
            Some(self.stride() * y + x - self.width)
        }
    }

    /// The diamond between `(x, y)` and `(x, y + 1)`.
    #[must_use]
    pub const fn bottom_diamond(&self, x: usize, y: usize) -> Option<usize> {
        if y + 1 >= self.height || x >= self.width {
            None
        } else {
            Some(self.stride() * y + x + self.width - 1)
        }
    }

    /// The diamonds around a place, clockwise from the top.
    #[must_use]
    pub const fn diamonds_around(&self, place: usize) -> [Option<usize>; 4] {
        let (x, y) = self.coordinates(place);
        [
            self.top_diamond(x, y),
            self.right_diamond(x, y),
            self.bottom_diamond(x, y),
            self.left_diamond(x, y),
        ]
    }

    /// Center-diamond positions around a place, clockwise from the top.
    /// Sides without a center diamond are `None`.
    #[must_use]
    pub fn center_neighbors(&self, place: usize) -> [Option<usize>; 4] {
        self.diamonds_around(place)
            .map(|d| d.and_then(|d| self.center_diamonds.position(d)))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    const fn literal(value: usize) -> Literal {
        value as Literal
    }

    /// Variable stating that `piece` sits on `place`.
    #[must_use]
    pub const fn placement(&self, piece: usize, place: usize) -> Literal {
        Self::literal(self.cells() * place + piece + 1)
    }

    /// Variable stating that border diamond `diamond` has the color at
    /// position `color` of the border palette.
    #[must_use]
    pub fn border_var(&self, diamond: usize, color: usize) -> Literal {
        Self::literal(self.border_start + diamond * self.border_colors.len() + color)
    }

    /// Variable stating that center diamond `diamond` has the color at
    /// position `color` of the center palette.
    #[must_use]
    pub fn center_var(&self, diamond: usize, color: usize) -> Literal {
        Self::literal(self.center_start + diamond * self.center_colors.len() + color)
    }

    /// [`Self::border_var`] by color value.
    #[must_use]
    pub fn border_color_var(&self, diamond: usize, color: Color) -> Option<Literal> {
        let position = self.border_colors.position(usize::try_from(color).ok()?)?;
        Some(self.border_var(diamond, position))
    }

    /// [`Self::center_var`] by color value.
    #[must_use]
    pub fn center_color_var(&self, diamond: usize, color: Color) -> Option<Literal> {
        let position = self.center_colors.position(usize::try_from(color).ok()?)?;
        Some(self.center_var(diamond, position))
    }

    /// First variable not used by placements or diamond colors.
    #[must_use]
    pub const fn first_free_variable(&self) -> Literal {
        Self::literal(self.aux_start)
    }

    /// Highest variable any encoding of this puzzle can use, auxiliaries
    /// included.
    #[must_use]
    pub const fn max_variable(&self) -> Literal {
        Self::literal(self.max_variable)
    }

    /// Classifies a variable of this numbering. Variables at or beyond
    /// [`Self::first_free_variable`] are reported as auxiliary.
    ///
    /// Returns `None` for variable 0.
    #[must_use]
    pub fn variable_kind(&self, var: Variable) -> Option<VariableKind> {
        let var = var as usize;
        if var == 0 {
            return None;
        }
        let color_of = |map: &DenseMap, position: usize| {
            map.id(position).and_then(|id| Color::try_from(id).ok())
        };
        if var < self.border_start {
            let index = var - 1;
            return Some(VariableKind::Placement {
                piece: index % self.cells(),
                place: index / self.cells(),
            });
        }
        if var < self.center_start {
            let offset = var - self.border_start;
            let colors = self.border_colors.len();
            return Some(VariableKind::BorderDiamond {
                diamond: self.border_diamonds.id(offset / colors)?,
                color: color_of(&self.border_colors, offset % colors)?,
            });
        }
        if var < self.aux_start {
            let offset = var - self.center_start;
            let colors = self.center_colors.len();
            return Some(VariableKind::CenterDiamond {
                diamond: self.center_diamonds.id(offset / colors)?,
                color: color_of(&self.center_colors, offset % colors)?,
            });
        }
        Some(VariableKind::Auxiliary)
    }
}

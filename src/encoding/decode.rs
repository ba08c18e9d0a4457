#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Turns a solver model back into a grid of rotated pieces.
//!
//! Placement variables give the piece on every place and diamond variables
//! give the color of every shared edge. The rotation of each piece is then
//! the first quarter turn (0 to 3) under which its edges agree with every
//! known edge around its place.

use crate::encoding::indexing::{IndexingScheme, VariableKind};
use crate::puzzle::piece::{BOUNDARY, Color, Piece};
use crate::puzzle::solution::Solution;
use crate::sat::cnf::CnfFormula;
use crate::sat::literal::Variable;
use log::debug;
use thiserror::Error;

/// A model that does not describe a grid. None of these occur for a model of
/// a formula built by one of the encoders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A true variable above every range of the scheme.
    #[error("variable {var} is not part of the encoding")]
    UnknownVariable {
        /// The variable.
        var: Variable,
    },

    /// Two pieces are placed on the same place.
    #[error("place {place} holds both piece {first} and piece {second}")]
    PlaceConflict {
        /// The place.
        place: usize,
        /// The piece read first.
        first: usize,
        /// The piece read second.
        second: usize,
    },

    /// A diamond is given two colors.
    #[error("diamond {diamond} has both color {first} and color {second}")]
    DiamondConflict {
        /// The diamond.
        diamond: usize,
        /// The color read first.
        first: Color,
        /// The color read second.
        second: Color,
    },

    /// A place has no piece.
    #[error("no piece is placed on place {place}")]
    EmptyPlace {
        /// The empty place.
        place: usize,
    },

    /// The decoded diamonds around a place match no rotation of its piece.
    #[error("no rotation of piece {piece} fits the edges around place {place}")]
    NoConsistentRotation {
        /// The place.
        place: usize,
        /// The piece placed there.
        piece: usize,
    },
}

/// Decodes the solution stored in `cnf`, or returns `Ok(None)` if the formula
/// has not been solved.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the model is not a placement of every piece.
pub fn decode(scheme: &IndexingScheme, cnf: &CnfFormula) -> Result<Option<Solution>, DecodeError> {
    let Some(model) = cnf.solution() else {
        return Ok(None);
    };

    debug!("decoding solution...");
    let mut grid: Vec<Option<usize>> = vec![None; scheme.cells()];
    let mut edges: Vec<Option<Color>> = vec![None; scheme.num_diamonds()];

    for var in model.true_variables() {
        match scheme.variable_kind(var) {
            Some(VariableKind::Placement { piece, place }) => {
                let slot = grid
                    .get_mut(place)
                    .ok_or(DecodeError::UnknownVariable { var })?;
                match *slot {
                    Some(first) if first != piece => {
                        return Err(DecodeError::PlaceConflict {
                            place,
                            first,
                            second: piece,
                        });
                    }
                    _ => *slot = Some(piece),
                }
            }
            Some(
                VariableKind::BorderDiamond { diamond, color }
                | VariableKind::CenterDiamond { diamond, color },
            ) => {
                let slot = edges
                    .get_mut(diamond)
                    .ok_or(DecodeError::UnknownVariable { var })?;
                match *slot {
                    Some(first) if first != color => {
                        return Err(DecodeError::DiamondConflict {
                            diamond,
                            first,
                            second: color,
                        });
                    }
                    _ => *slot = Some(color),
                }
            }
            // order-encoding ladders
            Some(VariableKind::Auxiliary) if var <= cnf.num_vars() => {}
            _ => return Err(DecodeError::UnknownVariable { var }),
        }
    }

    debug!("rotating pieces...");
    let cells = grid
        .iter()
        .enumerate()
        .map(|(place, piece)| {
            let piece = piece.ok_or(DecodeError::EmptyPlace { place })?;
            rotate(scheme, place, piece, &edges)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Solution::new(
        scheme.width(),
        scheme.height(),
        scheme.bounded(),
        cells,
    ))
}

/// Turns `piece` to the first rotation matching the known edges of `place`.
/// Outer edges of a bounded puzzle are known to carry the boundary color.
fn rotate(
    scheme: &IndexingScheme,
    place: usize,
    piece: usize,
    edges: &[Option<Color>],
) -> Result<Piece, DecodeError> {
    let base = scheme.pieces()[piece];
    let expected = scheme.diamonds_around(place).map(|diamond| match diamond {
        Some(d) => edges.get(d).copied().flatten(),
        None => scheme.bounded().then_some(BOUNDARY),
    });

    (0..4)
        .map(|rotation| base.rotated(rotation))
        .find(|candidate| {
            expected
                .iter()
                .enumerate()
                .all(|(side, known)| known.is_none_or(|color| candidate.color(side) == color))
        })
        .ok_or(DecodeError::NoConsistentRotation { place, piece })
}

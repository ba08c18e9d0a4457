#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Random puzzle generation.
//!
//! A solved grid is built first by coloring every diamond, then its pieces
//! are turned and shuffled. The puzzle therefore always has a solution.

use crate::puzzle::piece::{BOUNDARY, Color, Piece};
use crate::puzzle::problem::{Problem, ProblemError};
use crate::puzzle::solution::Solution;
use log::debug;

/// Parameters for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Outer edges carry the boundary color.
    pub bounded: bool,
    /// Each diamond shows `c` on one side and `-c` on the other.
    pub signed: bool,
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Colors are drawn from `1..=color_count`.
    pub color_count: u16,
    /// Fixed seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            bounded: true,
            signed: false,
            width: 4,
            height: 4,
            color_count: 9,
            seed: None,
        }
    }
}

/// A generated puzzle and the grid it was cut from.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The pieces, shuffled and randomly turned.
    pub problem: Problem,
    /// A grid that solves [`Self::problem`].
    pub solution: Solution,
}

/// Generates a random solvable puzzle.
///
/// # Errors
///
/// Returns [`ProblemError::BadDimensions`] for empty grids, and for bounded
/// grids narrower or shorter than 2.
pub fn generate(config: &GenerateConfig) -> Result<Generated, ProblemError> {
    let GenerateConfig {
        bounded,
        signed,
        width,
        height,
        ..
    } = *config;
    let min = if bounded { 2 } else { 1 };
    if width < min || height < min {
        return Err(ProblemError::BadDimensions {
            width,
            height,
            kind: if bounded { "bounded" } else { "unbounded" },
        });
    }

    let mut rng = config
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let max_color = Color::from(config.color_count.max(1));
    let color = |rng: &mut fastrand::Rng| rng.i32(1..=max_color);
    let sign = |c: Color| if signed { -c } else { c };

    // edge colors between (x, y) and (x + 1, y), and between (x, y) and (x, y + 1)
    let horizontal: Vec<Color> = (0..height * (width - 1)).map(|_| color(&mut rng)).collect();
    let vertical: Vec<Color> = (0..(height - 1) * width).map(|_| color(&mut rng)).collect();

    let outer = |rng: &mut fastrand::Rng| {
        if bounded {
            BOUNDARY
        } else if signed && rng.bool() {
            -color(rng)
        } else {
            color(rng)
        }
    };

    let mut placed = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let top = if y > 0 {
                sign(vertical[(y - 1) * width + x])
            } else {
                outer(&mut rng)
            };
            let right = if x + 1 < width {
                horizontal[y * (width - 1) + x]
            } else {
                outer(&mut rng)
            };
            let bottom = if y + 1 < height {
                vertical[y * width + x]
            } else {
                outer(&mut rng)
            };
            let left = if x > 0 {
                sign(horizontal[y * (width - 1) + x - 1])
            } else {
                outer(&mut rng)
            };
            placed.push([top, right, bottom, left]);
        }
    }

    let mut cells = Vec::with_capacity(placed.len());
    let mut pieces = Vec::with_capacity(placed.len());
    for oriented in placed {
        let rotation = rng.u8(..4);
        let r = usize::from(rotation);
        let stored = [
            oriented[r % 4],
            oriented[(r + 1) % 4],
            oriented[(r + 2) % 4],
            oriented[(r + 3) % 4],
        ];
        cells.push(Piece::new(stored).rotated(rotation));
        pieces.push(Piece::new(stored));
    }
    rng.shuffle(&mut pieces);

    let mut problem = Problem::new(bounded, signed, width, height);
    for piece in pieces {
        problem.add_piece(piece);
    }
    debug!(
        "generated {width}x{height} puzzle with {} corner, {} border and {} center pieces",
        problem.corners().len(),
        problem.borders().len(),
        problem.centers().len()
    );

    let solution = Solution::new(width, height, bounded, cells).ok_or(ProblemError::BadDimensions {
        width,
        height,
        kind: "generated",
    })?;
    Ok(Generated { problem, solution })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_bounded_puzzle_is_valid() {
        let config = GenerateConfig {
            width: 5,
            height: 3,
            seed: Some(7),
            ..GenerateConfig::default()
        };
        let generated = generate(&config).unwrap();
        assert!(generated.problem.specification_correct());
        assert!(generated.problem.validate().is_ok());
        assert!(generated.solution.is_consistent());
        assert_eq!(generated.problem.num_pieces(), 15);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = GenerateConfig {
            seed: Some(42),
            ..GenerateConfig::default()
        };
        let a = generate(&config).unwrap();
        let b = generate(&config).unwrap();
        assert_eq!(a.problem, b.problem);
        assert_eq!(a.solution, b.solution);
    }

    #[test]
    fn test_unbounded_has_no_boundary_edges() {
        let config = GenerateConfig {
            bounded: false,
            width: 3,
            height: 2,
            color_count: 4,
            seed: Some(1),
            ..GenerateConfig::default()
        };
        let generated = generate(&config).unwrap();
        assert!(generated.problem.validate().is_ok());
        assert!(generated.problem.pieces().all(|p| p.zero_count() == 0));
        assert!(generated.solution.is_consistent());
    }

    #[test]
    fn test_signed_diamonds_carry_opposite_colors() {
        let config = GenerateConfig {
            signed: true,
            width: 3,
            height: 3,
            seed: Some(3),
            ..GenerateConfig::default()
        };
        let generated = generate(&config).unwrap();
        let solution = &generated.solution;
        let left = solution.piece_at(0, 1).unwrap();
        let right = solution.piece_at(1, 1).unwrap();
        assert_eq!(left.color(1), -right.color(3));
        assert_eq!(
            generated.problem.validate(),
            Err(ProblemError::SignedUnsupported)
        );
    }

    #[test]
    fn test_degenerate_grid_is_rejected() {
        let config = GenerateConfig {
            width: 1,
            ..GenerateConfig::default()
        };
        assert!(generate(&config).is_err());
    }
}

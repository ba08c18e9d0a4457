//! Edge-matching puzzles: pieces, puzzle instances, the text format, random
//! generation and solved grids.

pub mod generator;
pub mod parser;
pub mod piece;
pub mod problem;
pub mod solution;

pub use piece::{Color, Piece, PieceKind};
pub use problem::{Problem, ProblemError};
pub use solution::Solution;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Piece, Problem};

    fn build(bounded: bool, width: usize, height: usize, pieces: &[[i32; 4]]) -> Problem {
        let mut problem = Problem::new(bounded, false, width, height);
        for &colors in pieces {
            problem.add_piece(Piece::new(colors)).unwrap();
        }
        problem
    }

    /// Four corners forming a ring of border colors; the top-right piece is
    /// stored turned by two quarter turns.
    pub fn two_by_two() -> Problem {
        build(
            true,
            2,
            2,
            &[[0, 1, 2, 0], [3, 1, 0, 0], [3, 0, 0, 4], [2, 4, 0, 0]],
        )
    }

    /// Like [`two_by_two`] but the bottom-left corner cannot meet its
    /// neighbours.
    pub fn two_by_two_unsat() -> Problem {
        build(
            true,
            2,
            2,
            &[[0, 1, 2, 0], [3, 1, 0, 0], [3, 0, 0, 4], [5, 4, 0, 0]],
        )
    }

    /// A solvable bounded 3x3 puzzle, pieces shuffled and turned.
    pub fn three_by_three() -> Problem {
        build(
            true,
            3,
            3,
            &[
                [8, 5, 7, 6],
                [0, 0, 1, 2],
                [0, 4, 3, 0],
                [4, 0, 3, 5],
                [0, 2, 7, 1],
                [2, 6, 1, 0],
                [3, 0, 0, 1],
                [0, 3, 8, 4],
                [0, 4, 2, 0],
            ],
        )
    }

    /// A solvable unbounded 2x1 puzzle.
    pub fn unbounded_pair() -> Problem {
        build(false, 2, 1, &[[1, 2, 3, 4], [5, 6, 7, 2]])
    }
}

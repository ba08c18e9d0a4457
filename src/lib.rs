#![deny(missing_docs)]
//! This crate solves edge-matching puzzles by translating them into SAT problems, running an
//! external SAT solver and decoding the model back into a grid of rotated pieces.

/// The `puzzle` module holds pieces, puzzle instances, the puzzle text format, the random
/// generator and solved grids.
pub mod puzzle;

/// The `encoding` module implements the variable numbering shared by all encodings, the four
/// CNF encodings and the decoder.
pub mod encoding;

/// The `sat` module implements CNF formulas, DIMACS serialization and the adapter that runs
/// external SAT solvers.
pub mod sat;

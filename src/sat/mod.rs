#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! CNF formulas, DIMACS input and output, and external SAT solvers.

pub mod assignment;
pub mod clause;
pub mod cnf;
pub mod dimacs;
pub mod literal;
pub mod solver;

#[cfg(test)]
pub(crate) mod testing;

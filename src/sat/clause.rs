#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A disjunction of literals.
//!
//! Clauses keep their literals in insertion order for printing, but compare
//! and hash by their literal *set*: `[1, -2]`, `[-2, 1]` and `[1, -2, 1]` are
//! the same clause.

use crate::sat::literal::{Literal, Variable, variable};
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors raised while building a clause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseError {
    /// `0` terminates clauses in DIMACS and cannot be used as a literal.
    #[error("literal 0 at position {position} is not a valid literal")]
    ZeroLiteral {
        /// Index of the offending literal in the input.
        position: usize,
    },
}

/// A clause: an ordered list of non-zero literals.
#[derive(Debug, Clone, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; 4]>,
}

impl Clause {
    /// Builds a clause from literals.
    ///
    /// # Errors
    ///
    /// Returns [`ClauseError::ZeroLiteral`] if any literal is `0`.
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Result<Self, ClauseError> {
        let literals: SmallVec<[Literal; 4]> = literals.into_iter().collect();
        if let Some(position) = literals.iter().position(|&l| l == 0) {
            return Err(ClauseError::ZeroLiteral { position });
        }
        Ok(Self { literals })
    }

    /// Appends a literal. Returns `false`, and leaves the clause untouched, for `0`.
    pub fn push(&mut self, literal: Literal) -> bool {
        if literal == 0 {
            return false;
        }
        self.literals.push(literal);
        true
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the clause has no literal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether the clause has exactly one literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Iterates over the literals.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// The literals in insertion order.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Variables mentioned by the clause, in literal order (may repeat).
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.literals.iter().map(|&l| variable(l))
    }

    /// Highest variable mentioned, or 0 for the empty clause.
    #[must_use]
    pub fn max_variable(&self) -> Variable {
        self.variables().max().unwrap_or(0)
    }

    /// The literal set in ascending order.
    fn key(&self) -> SmallVec<[Literal; 4]> {
        let mut key = self.literals.clone();
        key.sort_unstable();
        key.dedup();
        key
    }

    /// Writes the clause as a DIMACS line body: literals separated by spaces,
    /// terminated by `0`.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors.
    pub fn write_dimacs(&self, f: &mut impl fmt::Write) -> fmt::Result {
        for literal in &self.literals {
            write!(f, "{literal} ")?;
        }
        write!(f, "0")
    }
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Clause {}

impl Hash for Clause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_dimacs(f)
    }
}

impl TryFrom<Vec<Literal>> for Clause {
    type Error = ClauseError;

    fn try_from(literals: Vec<Literal>) -> Result<Self, Self::Error> {
        Self::new(literals)
    }
}

impl TryFrom<&[Literal]> for Clause {
    type Error = ClauseError;

    fn try_from(literals: &[Literal]) -> Result<Self, Self::Error> {
        Self::new(literals.iter().copied())
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = std::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_rejects_zero_literal() {
        assert_eq!(
            Clause::new([1, 0, 2]),
            Err(ClauseError::ZeroLiteral { position: 1 })
        );
    }

    #[test]
    fn test_push_ignores_zero() {
        let mut clause = Clause::new([1]).unwrap();
        assert!(!clause.push(0));
        assert!(clause.push(-3));
        assert_eq!(clause.literals(), &[1, -3]);
    }

    #[test]
    fn test_equality_is_set_based() {
        let a = Clause::new([1, -2, 3]).unwrap();
        let b = Clause::new([3, 1, -2]).unwrap();
        let c = Clause::new([1, -2, 3, 1]).unwrap();
        let d = Clause::new([1, 2, 3]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, d);

        let set: FxHashSet<Clause> = [a, b, c, d].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_is_dimacs_line() {
        let clause = Clause::new([4, -1]).unwrap();
        assert_eq!(clause.to_string(), "4 -1 0");
        assert_eq!(Clause::default().to_string(), "0");
    }

    #[test]
    fn test_max_variable() {
        assert_eq!(Clause::new([2, -9, 4]).unwrap().max_variable(), 9);
        assert_eq!(Clause::default().max_variable(), 0);
    }
}

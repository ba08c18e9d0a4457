#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Models returned by a SAT solver.

use crate::sat::literal::{Literal, Variable, variable};
use bit_vec::BitVec;
use itertools::Itertools;
use std::fmt;

/// A (possibly partial) assignment reported by a solver, as the set of
/// literals it made true.
///
/// Literals are kept sorted by variable. A bit vector indexed by variable
/// records which variables are true, so lookups during decoding are O(1).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    literals: Vec<Literal>,
    truth: BitVec,
}

impl Model {
    /// Builds a model from solver output. Zeros are dropped; when a variable
    /// occurs with both signs the positive literal wins.
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        let literals = literals
            .into_iter()
            .filter(|&l| l != 0)
            .sorted_unstable_by_key(|&l| (variable(l), -l))
            .dedup_by(|a, b| variable(*a) == variable(*b))
            .collect_vec();

        let max = literals.last().map_or(0, |&l| variable(l) as usize);
        let mut truth = BitVec::from_elem(max + 1, false);
        for &literal in literals.iter().filter(|&&l| l > 0) {
            truth.set(variable(literal) as usize, true);
        }

        Self { literals, truth }
    }

    /// The literals as reported by the solver.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the model has no literal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether `var` is assigned true. Unmentioned variables are false.
    #[must_use]
    pub fn is_true(&self, var: Variable) -> bool {
        self.truth.get(var as usize).unwrap_or(false)
    }

    /// Whether `literal` holds under the model.
    #[must_use]
    pub fn satisfies_literal(&self, literal: Literal) -> bool {
        self.is_true(variable(literal)) == (literal > 0)
    }

    /// True variables in ascending order.
    pub fn true_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.literals
            .iter()
            .filter(|&&l| l > 0)
            .map(|&l| variable(l))
    }
}

impl FromIterator<Literal> for Model {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literals.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_sorts_and_indexes() {
        let model = Model::new([3, -1, 0, 2]);
        assert_eq!(model.literals(), &[-1, 2, 3]);
        assert!(model.is_true(2));
        assert!(model.is_true(3));
        assert!(!model.is_true(1));
        assert!(!model.is_true(42));
        assert_eq!(model.true_variables().collect_vec(), vec![2, 3]);
    }

    #[test]
    fn test_satisfies_literal() {
        let model = Model::new([1, -2]);
        assert!(model.satisfies_literal(1));
        assert!(model.satisfies_literal(-2));
        assert!(!model.satisfies_literal(2));
        assert!(model.satisfies_literal(-5));
    }

    #[test]
    fn test_duplicate_variable_keeps_positive() {
        let model = Model::new([-4, 4, 4]);
        assert_eq!(model.literals(), &[4]);
        assert!(model.is_true(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(Model::new([2, -1]).to_string(), "-1 2");
    }
}

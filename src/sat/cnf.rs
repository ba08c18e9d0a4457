#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conjunctive Normal Form formulas.
//!
//! A [`CnfFormula`] is a set of clauses: adding a clause whose literal set is
//! already present is a no-op. Clauses are kept in the order they were first
//! added so that encoding the same input twice produces the same DIMACS text.

use crate::sat::assignment::Model;
use crate::sat::clause::{Clause, ClauseError};
use crate::sat::literal::{Literal, Variable};
use rustc_hash::FxHashSet;
use std::fmt;
use std::io::{self, Write};

/// Comment emitted when a formula has none of its own.
pub const DEFAULT_COMMENT: &str = "cnf-formula to be satisfied";

/// A CNF formula together with the solution a solver found for it.
#[derive(Debug, Clone, Default)]
pub struct CnfFormula {
    clauses: Vec<Clause>,
    seen: FxHashSet<Clause>,
    variables: FxHashSet<Variable>,
    max_variable: Variable,
    comment: Option<String>,
    solution: Option<Model>,
}

impl CnfFormula {
    /// An empty formula.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty formula whose DIMACS output starts with `comment`.
    #[must_use]
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    /// Builds a formula from raw literal lists, as produced by the clause
    /// generators.
    ///
    /// # Errors
    ///
    /// Returns [`ClauseError::ZeroLiteral`] if any clause contains `0`.
    pub fn from_clauses<I, C>(clauses: I) -> Result<Self, ClauseError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = Literal>,
    {
        let mut cnf = Self::new();
        cnf.extend_clauses(clauses)?;
        Ok(cnf)
    }

    /// Adds a clause. Returns `true` if its literal set was not present yet.
    pub fn add_clause(&mut self, clause: Clause) -> bool {
        if self.seen.contains(&clause) {
            return false;
        }
        for var in clause.variables() {
            self.variables.insert(var);
            self.max_variable = self.max_variable.max(var);
        }
        self.seen.insert(clause.clone());
        self.clauses.push(clause);
        true
    }

    /// Adds a clause given as literals.
    ///
    /// # Errors
    ///
    /// Returns [`ClauseError::ZeroLiteral`] if a literal is `0`.
    pub fn add_literals(&mut self, literals: &[Literal]) -> Result<bool, ClauseError> {
        Ok(self.add_clause(Clause::try_from(literals)?))
    }

    /// Adds every clause of `clauses`.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first clause that contains `0`.
    pub fn extend_clauses<I, C>(&mut self, clauses: I) -> Result<(), ClauseError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = Literal>,
    {
        for clause in clauses {
            self.add_clause(Clause::new(clause)?);
        }
        Ok(())
    }

    /// Highest variable index used; this is the count in the DIMACS header.
    #[must_use]
    pub const fn num_vars(&self) -> Variable {
        self.max_variable
    }

    /// Number of clauses.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Variables that occur in some clause.
    #[must_use]
    pub const fn variables(&self) -> &FxHashSet<Variable> {
        &self.variables
    }

    /// The clauses in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Iterates over the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// The comment written before the problem line.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replaces the comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    /// Stores a model returned by a solver.
    pub fn set_solution(&mut self, model: Model) {
        self.solution = Some(model);
    }

    /// The stored model, if any.
    #[must_use]
    pub const fn solution(&self) -> Option<&Model> {
        self.solution.as_ref()
    }

    /// Whether a model is stored.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    /// Checks that every clause has at least one literal true under `model`.
    #[must_use]
    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|&l| model.satisfies_literal(l)))
    }

    /// Renders the formula in DIMACS CNF.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        self.to_string()
    }

    /// Streams the DIMACS text to `writer`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `writer`.
    pub fn write_dimacs<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")?;
        writer.flush()
    }
}

impl fmt::Display for CnfFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.comment.as_deref().unwrap_or(DEFAULT_COMMENT).lines() {
            writeln!(f, "c {line}")?;
        }
        writeln!(f, "p cnf {} {}", self.num_vars(), self.num_clauses())?;
        for clause in &self.clauses {
            clause.write_dimacs(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CnfFormula {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

//! SAT encodings of edge-matching puzzles.
//!
//! All encodings share one [`IndexingScheme`] and one decoder. They differ in
//! how "exactly one" constraints are expressed and in which redundant
//! clauses they add:
//!
//! - [`SimpleEncoding`]: pairwise at-most-one constraints.
//! - [`SimpleRedundantEncoding`]: simple plus forbidden colors and explicit
//!   one-to-one placement clauses.
//! - [`OrderEncoding`]: exactly-one constraints through an order (ladder)
//!   encoding with auxiliary variables.
//! - [`OrderRedundantEncoding`]: order plus forbidden colors.

pub mod clauses;
pub mod correlation;
pub mod decode;
pub mod indexing;
pub mod order;
pub mod simple;

use crate::puzzle::problem::{Problem, ProblemError};
use crate::puzzle::solution::Solution;
use crate::sat::clause::ClauseError;
use crate::sat::cnf::CnfFormula;
use crate::sat::literal::Literal;
use clap::ValueEnum;
pub use decode::DecodeError;
pub use indexing::IndexingScheme;
pub use order::{OrderEncoding, OrderRedundantEncoding};
pub use simple::{SimpleEncoding, SimpleRedundantEncoding};
use std::fmt;
use thiserror::Error;

/// A list of clauses, each a list of DIMACS literals.
pub type Clauses = Vec<Vec<Literal>>;

/// Errors raised while building an encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The puzzle failed validation.
    #[error("not a valid edge-matching specification: {0}")]
    Problem(#[from] ProblemError),

    /// The variable numbering overflows a DIMACS literal.
    #[error("encoding needs about {needed} variables, more than DIMACS literals can address")]
    TooManyVariables {
        /// Highest variable the encoding could use.
        needed: usize,
    },

    /// A slot lacks a diamond the grid geometry should provide.
    #[error("place {place} has no diamond where one is required")]
    Geometry {
        /// The place.
        place: usize,
    },

    /// An encoder produced an invalid clause.
    #[error(transparent)]
    Clause(#[from] ClauseError),
}

/// The available encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum EncodingKind {
    /// Direct encoding with exactly-one constraints as pairwise clauses.
    #[default]
    #[value(name = "simple")]
    Simple,
    /// The simple encoding plus redundant clauses.
    #[value(name = "redundant")]
    SimpleRedundant,
    /// Exactly-one constraints as ladders of auxiliary variables.
    #[value(name = "order")]
    Order,
    /// The order encoding plus redundant clauses.
    #[value(name = "order-redundant")]
    OrderRedundant,
}

impl EncodingKind {
    /// Every encoding, in command-line order.
    pub const ALL: [Self; 4] = [
        Self::Simple,
        Self::SimpleRedundant,
        Self::Order,
        Self::OrderRedundant,
    ];

    /// Builds the encoder of this kind for `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the problem cannot be encoded.
    pub fn encoder(self, problem: &Problem) -> Result<Box<dyn Encoder>, EncodeError> {
        Ok(match self {
            Self::Simple => Box::new(SimpleEncoding::new(problem)?),
            Self::SimpleRedundant => Box::new(SimpleRedundantEncoding::new(problem)?),
            Self::Order => Box::new(OrderEncoding::new(problem)?),
            Self::OrderRedundant => Box::new(OrderRedundantEncoding::new(problem)?),
        })
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::SimpleRedundant => write!(f, "redundant"),
            Self::Order => write!(f, "order"),
            Self::OrderRedundant => write!(f, "order-redundant"),
        }
    }
}

/// A strategy turning a puzzle into CNF and a model back into a grid.
pub trait Encoder {
    /// Which encoding this is.
    fn kind(&self) -> EncodingKind;

    /// The variable numbering shared with the decoder.
    fn scheme(&self) -> &IndexingScheme;

    /// The clauses of this encoding, possibly with duplicates.
    fn clauses(&self) -> Clauses;

    /// Builds a fresh formula. Calling this twice yields identical formulas.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Clause`] if a generator produced literal `0`.
    fn encode(&self) -> Result<CnfFormula, EncodeError> {
        let scheme = self.scheme();
        let mut cnf = CnfFormula::with_comment(format!(
            "{} encoding of an edge-matching problem\nwith size {} x {}\n{} and unsigned",
            self.kind(),
            scheme.width(),
            scheme.height(),
            if scheme.bounded() { "bounded" } else { "unbounded" },
        ));
        cnf.extend_clauses(self.clauses())?;
        Ok(cnf)
    }

    /// Reads the grid out of a solved formula. Returns `Ok(None)` if the
    /// formula carries no solution.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the model does not describe a grid.
    fn decode(&self, cnf: &CnfFormula) -> Result<Option<Solution>, DecodeError> {
        decode::decode(self.scheme(), cnf)
    }
}

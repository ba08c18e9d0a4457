#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Direct encodings: at-least-one clauses with pairwise at-most-one.

use crate::encoding::clauses::{
    GROUPS, correlation_clauses, diamond_color_clauses, forbidden_color_clauses,
    one_to_one_clauses, partial_place_clauses, simple_group_clauses,
};
use crate::encoding::indexing::IndexingScheme;
use crate::encoding::{Clauses, EncodeError, Encoder, EncodingKind};
use crate::puzzle::problem::Problem;

/// Placement domains per group, exactly one color per diamond, and the
/// correlation between placed pieces and diamond colors.
#[must_use]
pub fn simple_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut clauses = Vec::new();
    for kind in GROUPS {
        clauses.extend(simple_group_clauses(scheme, kind));
    }
    clauses.extend(partial_place_clauses(scheme));
    clauses.extend(diamond_color_clauses(scheme));
    clauses.extend(correlation_clauses(scheme));
    clauses
}

/// Placement domains, diamond colors and their correlation, with pairwise
/// at-most-one constraints.
#[derive(Debug, Clone)]
pub struct SimpleEncoding {
    scheme: IndexingScheme,
}

impl SimpleEncoding {
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the problem cannot be encoded.
    pub fn new(problem: &Problem) -> Result<Self, EncodeError> {
        Ok(Self {
            scheme: IndexingScheme::new(problem)?,
        })
    }
}

impl Encoder for SimpleEncoding {
    fn kind(&self) -> EncodingKind {
        EncodingKind::Simple
    }

    fn scheme(&self) -> &IndexingScheme {
        &self.scheme
    }

    fn clauses(&self) -> Clauses {
        simple_clauses(&self.scheme)
    }
}

/// [`SimpleEncoding`] plus forbidden-color clauses and explicit one-to-one
/// placement clauses.
#[derive(Debug, Clone)]
pub struct SimpleRedundantEncoding {
    scheme: IndexingScheme,
}

impl SimpleRedundantEncoding {
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the problem cannot be encoded.
    pub fn new(problem: &Problem) -> Result<Self, EncodeError> {
        Ok(Self {
            scheme: IndexingScheme::new(problem)?,
        })
    }
}

impl Encoder for SimpleRedundantEncoding {
    fn kind(&self) -> EncodingKind {
        EncodingKind::SimpleRedundant
    }

    fn scheme(&self) -> &IndexingScheme {
        &self.scheme
    }

    fn clauses(&self) -> Clauses {
        let mut clauses = simple_clauses(&self.scheme);
        clauses.extend(forbidden_color_clauses(&self.scheme));
        clauses.extend(one_to_one_clauses(&self.scheme));
        clauses
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Order (ladder) encoding of exactly-one constraints.
//!
//! For choices `x_0 .. x_{n-1}` the encoding introduces `o_0 .. o_{n-2}`,
//! where `o_i` reads "the chosen index is at most `i`". The chain
//! `o_{i-1} -> o_i` makes the `o` variables monotone, and each choice is tied
//! to the step where the chain switches on:
//!
//! ```text
//! x_0     <-> o_0
//! x_i     <-> !o_{i-1} & o_i      (0 < i < n-1)
//! x_{n-1} <-> !o_{n-2}
//! ```
//!
//! This needs `O(n)` clauses where the pairwise encoding needs `O(n²)`.

use crate::encoding::clauses::{
    GROUPS, correlation_clauses, diamond_domains, exactly_one_pairwise, forbidden_color_clauses,
    group_exclusion_clauses, simple_group_clauses,
};
use crate::encoding::indexing::IndexingScheme;
use crate::encoding::{Clauses, EncodeError, Encoder, EncodingKind};
use crate::puzzle::piece::PieceKind;
use crate::puzzle::problem::Problem;
use crate::sat::literal::Literal;
use itertools::Itertools;

/// Hands out fresh auxiliary variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableCounter {
    next: Literal,
}

impl VariableCounter {
    /// A counter whose first fresh variable is `first`.
    #[must_use]
    pub const fn new(first: Literal) -> Self {
        Self { next: first }
    }

    /// Allocates the next variable.
    pub const fn fresh(&mut self) -> Literal {
        let var = self.next;
        self.next += 1;
        var
    }

    /// The variable the next call to [`Self::fresh`] returns.
    #[must_use]
    pub const fn peek(&self) -> Literal {
        self.next
    }
}

/// Exactly one of `choices`, order encoded. Fewer than two choices fall back
/// to the pairwise encoding, which needs no auxiliaries.
#[must_use]
pub fn exactly_one_order(choices: &[Literal], counter: &mut VariableCounter) -> Clauses {
    let n = choices.len();
    if n < 2 {
        return exactly_one_pairwise(choices);
    }

    let order = (0..n - 1).map(|_| counter.fresh()).collect_vec();
    let mut clauses = Vec::with_capacity(4 * n);

    clauses.push(vec![-choices[0], order[0]]);
    clauses.push(vec![choices[0], -order[0]]);

    for i in 1..n - 1 {
        let x = choices[i];
        clauses.push(vec![-x, -order[i - 1]]);
        clauses.push(vec![-x, order[i]]);
        clauses.push(vec![x, order[i - 1], -order[i]]);
        clauses.push(vec![-order[i - 1], order[i]]);
    }

    clauses.push(vec![-choices[n - 1], -order[n - 2]]);
    clauses.push(vec![choices[n - 1], order[n - 2]]);
    clauses
}

/// One group, order encoded: each piece on exactly one of the group's places
/// and each place holding exactly one of the group's pieces.
///
/// A group with fewer than two pieces uses the direct encoding instead.
#[must_use]
pub fn order_group_clauses(
    scheme: &IndexingScheme,
    kind: PieceKind,
    counter: &mut VariableCounter,
) -> Clauses {
    let pieces = scheme.group_pieces(kind);
    let places = scheme.group_places(kind);
    if pieces.len() < 2 {
        return simple_group_clauses(scheme, kind);
    }

    let mut clauses = Vec::new();
    for piece in pieces.clone() {
        let choices = places
            .iter()
            .map(|&place| scheme.placement(piece, place))
            .collect_vec();
        clauses.extend(exactly_one_order(&choices, counter));
    }
    clauses.extend(group_exclusion_clauses(scheme, kind));
    for &place in places {
        let choices = pieces
            .clone()
            .map(|piece| scheme.placement(piece, place))
            .collect_vec();
        clauses.extend(exactly_one_order(&choices, counter));
    }
    clauses
}

/// Every diamond has exactly one color, order encoded.
#[must_use]
pub fn order_diamond_clauses(scheme: &IndexingScheme, counter: &mut VariableCounter) -> Clauses {
    diamond_domains(scheme)
        .flat_map(|domain| exactly_one_order(&domain, counter))
        .collect()
}

fn order_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut counter = VariableCounter::new(scheme.first_free_variable());
    let mut clauses = Vec::new();
    for kind in GROUPS {
        clauses.extend(order_group_clauses(scheme, kind, &mut counter));
    }
    clauses.extend(order_diamond_clauses(scheme, &mut counter));
    clauses.extend(correlation_clauses(scheme));
    clauses
}

/// Order encoding of placements and diamond colors.
#[derive(Debug, Clone)]
pub struct OrderEncoding {
    scheme: IndexingScheme,
}

impl OrderEncoding {
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the problem cannot be encoded.
    pub fn new(problem: &Problem) -> Result<Self, EncodeError> {
        Ok(Self {
            scheme: IndexingScheme::new(problem)?,
        })
    }
}

impl Encoder for OrderEncoding {
    fn kind(&self) -> EncodingKind {
        EncodingKind::Order
    }

    fn scheme(&self) -> &IndexingScheme {
        &self.scheme
    }

    fn clauses(&self) -> Clauses {
        order_clauses(&self.scheme)
    }
}

/// [`OrderEncoding`] plus forbidden-color clauses.
#[derive(Debug, Clone)]
pub struct OrderRedundantEncoding {
    scheme: IndexingScheme,
}

impl OrderRedundantEncoding {
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the problem cannot be encoded.
    pub fn new(problem: &Problem) -> Result<Self, EncodeError> {
        Ok(Self {
            scheme: IndexingScheme::new(problem)?,
        })
    }
}

impl Encoder for OrderRedundantEncoding {
    fn kind(&self) -> EncodingKind {
        EncodingKind::OrderRedundant
    }

    fn scheme(&self) -> &IndexingScheme {
        &self.scheme
    }

    fn clauses(&self) -> Clauses {
        let mut clauses = order_clauses(&self.scheme);
        clauses.extend(forbidden_color_clauses(&self.scheme));
        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::fixtures::{three_by_three, two_by_two, two_by_two_unsat};
    use crate::puzzle::generator::{GenerateConfig, generate};
    use crate::sat::assignment::Model;
    use crate::sat::cnf::CnfFormula;
    use crate::sat::testing::{all_models, first_model};
    use std::collections::BTreeSet;

    #[test]
    fn test_counter() {
        let mut counter = VariableCounter::new(10);
        assert_eq!(counter.fresh(), 10);
        assert_eq!(counter.fresh(), 11);
        assert_eq!(counter.peek(), 12);
    }

    #[test]
    fn test_small_domains_fall_back() {
        let mut counter = VariableCounter::new(10);
        assert_eq!(exactly_one_order(&[4], &mut counter), vec![vec![4]]);
        assert_eq!(counter.peek(), 10);
    }

    #[test]
    fn test_order_clause_shape() {
        let mut counter = VariableCounter::new(10);
        let clauses = exactly_one_order(&[1, 2, 3], &mut counter);
        assert_eq!(counter.peek(), 12);
        assert_eq!(
            clauses,
            vec![
                vec![-1, 10],
                vec![1, -10],
                vec![-2, -10],
                vec![-2, 11],
                vec![2, 10, -11],
                vec![-10, 11],
                vec![-3, -11],
                vec![3, 11],
            ]
        );
    }

    #[test]
    fn test_order_is_exactly_one() {
        for n in 2..=5 {
            let choices: Vec<Literal> = (1..=n).collect();
            let mut counter = VariableCounter::new(n + 1);
            let cnf = CnfFormula::from_clauses(exactly_one_order(&choices, &mut counter)).unwrap();
            let projected: BTreeSet<Vec<Literal>> = all_models(&cnf, usize::MAX)
                .iter()
                .map(|m| choices.iter().copied().filter(|&x| m.is_true(x.unsigned_abs())).collect())
                .collect();
            let expected: BTreeSet<Vec<Literal>> = choices.iter().map(|&x| vec![x]).collect();
            assert_eq!(projected, expected, "n = {n}");
            // auxiliaries are functionally determined by the choice
            assert_eq!(all_models(&cnf, usize::MAX).len(), choices.len());
        }
    }

    fn projected_models(cnf: &CnfFormula, below: Literal) -> BTreeSet<Vec<Literal>> {
        all_models(cnf, usize::MAX)
            .iter()
            .map(|m: &Model| {
                (1..below)
                    .filter(|&v| m.is_true(v.unsigned_abs()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_order_matches_simple_on_small_puzzle() {
        let problem = two_by_two();
        let simple = EncodingKind::Simple.encoder(&problem).unwrap();
        let order = EncodingKind::Order.encoder(&problem).unwrap();
        let below = simple.scheme().first_free_variable();

        let simple_models = projected_models(&simple.encode().unwrap(), below);
        let order_models = projected_models(&order.encode().unwrap(), below);
        assert!(!simple_models.is_empty());
        assert_eq!(simple_models, order_models);
    }

    #[test]
    fn test_order_uses_auxiliaries() {
        let encoder = OrderEncoding::new(&three_by_three()).unwrap();
        let cnf = encoder.encode().unwrap();
        assert!(cnf.num_vars() >= encoder.scheme().first_free_variable().unsigned_abs());
    }

    #[test]
    fn test_auxiliaries_stay_below_the_scheme_bound() {
        let unbounded = GenerateConfig {
            bounded: false,
            width: 3,
            height: 3,
            color_count: 4,
            seed: Some(8),
            ..GenerateConfig::default()
        };
        for problem in [three_by_three(), generate(&unbounded).unwrap().problem] {
            for kind in [EncodingKind::Order, EncodingKind::OrderRedundant] {
                let encoder = kind.encoder(&problem).unwrap();
                let cnf = encoder.encode().unwrap();
                assert!(
                    cnf.num_vars() <= encoder.scheme().max_variable().unsigned_abs(),
                    "{kind}"
                );
            }
        }
    }

    #[test]
    fn test_order_redundant_solves_and_decodes() {
        let encoder = OrderRedundantEncoding::new(&three_by_three()).unwrap();
        let mut cnf = encoder.encode().unwrap();
        let model = first_model(&cnf).unwrap();
        cnf.set_solution(model);
        let solution = encoder.decode(&cnf).unwrap().unwrap();
        assert!(solution.is_consistent());
    }

    #[test]
    fn test_order_detects_unsat() {
        let encoder = OrderEncoding::new(&two_by_two_unsat()).unwrap();
        assert!(first_model(&encoder.encode().unwrap()).is_none());
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clauses tying a center piece's placement to the colors of the diamonds
//! around it.
//!
//! Diamonds are given clockwise from the top as `[top, right, bottom, left]`;
//! a side without a center diamond is `None` and every clause that would
//! mention it is skipped. Colors are positions in the center palette, in the
//! canonical order of [`Classification`](crate::puzzle::piece::Classification).
//!
//! Reading a piece clockwise, a color `c_i` on one side means the next side
//! clockwise shows `c_{i+1}`. The clauses below state exactly that, each in
//! the form "if the piece is here then ...".

use crate::encoding::Clauses;
use crate::encoding::indexing::IndexingScheme;
use crate::puzzle::piece::Symmetry;
use crate::sat::literal::Literal;
use itertools::Itertools;
use smallvec::SmallVec;

type Around = [Option<usize>; 4];

/// Pairs of clockwise-adjacent sides `(first, second)`: left→top, top→right,
/// right→bottom, bottom→left.
fn adjacent(around: Around) -> impl Iterator<Item = (usize, usize)> {
    (0..4).filter_map(move |i| Some((around[(i + 3) % 4]?, around[i]?)))
}

/// Opposite sides: left/right, then top/bottom.
fn opposite(around: Around) -> impl Iterator<Item = (usize, usize)> {
    [(3, 1), (0, 2)]
        .into_iter()
        .filter_map(move |(a, b)| Some((around[a]?, around[b]?)))
}

/// Three consecutive sides `(before, middle, after)` around each middle side.
fn triples(around: Around) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..4).filter_map(move |i| Some((around[(i + 3) % 4]?, around[i]?, around[(i + 1) % 4]?)))
}

fn all_four(around: Around) -> Option<[usize; 4]> {
    Some([around[0]?, around[1]?, around[2]?, around[3]?])
}

/// Clauses for placing a piece of the given symmetry, with placement
/// variable `x`, among the diamonds `around`.
#[must_use]
pub fn center_clauses(
    scheme: &IndexingScheme,
    x: Literal,
    symmetry: Symmetry,
    colors: &[usize],
    around: Around,
) -> Clauses {
    let y = |diamond: usize, color: usize| scheme.center_var(diamond, color);
    let mut clauses = Vec::new();

    match (symmetry, colors) {
        (Symmetry::Uniform, &[a]) => {
            for d in around.into_iter().flatten() {
                clauses.push(vec![-x, y(d, a)]);
            }
        }
        (Symmetry::Triple, &[a, b]) => {
            for (p, q) in adjacent(around).chain(opposite(around)) {
                clauses.push(vec![-x, y(p, a), y(q, a)]);
            }
            if let Some(all) = all_four(around) {
                clauses.push(std::iter::once(-x).chain(all.map(|d| y(d, b))).collect());
            }
        }
        (Symmetry::AdjacentPairs, &[a, b]) => {
            for (p, q) in opposite(around) {
                clauses.push(vec![-x, y(p, a), y(q, a)]);
                clauses.push(vec![-x, y(p, b), y(q, b)]);
            }
        }
        (Symmetry::DiagonalPairs, &[a, b]) => {
            for (p, q) in adjacent(around) {
                clauses.push(vec![-x, y(p, a), y(q, a)]);
                clauses.push(vec![-x, y(p, b), y(q, b)]);
            }
        }
        (Symmetry::AdjacentPair, &[a, b, c]) => {
            for (p, q) in adjacent(around) {
                clauses.push(vec![-x, y(p, b), -y(q, c)]);
                clauses.push(vec![-x, -y(p, b), y(q, c)]);
            }
            for (p, q) in opposite(around) {
                clauses.push(vec![-x, y(p, a), y(q, a)]);
            }
            for (p, q, r) in triples(around) {
                clauses.push(vec![-x, y(p, c), -y(q, a), -y(r, a)]);
            }
        }
        (Symmetry::DiagonalPair, &[a, s, t]) => {
            for (p, q) in opposite(around) {
                clauses.push(vec![-x, -y(p, s), y(q, t)]);
                clauses.push(vec![-x, -y(p, t), y(q, s)]);
                clauses.push(vec![-x, y(p, s), -y(q, t)]);
                clauses.push(vec![-x, y(p, t), -y(q, s)]);
            }
            for (p, q) in adjacent(around) {
                clauses.push(vec![-x, y(p, a), y(q, a)]);
            }
            if let Some(all) = all_four(around) {
                for color in [s, t] {
                    clauses.push(std::iter::once(-x).chain(all.map(|d| y(d, color))).collect());
                }
            }
        }
        (Symmetry::Distinct, &[c0, c1, c2, c3]) => {
            let cycle = [c0, c1, c2, c3];
            for (p, q) in adjacent(around) {
                for i in 0..4 {
                    clauses.push(vec![-x, -y(p, cycle[i]), y(q, cycle[(i + 1) % 4])]);
                }
            }
            if let Some(all) = all_four(around) {
                for color in cycle {
                    clauses.push(std::iter::once(-x).chain(all.map(|d| y(d, color))).collect());
                }
            }
        }
        // a classification always carries as many colors as its symmetry needs
        _ => clauses.push(vec![-x]),
    }

    clauses
}

/// Completes the symmetry clauses for a place that lacks some diamonds, which
/// only happens along the edge of an unbounded puzzle.
///
/// `colors` are the palette positions of the piece's edges in stored order.
/// Every present diamond shows one of the piece's colors, and the present
/// diamonds together show the piece's edges in one of its four rotations.
#[must_use]
pub fn partial_neighborhood_clauses(
    scheme: &IndexingScheme,
    x: Literal,
    colors: &[usize],
    around: Around,
) -> Clauses {
    let present: SmallVec<[(usize, usize); 4]> = around
        .iter()
        .enumerate()
        .filter_map(|(side, d)| d.map(|d| (side, d)))
        .collect();
    if present.is_empty() || present.len() == 4 || colors.len() != 4 {
        return Vec::new();
    }

    let y = |diamond: usize, color: usize| scheme.center_var(diamond, color);
    let palette = colors.iter().copied().sorted_unstable().dedup().collect_vec();
    let allowed = (0..4)
        .map(|r| {
            present
                .iter()
                .map(|&(side, _)| colors[(side + 4 - r) % 4])
                .collect_vec()
        })
        .collect_vec();

    let mut clauses = Vec::new();
    for &(_, d) in &present {
        clauses.push(
            std::iter::once(-x)
                .chain(palette.iter().map(|&c| y(d, c)))
                .collect(),
        );
    }
    for shown in (0..present.len())
        .map(|_| palette.iter().copied())
        .multi_cartesian_product()
    {
        if allowed.contains(&shown) {
            continue;
        }
        clauses.push(
            std::iter::once(-x)
                .chain(present.iter().zip(&shown).map(|(&(_, d), &c)| -y(d, c)))
                .collect(),
        );
    }
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::fixtures::{three_by_three, unbounded_pair};

    fn scheme() -> IndexingScheme {
        IndexingScheme::new(&three_by_three()).unwrap()
    }

    const FULL: Around = [Some(0), Some(1), Some(2), Some(3)];

    #[test]
    fn test_neighbour_pairs() {
        assert_eq!(
            adjacent(FULL).collect::<Vec<_>>(),
            vec![(3, 0), (0, 1), (1, 2), (2, 3)]
        );
        assert_eq!(opposite(FULL).collect::<Vec<_>>(), vec![(3, 1), (0, 2)]);
        assert_eq!(
            triples(FULL).collect::<Vec<_>>(),
            vec![(3, 0, 1), (0, 1, 2), (1, 2, 3), (2, 3, 0)]
        );
        let partial = [None, Some(1), Some(2), None];
        assert_eq!(adjacent(partial).collect::<Vec<_>>(), vec![(1, 2)]);
        assert_eq!(opposite(partial).count(), 0);
        assert_eq!(all_four(partial), None);
    }

    #[test]
    fn test_clause_counts_per_symmetry() {
        let scheme = scheme();
        let count = |symmetry, colors: &[usize]| center_clauses(&scheme, 1, symmetry, colors, FULL).len();
        assert_eq!(count(Symmetry::Uniform, &[0]), 4);
        assert_eq!(count(Symmetry::Triple, &[0, 1]), 4 + 2 + 1);
        assert_eq!(count(Symmetry::AdjacentPairs, &[0, 1]), 4);
        assert_eq!(count(Symmetry::DiagonalPairs, &[0, 1]), 8);
        assert_eq!(count(Symmetry::AdjacentPair, &[0, 1, 2]), 8 + 2 + 4);
        assert_eq!(count(Symmetry::DiagonalPair, &[0, 1, 2]), 8 + 4 + 2);
        assert_eq!(count(Symmetry::Distinct, &[0, 1, 2, 3]), 16 + 4);
    }

    #[test]
    fn test_every_clause_is_guarded_by_placement() {
        let scheme = scheme();
        for (symmetry, colors) in [
            (Symmetry::Triple, &[0, 1][..]),
            (Symmetry::AdjacentPair, &[0, 1, 2][..]),
            (Symmetry::Distinct, &[0, 1, 2, 3][..]),
        ] {
            for clause in center_clauses(&scheme, 7, symmetry, colors, FULL) {
                assert_eq!(clause[0], -7);
            }
        }
    }

    #[test]
    fn test_distinct_successor_clause() {
        let scheme = scheme();
        let clauses = center_clauses(&scheme, 5, Symmetry::Distinct, &[0, 1, 2, 3], FULL);
        // top shows color 0, so right shows color 1
        assert!(clauses.contains(&vec![-5, -scheme.center_var(0, 0), scheme.center_var(1, 1)]));
        // some side shows color 2
        assert!(clauses.contains(&vec![
            -5,
            scheme.center_var(0, 2),
            scheme.center_var(1, 2),
            scheme.center_var(2, 2),
            scheme.center_var(3, 2)
        ]));
    }

    #[test]
    fn test_missing_sides_are_skipped() {
        let scheme = IndexingScheme::new(&unbounded_pair()).unwrap();
        let around = scheme.center_neighbors(0);
        let clauses = center_clauses(&scheme, 1, Symmetry::Distinct, &[0, 1, 2, 3], around);
        assert!(clauses.is_empty());
        let clauses = center_clauses(&scheme, 1, Symmetry::Uniform, &[0], around);
        assert_eq!(clauses, vec![vec![-1, scheme.center_var(0, 0)]]);
    }

    #[test]
    fn test_partial_neighborhood() {
        let scheme = IndexingScheme::new(&unbounded_pair()).unwrap();
        let around = scheme.center_neighbors(0);
        let clauses = partial_neighborhood_clauses(&scheme, 1, &[0, 1, 2, 3], around);
        // a single side can show any of the four colors
        assert_eq!(
            clauses,
            vec![vec![
                -1,
                scheme.center_var(0, 0),
                scheme.center_var(0, 1),
                scheme.center_var(0, 2),
                scheme.center_var(0, 3)
            ]]
        );
        assert!(partial_neighborhood_clauses(&scheme, 1, &[0, 1, 2, 3], FULL).is_empty());
    }

    #[test]
    fn test_partial_neighborhood_forbids_unrotatable_pairs() {
        let scheme = scheme();
        let around = [Some(0), None, Some(1), None];
        let clauses = partial_neighborhood_clauses(&scheme, 2, &[0, 1, 2, 3], around);
        // top and bottom always show opposite edges: 0/2 or 1/3
        assert!(clauses.contains(&vec![-2, -scheme.center_var(0, 0), -scheme.center_var(1, 1)]));
        assert!(!clauses.contains(&vec![-2, -scheme.center_var(0, 0), -scheme.center_var(1, 2)]));
        assert_eq!(clauses.len(), 2 + 16 - 4);
    }

    #[test]
    fn test_mismatched_colors_forbid_placement() {
        let scheme = scheme();
        let clauses = center_clauses(&scheme, 3, Symmetry::Distinct, &[0, 1], FULL);
        assert_eq!(clauses, vec![vec![-3]]);
    }
}

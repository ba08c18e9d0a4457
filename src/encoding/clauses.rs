#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clause generators shared by the encodings.
//!
//! Each generator returns plain literal lists; the encoders concatenate them
//! and hand them to [`CnfFormula`](crate::sat::cnf::CnfFormula), which drops
//! duplicates.

use crate::encoding::Clauses;
use crate::encoding::correlation::{center_clauses, partial_neighborhood_clauses};
use crate::encoding::indexing::{IndexingScheme, Slot};
use crate::puzzle::piece::{Color, Piece, PieceKind};
use crate::sat::literal::Literal;
use bit_vec::BitVec;
use itertools::Itertools;
use smallvec::SmallVec;

/// The piece groups in encoding order.
pub const GROUPS: [PieceKind; 3] = [PieceKind::Corner, PieceKind::Border, PieceKind::Center];

/// At least one of `literals`, and no two of them.
#[must_use]
pub fn exactly_one_pairwise(literals: &[Literal]) -> Clauses {
    let mut clauses = Vec::with_capacity(1 + literals.len() * literals.len() / 2);
    clauses.push(literals.to_vec());
    clauses.extend(
        literals
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| vec![-a, -b]),
    );
    clauses
}

/// Every piece of the group is on at least one of the group's places, and
/// every place of the group holds at least one of the group's pieces.
#[must_use]
pub fn group_domain_clauses(scheme: &IndexingScheme, kind: PieceKind) -> Clauses {
    let places = scheme.group_places(kind);
    let pieces = scheme.group_pieces(kind);

    let by_piece = pieces.clone().map(|piece| {
        places
            .iter()
            .map(|&place| scheme.placement(piece, place))
            .collect_vec()
    });
    let by_place = places.iter().map(|&place| {
        pieces
            .clone()
            .map(|piece| scheme.placement(piece, place))
            .collect_vec()
    });
    by_piece.chain(by_place).collect()
}

/// The group's pieces are on none of the places outside the group.
#[must_use]
pub fn group_exclusion_clauses(scheme: &IndexingScheme, kind: PieceKind) -> Clauses {
    let mut inside = BitVec::from_elem(scheme.cells(), false);
    for &place in scheme.group_places(kind) {
        inside.set(place, true);
    }

    scheme
        .group_pieces(kind)
        .flat_map(|piece| {
            let inside = &inside;
            (0..scheme.cells())
                .filter(move |&place| !inside.get(place).unwrap_or(false))
                .map(move |place| vec![-scheme.placement(piece, place)])
        })
        .collect()
}

/// Two pieces that are rotations of each other never share a place.
#[must_use]
pub fn equal_piece_clauses(scheme: &IndexingScheme, kind: PieceKind) -> Clauses {
    let pieces = scheme.pieces();
    let mut clauses = Vec::new();
    for (p, q) in scheme.group_pieces(kind).tuple_combinations() {
        if pieces[p] != pieces[q] {
            continue;
        }
        for &place in scheme.group_places(kind) {
            clauses.push(vec![
                -scheme.placement(p, place),
                -scheme.placement(q, place),
            ]);
        }
    }
    clauses
}

/// The direct encoding of one group: domain, exclusion and equal pieces.
#[must_use]
pub fn simple_group_clauses(scheme: &IndexingScheme, kind: PieceKind) -> Clauses {
    let mut clauses = group_domain_clauses(scheme, kind);
    clauses.extend(group_exclusion_clauses(scheme, kind));
    clauses.extend(equal_piece_clauses(scheme, kind));
    clauses
}

/// Color variables of every border diamond, then of every center diamond.
pub fn diamond_domains(scheme: &IndexingScheme) -> impl Iterator<Item = Vec<Literal>> + '_ {
    let border = (0..scheme.border_diamonds().len()).map(|d| {
        (0..scheme.border_colors().len())
            .map(|c| scheme.border_var(d, c))
            .collect_vec()
    });
    let center = (0..scheme.center_diamonds().len()).map(|d| {
        (0..scheme.center_colors().len())
            .map(|c| scheme.center_var(d, c))
            .collect_vec()
    });
    border.chain(center)
}

/// Every diamond has exactly one color from its palette.
#[must_use]
pub fn diamond_color_clauses(scheme: &IndexingScheme) -> Clauses {
    diamond_domains(scheme)
        .flat_map(|domain| exactly_one_pairwise(&domain))
        .collect()
}

/// `[-x, var]`, or `[-x]` when the color has no variable on that diamond.
fn implies(x: Literal, var: Option<Literal>) -> Vec<Literal> {
    var.map_or_else(|| vec![-x], |var| vec![-x, var])
}

fn slot_clauses(scheme: &IndexingScheme, piece: &Piece, x: Literal, slot: &Slot) -> Clauses {
    let border = |d: usize, color: Option<Color>| color.and_then(|c| scheme.border_color_var(d, c));
    let mut clauses = vec![
        implies(x, border(slot.left, piece.border_color_left())),
        implies(x, border(slot.right, piece.border_color_right())),
    ];
    if let Some(inward) = slot.inward {
        let var = piece
            .inward_color()
            .and_then(|c| scheme.center_color_var(inward, c));
        clauses.push(implies(x, var));
    }
    clauses
}

/// A corner piece on a corner place fixes the colors of both border diamonds
/// it touches.
#[must_use]
pub fn corner_clauses(scheme: &IndexingScheme) -> Clauses {
    boundary_clauses(scheme, PieceKind::Corner, scheme.corner_slots())
}

/// A border piece on a border place fixes its two border diamonds and the
/// center diamond opposite its boundary edge.
#[must_use]
pub fn border_clauses(scheme: &IndexingScheme) -> Clauses {
    boundary_clauses(scheme, PieceKind::Border, scheme.border_slots())
}

fn boundary_clauses(scheme: &IndexingScheme, kind: PieceKind, slots: &[Slot]) -> Clauses {
    let pieces = scheme.pieces();
    scheme
        .group_pieces(kind)
        .flat_map(move |p| {
            slots.iter().flat_map(move |slot| {
                slot_clauses(scheme, &pieces[p], scheme.placement(p, slot.place), slot)
            })
        })
        .collect()
}

/// Palette positions of a center piece's canonical colors, or `None` if one
/// of them is missing from the center palette.
fn palette_positions(scheme: &IndexingScheme, colors: &[Color]) -> Option<SmallVec<[usize; 4]>> {
    colors
        .iter()
        .map(|&c| {
            usize::try_from(c)
                .ok()
                .and_then(|id| scheme.center_colors().position(id))
        })
        .collect()
}

/// A center piece on a center place constrains the diamonds around it
/// according to its symmetry class.
#[must_use]
pub fn center_piece_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut clauses = Vec::new();
    for piece in scheme.group_pieces(PieceKind::Center) {
        let class = scheme.pieces()[piece].classification();
        let canonical = palette_positions(scheme, &class.colors);
        let stored = palette_positions(scheme, &scheme.pieces()[piece].colors());
        for &place in scheme.group_places(PieceKind::Center) {
            let x = scheme.placement(piece, place);
            let around = scheme.center_neighbors(place);
            let (Some(canonical), Some(stored)) = (&canonical, &stored) else {
                clauses.push(vec![-x]);
                continue;
            };
            clauses.extend(center_clauses(scheme, x, class.symmetry, canonical, around));
            if around.contains(&None) {
                clauses.extend(partial_neighborhood_clauses(scheme, x, stored, around));
            }
        }
    }
    clauses
}

/// All piece-to-diamond correlation clauses: corners, borders, centers.
#[must_use]
pub fn correlation_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut clauses = corner_clauses(scheme);
    clauses.extend(border_clauses(scheme));
    clauses.extend(center_piece_clauses(scheme));
    clauses
}

/// A center piece never sits where a surrounding diamond shows a color the
/// piece does not have. Only places with four center diamonds are covered.
#[must_use]
pub fn forbidden_color_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut clauses = Vec::new();
    let palette = scheme.center_colors();
    for &place in scheme.group_places(PieceKind::Center) {
        let around = scheme.center_neighbors(place);
        let Some(around) = around.iter().copied().collect::<Option<SmallVec<[usize; 4]>>>() else {
            continue;
        };
        for piece in scheme.group_pieces(PieceKind::Center) {
            let colors = scheme.pieces()[piece].colors();
            let x = scheme.placement(piece, place);
            for (position, &id) in palette.ids().iter().enumerate() {
                if colors.iter().any(|&c| usize::try_from(c).ok() == Some(id)) {
                    continue;
                }
                for &d in &around {
                    clauses.push(vec![-x, -scheme.center_var(d, position)]);
                }
            }
        }
    }
    clauses
}

/// No two center pieces share a place that lacks some of its diamonds.
///
/// On such places the diamonds do not pin down the piece, so the direct
/// encoding needs this to keep placements one-to-one. Bounded puzzles have
/// no such places.
#[must_use]
pub fn partial_place_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut clauses = Vec::new();
    for &place in scheme.group_places(PieceKind::Center) {
        if !scheme.center_neighbors(place).contains(&None) {
            continue;
        }
        for (p, q) in scheme.group_pieces(PieceKind::Center).tuple_combinations() {
            clauses.push(vec![
                -scheme.placement(p, place),
                -scheme.placement(q, place),
            ]);
        }
    }
    clauses
}

/// No two pieces of a group share a place, and no piece of a group is on two
/// places.
#[must_use]
pub fn one_to_one_clauses(scheme: &IndexingScheme) -> Clauses {
    let mut clauses = Vec::new();
    for kind in GROUPS {
        let places = scheme.group_places(kind);
        for &place in places {
            for (p, q) in scheme.group_pieces(kind).tuple_combinations() {
                clauses.push(vec![
                    -scheme.placement(p, place),
                    -scheme.placement(q, place),
                ]);
            }
        }
        for piece in scheme.group_pieces(kind) {
            for (&l, &m) in places.iter().tuple_combinations() {
                clauses.push(vec![
                    -scheme.placement(piece, l),
                    -scheme.placement(piece, m),
                ]);
            }
        }
    }
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::fixtures::{three_by_three, two_by_two};
    use crate::puzzle::problem::Problem;

    #[test]
    fn test_exactly_one_pairwise() {
        let clauses = exactly_one_pairwise(&[1, 2, 3]);
        assert_eq!(
            clauses,
            vec![vec![1, 2, 3], vec![-1, -2], vec![-1, -3], vec![-2, -3]]
        );
    }

    #[test]
    fn test_group_domain_clauses() {
        let scheme = IndexingScheme::new(&two_by_two()).unwrap();
        let clauses = group_domain_clauses(&scheme, PieceKind::Corner);
        assert_eq!(clauses.len(), 8);
        assert_eq!(clauses[0], vec![1, 9, 5, 13]);
        assert_eq!(clauses[4], vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_exclusion_only_touches_foreign_places() {
        let scheme = IndexingScheme::new(&three_by_three()).unwrap();
        let clauses = group_exclusion_clauses(&scheme, PieceKind::Corner);
        assert_eq!(clauses.len(), 4 * 5);
        let corner_places = scheme.group_places(PieceKind::Corner);
        for clause in &clauses {
            assert_eq!(clause.len(), 1);
            let place = (clause[0].unsigned_abs() as usize - 1) / 9;
            assert!(!corner_places.contains(&place));
        }
    }

    #[test]
    fn test_equal_pieces_are_separated() {
        let mut problem = Problem::new(true, false, 2, 2);
        for colors in [[0, 0, 1, 1], [1, 0, 0, 1], [0, 0, 2, 2], [0, 0, 1, 2]] {
            problem.add_piece(Piece::new(colors)).unwrap();
        }
        let scheme = IndexingScheme::new(&problem).unwrap();
        let clauses = equal_piece_clauses(&scheme, PieceKind::Corner);
        assert_eq!(clauses.len(), 4);
        assert!(clauses.contains(&vec![-scheme.placement(0, 0), -scheme.placement(1, 0)]));
    }

    #[test]
    fn test_corner_clauses_point_at_border_diamonds() {
        let scheme = IndexingScheme::new(&two_by_two()).unwrap();
        let clauses = corner_clauses(&scheme);
        assert_eq!(clauses.len(), 4 * 4 * 2);
        for clause in &clauses {
            assert_eq!(clause.len(), 2);
            assert!(clause[0] < 0);
            assert!(clause[1] >= scheme.border_var(0, 0));
        }
        // piece 0 = [0, 1, 2, 0] on the top-left corner
        let top_left = scheme.corner_slots()[0];
        let x = scheme.placement(0, 0);
        assert!(clauses.contains(&vec![-x, scheme.border_color_var(top_left.left, 2).unwrap()]));
        assert!(clauses.contains(&vec![-x, scheme.border_color_var(top_left.right, 1).unwrap()]));
    }

    #[test]
    fn test_border_clauses_include_inward_diamond() {
        let scheme = IndexingScheme::new(&three_by_three()).unwrap();
        let clauses = border_clauses(&scheme);
        assert_eq!(clauses.len(), 4 * 4 * 3);
        let center_start = scheme.center_var(0, 0);
        assert_eq!(
            clauses.iter().filter(|c| c[1] >= center_start).count(),
            4 * 4
        );
    }

    #[test]
    fn test_forbidden_colors() {
        let scheme = IndexingScheme::new(&three_by_three()).unwrap();
        let clauses = forbidden_color_clauses(&scheme);
        // one center piece using all four center colors
        assert!(clauses.is_empty());
    }

    #[test]
    fn test_partial_places_only_in_unbounded_puzzles() {
        let scheme = IndexingScheme::new(&three_by_three()).unwrap();
        assert!(partial_place_clauses(&scheme).is_empty());

        let scheme = IndexingScheme::new(&crate::puzzle::fixtures::unbounded_pair()).unwrap();
        let clauses = partial_place_clauses(&scheme);
        assert_eq!(clauses.len(), 2);
        assert!(clauses.contains(&vec![-scheme.placement(0, 0), -scheme.placement(1, 0)]));
    }

    #[test]
    fn test_one_to_one_counts() {
        let scheme = IndexingScheme::new(&two_by_two()).unwrap();
        let clauses = one_to_one_clauses(&scheme);
        assert_eq!(clauses.len(), 4 * 6 + 4 * 6);
    }
}

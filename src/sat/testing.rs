//! A small reference DPLL search, used by unit tests to check encodings
//! without an external solver.
//!
//! Variables that occur in no clause are left false and never branched on.

use crate::sat::assignment::Model;
use crate::sat::cnf::CnfFormula;
use crate::sat::literal::{Literal, Variable, variable};

type Assignment = Vec<Option<bool>>;

fn value(assignment: &Assignment, literal: Literal) -> Option<bool> {
    assignment[variable(literal) as usize].map(|v| v == (literal > 0))
}

/// Unit propagation to a fixpoint. Returns `false` on a falsified clause.
fn propagate(clauses: &[Vec<Literal>], assignment: &mut Assignment) -> bool {
    loop {
        let mut changed = false;
        for clause in clauses {
            let mut open = None;
            let mut unassigned = 0;
            if clause.iter().any(|&l| value(assignment, l) == Some(true)) {
                continue;
            }
            for &l in clause {
                if value(assignment, l).is_none() {
                    unassigned += 1;
                    open = Some(l);
                }
            }
            match (unassigned, open) {
                (0, _) => return false,
                (1, Some(l)) => {
                    assignment[variable(l) as usize] = Some(l > 0);
                    changed = true;
                }
                _ => {}
            }
        }
        if !changed {
            return true;
        }
    }
}

struct Search {
    clauses: Vec<Vec<Literal>>,
    vars: Vec<Variable>,
    limit: usize,
    models: Vec<Model>,
}

impl Search {
    fn run(&mut self, mut assignment: Assignment) {
        if self.models.len() >= self.limit || !propagate(&self.clauses, &mut assignment) {
            return;
        }
        match self.vars.iter().find(|&&v| assignment[v as usize].is_none()) {
            None => {
                let model = self
                    .vars
                    .iter()
                    .map(|&v| {
                        let l = Literal::try_from(v).unwrap();
                        if assignment[v as usize] == Some(true) { l } else { -l }
                    })
                    .collect();
                self.models.push(model);
            }
            Some(&v) => {
                for choice in [true, false] {
                    let mut next = assignment.clone();
                    next[v as usize] = Some(choice);
                    self.run(next);
                }
            }
        }
    }
}

/// Up to `limit` models of `cnf`, each assigning every variable that occurs
/// in a clause.
pub fn all_models(cnf: &CnfFormula, limit: usize) -> Vec<Model> {
    let mut vars: Vec<Variable> = cnf.variables().iter().copied().collect();
    vars.sort_unstable();
    let mut search = Search {
        clauses: cnf.iter().map(|c| c.literals().to_vec()).collect(),
        vars,
        limit,
        models: Vec::new(),
    };
    search.run(vec![None; cnf.num_vars() as usize + 1]);
    search.models
}

pub fn first_model(cnf: &CnfFormula) -> Option<Model> {
    all_models(cnf, 1).pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerates_all_models() {
        let cnf = CnfFormula::from_clauses([vec![1, 2], vec![-1, -2]]).unwrap();
        let models = all_models(&cnf, usize::MAX);
        assert_eq!(models.len(), 2);
        assert!(models.iter().all(|m| cnf.is_satisfied_by(m)));
    }

    #[test]
    fn test_unsat() {
        let cnf = CnfFormula::from_clauses([vec![1], vec![-1, 2], vec![-2]]).unwrap();
        assert!(first_model(&cnf).is_none());
    }

    #[test]
    fn test_limit() {
        let cnf = CnfFormula::from_clauses([vec![1, 2, 3]]).unwrap();
        assert_eq!(all_models(&cnf, 3).len(), 3);
        assert_eq!(all_models(&cnf, usize::MAX).len(), 7);
    }
}

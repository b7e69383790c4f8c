//! Unit propagation to a fixpoint, for checking encodings in tests without an external solver.
//!
//! Every literal derived here is implied by the formula, so when propagation assigns every
//! variable without a conflict, that assignment is the formula's only model.

use std::collections::HashMap;

use crate::formula_builder::{Formula, Variable};

#[derive(Debug, PartialEq, Eq)]
pub struct Conflict;

pub fn propagate(formula: &Formula) -> Result<HashMap<Variable, bool>, Conflict> {
    let mut assignments: HashMap<Variable, bool> = HashMap::new();
    loop {
        let mut changed = false;
        for clause in formula.clauses() {
            let mut satisfied = false;
            let mut unassigned = Vec::new();
            for literal in clause.literals().iter().copied() {
                match assignments.get(&literal.variable()) {
                    Some(value) if *value == literal.is_positive() => {
                        satisfied = true;
                        break;
                    }
                    Some(_) => (),
                    None => unassigned.push(literal),
                }
            }
            if satisfied {
                continue;
            }
            match &*unassigned {
                [] => return Err(Conflict),
                &[literal] => {
                    assignments.insert(literal.variable(), literal.is_positive());
                    changed = true;
                }
                _ => (),
            }
        }
        if !changed {
            return Ok(assignments);
        }
    }
}

/// Whether propagation fixed every variable the formula mentions.
pub fn is_complete(formula: &Formula, assignments: &HashMap<Variable, bool>) -> bool {
    formula.clauses().iter().all(|clause| {
        clause
            .literals()
            .iter()
            .all(|literal| assignments.contains_key(&literal.variable()))
    })
}

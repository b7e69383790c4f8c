use std::collections::HashMap;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::AdderError;

pub use arithmetic::{ArithmeticFormulaBuilder, FULL_ADDER_CLAUSES};
pub use gate::GateFormulaBuilder;
pub use literal::Literal;
pub use variable::Variable;

mod arithmetic;
mod gate;
mod literal;
#[cfg(test)]
pub(crate) mod propagate;
mod variable;

pub trait FormulaBuilder {
    fn add_clause(&mut self, literals: Vec<Literal>);

    fn add_unit_clause(&mut self, literal: Literal) {
        self.add_clause(vec![literal]);
    }

    fn add_binary_clause(&mut self, a: Literal, b: Literal) {
        self.add_clause(vec![a, b]);
    }

    fn variable_count(&self) -> usize;
    fn clause_count(&self) -> usize;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause(Vec<Literal>);

impl Clause {
    pub fn literals(&self) -> &[Literal] {
        &self.0
    }

    pub fn is_unit(&self) -> bool {
        self.0.len() == 1
    }

    fn write_dimacs_fragment(&self, buf: &mut String) {
        for literal in self.0.iter() {
            buf.push_str(&literal.to_string());
            buf.push(' ');
        }
        buf.push_str("0\n");
    }
}

/// An in-memory CNF formula. Clauses keep the order they were added in.
#[derive(Clone, Debug, Default)]
pub struct Formula {
    highest_variable_index: u32,
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether every clause has a literal made true by `assignments`. Unassigned variables count
    /// as false.
    pub fn is_satisfied_by(&self, assignments: &HashMap<Variable, bool>) -> bool {
        self.clauses.iter().all(|clause| {
            clause.literals().iter().any(|literal| {
                assignments.get(&literal.variable()).copied().unwrap_or(false)
                    == literal.is_positive()
            })
        })
    }

    /// Writes the formula in DIMACS CNF. The header declares the highest variable referenced by
    /// any clause and the exact number of clause lines that follow.
    pub async fn write_dimacs<W: AsyncWrite + Unpin>(&self, w: &mut W) -> Result<(), AdderError> {
        let header = format!(
            "p cnf {} {}\n",
            self.highest_variable_index,
            self.clauses.len()
        );
        w.write_all(header.as_bytes()).await?;

        let mut buf = String::new();
        for clause in &self.clauses {
            buf.clear();
            clause.write_dimacs_fragment(&mut buf);
            w.write_all(buf.as_bytes()).await?;
        }
        w.flush().await?;
        Ok(())
    }
}

impl FormulaBuilder for Formula {
    fn add_clause(&mut self, literals: Vec<Literal>) {
        assert!(!literals.is_empty(), "empty clause");
        for literal in literals.iter() {
            self.highest_variable_index = self
                .highest_variable_index
                .max(literal.variable().index());
        }
        self.clauses.push(Clause(literals));
    }

    fn variable_count(&self) -> usize {
        self.highest_variable_index as usize
    }

    fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}

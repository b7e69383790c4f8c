use tracing::{debug, trace};

use crate::allocator::VariableAllocator;
use crate::bit_pattern::BitPattern;
use crate::error::{AdderError, Operand};
use crate::formula_builder::{
    ArithmeticFormulaBuilder, Formula, FormulaBuilder, Variable, FULL_ADDER_CLAUSES,
};

#[derive(Clone, Debug)]
pub struct AdderParameters {
    pub a_width: usize,
    pub b_width: usize,
    /// Fixed value of operand A, most significant bit first. `None` leaves its bits free.
    pub a: Option<BitPattern>,
    pub b: Option<BitPattern>,
}

impl AdderParameters {
    pub fn new(a_width: usize, b_width: usize) -> Self {
        Self {
            a_width,
            b_width,
            a: None,
            b: None,
        }
    }

    pub fn with_operand(mut self, operand: Operand, pattern: BitPattern) -> Self {
        match operand {
            Operand::A => self.a = Some(pattern),
            Operand::B => self.b = Some(pattern),
        }
        self
    }

    fn width(&self, operand: Operand) -> usize {
        match operand {
            Operand::A => self.a_width,
            Operand::B => self.b_width,
        }
    }

    fn pattern(&self, operand: Operand) -> Option<&BitPattern> {
        match operand {
            Operand::A => self.a.as_ref(),
            Operand::B => self.b.as_ref(),
        }
    }
}

/// Sizes of a compiled adder, known before any clause is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitShape {
    pub max_bits: usize,
    pub variable_count: usize,
    /// Full-adder clauses only, excluding unit clauses.
    pub circuit_clause_count: usize,
    pub unit_clause_count: usize,
}

impl CircuitShape {
    pub fn of(params: &AdderParameters) -> Result<Self, AdderError> {
        let allocator = VariableAllocator::new(params.a_width, params.b_width)?;
        let max_bits = allocator.max_bits();
        let operand_units = |operand| match params.pattern(operand) {
            Some(_) => max_bits,
            None => max_bits - params.width(operand),
        };
        Ok(Self {
            max_bits,
            variable_count: allocator.variable_count(),
            circuit_clause_count: FULL_ADDER_CLAUSES * max_bits,
            unit_clause_count: 1 + operand_units(Operand::A) + operand_units(Operand::B),
        })
    }

    pub fn clause_count(&self) -> usize {
        self.circuit_clause_count + self.unit_clause_count
    }
}

/// A generated adder formula together with the handles needed to read or constrain it.
#[derive(Clone, Debug)]
pub struct CompiledAdder {
    allocator: VariableAllocator,
    formula: Formula,
}

impl CompiledAdder {
    pub fn allocator(&self) -> &VariableAllocator {
        &self.allocator
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn into_formula(self) -> Formula {
        self.formula
    }

    pub fn variable_count(&self) -> usize {
        self.formula.variable_count()
    }

    pub fn clause_count(&self) -> usize {
        self.formula.clause_count()
    }

    pub fn max_bits(&self) -> usize {
        self.allocator.max_bits()
    }

    pub fn operand_a_variables(&self) -> Vec<Variable> {
        self.allocator.operand_variables(Operand::A)
    }

    pub fn operand_b_variables(&self) -> Vec<Variable> {
        self.allocator.operand_variables(Operand::B)
    }

    pub fn carry_in_zero(&self) -> Variable {
        self.allocator.carry_in_zero()
    }

    /// Sum bits, least significant first.
    pub fn sum_variables(&self) -> Vec<Variable> {
        self.allocator.sum_variables()
    }

    pub fn carry_out(&self) -> Variable {
        self.allocator.carry_out()
    }
}

fn check_pattern(params: &AdderParameters, operand: Operand) -> Result<(), AdderError> {
    let width = params.width(operand);
    match params.pattern(operand) {
        Some(pattern) if pattern.len() > width => Err(AdderError::BitPatternTooLong {
            operand,
            pattern_len: pattern.len(),
            width,
        }),
        _ => Ok(()),
    }
}

fn add_operand_constraints(
    formula: &mut Formula,
    allocator: &VariableAllocator,
    operand: Operand,
    pattern: Option<&BitPattern>,
) {
    let width = allocator.width(operand);
    for (bit, variable) in allocator.operand_variables(operand).into_iter().enumerate() {
        if bit >= width {
            // Zero extension past the declared width.
            formula.add_unit_clause(variable.as_negative());
        } else if let Some(pattern) = pattern {
            // Bits past the end of a short pattern are leading zeros.
            let value = pattern.bit_from_lsb(bit).unwrap_or(false);
            formula.add_unit_clause(variable.as_literal(value));
        }
    }
}

/// Builds the ripple-carry adder formula for `params`.
///
/// The formula holds, in order: 21 clauses for each of the `max(a_width, b_width) + 1` stages,
/// the unit clause forcing the carry into stage 0 false, then the unit clauses fixing operand A
/// and operand B. Every parameter is validated before any clause is built.
pub fn compile_adder(params: &AdderParameters) -> Result<CompiledAdder, AdderError> {
    let allocator = VariableAllocator::new(params.a_width, params.b_width)?;
    check_pattern(params, Operand::A)?;
    check_pattern(params, Operand::B)?;
    let shape = CircuitShape::of(params)?;

    let mut formula = Formula::new();
    for (i, stage) in allocator.stages().enumerate() {
        trace!(stage = i, variables = ?stage, "adding full adder");
        formula.add_full_adder_constraint(&stage);
    }
    formula.add_unit_clause(allocator.carry_in_zero().as_negative());
    add_operand_constraints(&mut formula, &allocator, Operand::A, params.a.as_ref());
    add_operand_constraints(&mut formula, &allocator, Operand::B, params.b.as_ref());

    debug_assert_eq!(shape.variable_count, formula.variable_count());
    debug_assert_eq!(shape.clause_count(), formula.clause_count());
    debug!(
        a_width = params.a_width,
        b_width = params.b_width,
        max_bits = shape.max_bits,
        variables = formula.variable_count(),
        clauses = formula.clause_count(),
        "compiled adder"
    );

    Ok(CompiledAdder { allocator, formula })
}

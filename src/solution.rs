use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::adder::CompiledAdder;
use crate::bit_pattern::BitPattern;
use crate::formula_builder::Variable;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("the model leaves variable {0} unassigned")]
    Unassigned(Variable),

    #[error("the model does not satisfy the adder formula")]
    NotAModel,
}

/// The operands and sum read back from a model of an adder formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Addition {
    pub a: BitPattern,
    pub b: BitPattern,
    /// `max_bits` wide, so it always has room for the final carry.
    pub sum: BitPattern,
    pub carry_out: bool,
}

fn read_bits(
    variables: &[Variable],
    assignments: &HashMap<Variable, bool>,
) -> Result<BitPattern, DecodeError> {
    let mut bits = variables
        .iter()
        .map(|variable| {
            assignments
                .get(variable)
                .copied()
                .ok_or(DecodeError::Unassigned(*variable))
        })
        .collect::<Result<Vec<_>, _>>()?;
    bits.reverse();
    Ok(BitPattern::from_msb_first(bits))
}

impl Addition {
    pub fn decode(
        adder: &CompiledAdder,
        assignments: &HashMap<Variable, bool>,
    ) -> Result<Self, DecodeError> {
        if !adder.formula().is_satisfied_by(assignments) {
            return Err(DecodeError::NotAModel);
        }
        let carry_out = adder.carry_out();
        Ok(Self {
            a: read_bits(&adder.operand_a_variables(), assignments)?,
            b: read_bits(&adder.operand_b_variables(), assignments)?,
            sum: read_bits(&adder.sum_variables(), assignments)?,
            carry_out: assignments
                .get(&carry_out)
                .copied()
                .ok_or(DecodeError::Unassigned(carry_out))?,
        })
    }
}

impl fmt::Display for Addition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.a, self.b, self.sum)?;
        if let (Some(a), Some(b), Some(sum)) =
            (self.a.to_u128(), self.b.to_u128(), self.sum.to_u128())
        {
            write!(f, " ({} + {} = {})", a, b, sum)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Addition, DecodeError};
    use crate::adder::{compile_adder, AdderParameters};
    use crate::error::Operand;
    use crate::formula_builder::propagate::propagate;

    #[test]
    fn decodes_propagated_model() {
        let params = AdderParameters::new(3, 4)
            .with_operand(Operand::A, "010".parse().unwrap())
            .with_operand(Operand::B, "1110".parse().unwrap());
        let adder = compile_adder(&params).unwrap();
        let assignments = propagate(adder.formula()).unwrap();

        let addition = Addition::decode(&adder, &assignments).unwrap();
        assert_eq!("00010", addition.a.to_string());
        assert_eq!("01110", addition.b.to_string());
        assert_eq!("10000", addition.sum.to_string());
        assert!(!addition.carry_out);
        assert_eq!("00010 + 01110 = 10000 (2 + 14 = 16)", addition.to_string());
    }

    #[test]
    fn rejects_non_models() {
        let params = AdderParameters::new(1, 1)
            .with_operand(Operand::A, "1".parse().unwrap())
            .with_operand(Operand::B, "1".parse().unwrap());
        let adder = compile_adder(&params).unwrap();
        let mut assignments = propagate(adder.formula()).unwrap();

        let sum_bit = adder.sum_variables()[1];
        assignments.insert(sum_bit, false);
        assert_eq!(
            Err(DecodeError::NotAModel),
            Addition::decode(&adder, &assignments)
        );
        assert!(matches!(
            Addition::decode(&adder, &HashMap::new()),
            Err(DecodeError::NotAModel)
        ));
    }
}

//! Variable numbering for a ripple-carry adder.
//!
//! The positive integers are split into contiguous ranges, in this order:
//!
//! ```text
//! sum        max_bits        sum[0] .. sum[max_bits - 1]
//! carry      max_bits + 1    carry[0] (carry-in, always false) .. carry[max_bits] (carry-out)
//! operands   2 * max_bits    a[0], b[0], a[1], b[1], ...
//! auxiliary  4 * max_bits    per stage: a ^ b, a & b, a & cin, b & cin
//! ```
//!
//! Callers only ever see typed handles, never offsets into these ranges.

use crate::error::{AdderError, Operand};
use crate::formula_builder::Variable;

pub const AUXILIARY_VARIABLES_PER_STAGE: usize = 4;

/// Sum, carry-out, two operand bits and the auxiliaries. The carry-in of stage 0 is the only
/// variable not owned by a stage.
pub const VARIABLES_PER_STAGE: usize = 4 + AUXILIARY_VARIABLES_PER_STAGE;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuxiliaryGate {
    /// `a ^ b`, the first half adder's sum.
    XorAB,
    AndAB,
    AndACarry,
    AndBCarry,
}

impl AuxiliaryGate {
    const ALL: [AuxiliaryGate; AUXILIARY_VARIABLES_PER_STAGE] = [
        AuxiliaryGate::XorAB,
        AuxiliaryGate::AndAB,
        AuxiliaryGate::AndACarry,
        AuxiliaryGate::AndBCarry,
    ];

    const fn offset(self) -> usize {
        match self {
            AuxiliaryGate::XorAB => 0,
            AuxiliaryGate::AndAB => 1,
            AuxiliaryGate::AndACarry => 2,
            AuxiliaryGate::AndBCarry => 3,
        }
    }
}

/// The single role a variable plays in the circuit.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum VariableKind {
    Sum { bit: usize },
    Carry { bit: usize },
    OperandBit { operand: Operand, bit: usize },
    Auxiliary { stage: usize, gate: AuxiliaryGate },
}

/// Everything one full-adder stage is wired from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageVariables {
    pub a: Variable,
    pub b: Variable,
    pub carry_in: Variable,
    pub sum: Variable,
    pub carry_out: Variable,
    pub xor_ab: Variable,
    pub and_ab: Variable,
    pub and_a_carry: Variable,
    pub and_b_carry: Variable,
}

#[derive(Clone, Debug)]
pub struct VariableAllocator {
    a_width: usize,
    b_width: usize,
    max_bits: usize,
}

impl VariableAllocator {
    pub fn new(a_width: usize, b_width: usize) -> Result<Self, AdderError> {
        for (operand, width) in [(Operand::A, a_width), (Operand::B, b_width)].iter().copied() {
            if width == 0 {
                return Err(AdderError::InvalidWidth { operand, width });
            }
        }

        let max_bits = a_width
            .max(b_width)
            .checked_add(1)
            .ok_or(AdderError::TooManyVariables {
                max_bits: usize::MAX,
            })?;
        let variable_count = max_bits
            .checked_mul(VARIABLES_PER_STAGE)
            .and_then(|count| count.checked_add(1));
        match variable_count {
            Some(count) if count <= Variable::MAX_INDEX as usize => (),
            _ => return Err(AdderError::TooManyVariables { max_bits }),
        }

        Ok(Self {
            a_width,
            b_width,
            max_bits,
        })
    }

    pub fn width(&self, operand: Operand) -> usize {
        match operand {
            Operand::A => self.a_width,
            Operand::B => self.b_width,
        }
    }

    /// The number of full-adder stages, one more than the wider operand.
    pub fn max_bits(&self) -> usize {
        self.max_bits
    }

    pub fn variable_count(&self) -> usize {
        self.max_bits * VARIABLES_PER_STAGE + 1
    }

    fn sum_base(&self) -> usize {
        1
    }

    fn carry_base(&self) -> usize {
        self.sum_base() + self.max_bits
    }

    fn operand_base(&self) -> usize {
        self.carry_base() + self.max_bits + 1
    }

    fn auxiliary_base(&self) -> usize {
        self.operand_base() + 2 * self.max_bits
    }

    fn at(&self, index: usize) -> Variable {
        // `new` checked that every index up to `variable_count` is representable.
        Variable::from_index(index as u32).unwrap()
    }

    /// The variable that plays `kind`, or `None` if `kind` is out of range for this circuit.
    pub fn variable(&self, kind: VariableKind) -> Option<Variable> {
        let index = match kind {
            VariableKind::Sum { bit } if bit < self.max_bits => self.sum_base() + bit,
            VariableKind::Carry { bit } if bit <= self.max_bits => self.carry_base() + bit,
            VariableKind::OperandBit { operand, bit } if bit < self.max_bits => {
                let lane = match operand {
                    Operand::A => 0,
                    Operand::B => 1,
                };
                self.operand_base() + 2 * bit + lane
            }
            VariableKind::Auxiliary { stage, gate } if stage < self.max_bits => {
                self.auxiliary_base() + AUXILIARY_VARIABLES_PER_STAGE * stage + gate.offset()
            }
            _ => return None,
        };
        Some(self.at(index))
    }

    /// The role of `variable`, or `None` if this circuit never allocated it.
    pub fn kind_of(&self, variable: Variable) -> Option<VariableKind> {
        let index = variable.index() as usize;
        if index > self.variable_count() {
            None
        } else if index >= self.auxiliary_base() {
            let offset = index - self.auxiliary_base();
            Some(VariableKind::Auxiliary {
                stage: offset / AUXILIARY_VARIABLES_PER_STAGE,
                gate: AuxiliaryGate::ALL[offset % AUXILIARY_VARIABLES_PER_STAGE],
            })
        } else if index >= self.operand_base() {
            let offset = index - self.operand_base();
            let operand = if offset % 2 == 0 {
                Operand::A
            } else {
                Operand::B
            };
            Some(VariableKind::OperandBit {
                operand,
                bit: offset / 2,
            })
        } else if index >= self.carry_base() {
            Some(VariableKind::Carry {
                bit: index - self.carry_base(),
            })
        } else {
            Some(VariableKind::Sum {
                bit: index - self.sum_base(),
            })
        }
    }

    /// The handles for stage `stage`.
    ///
    /// # Panics
    ///
    /// Panics if `stage >= self.max_bits()`.
    pub fn stage(&self, stage: usize) -> StageVariables {
        assert!(
            stage < self.max_bits,
            "stage {} of a {}-stage adder",
            stage,
            self.max_bits
        );
        let auxiliary = |gate: AuxiliaryGate| {
            self.at(self.auxiliary_base() + AUXILIARY_VARIABLES_PER_STAGE * stage + gate.offset())
        };
        StageVariables {
            a: self.at(self.operand_base() + 2 * stage),
            b: self.at(self.operand_base() + 2 * stage + 1),
            carry_in: self.at(self.carry_base() + stage),
            sum: self.at(self.sum_base() + stage),
            carry_out: self.at(self.carry_base() + stage + 1),
            xor_ab: auxiliary(AuxiliaryGate::XorAB),
            and_ab: auxiliary(AuxiliaryGate::AndAB),
            and_a_carry: auxiliary(AuxiliaryGate::AndACarry),
            and_b_carry: auxiliary(AuxiliaryGate::AndBCarry),
        }
    }

    pub fn stages(&self) -> impl Iterator<Item = StageVariables> + '_ {
        (0..self.max_bits).map(move |stage| self.stage(stage))
    }

    pub fn carry_in_zero(&self) -> Variable {
        self.at(self.carry_base())
    }

    pub fn carry_out(&self) -> Variable {
        self.at(self.carry_base() + self.max_bits)
    }

    /// Sum bits, least significant first.
    pub fn sum_variables(&self) -> Vec<Variable> {
        (0..self.max_bits)
            .map(|bit| self.at(self.sum_base() + bit))
            .collect()
    }

    /// One bit per stage, least significant first, including the zero-extended stages.
    pub fn operand_variables(&self, operand: Operand) -> Vec<Variable> {
        self.stages()
            .map(|stage| match operand {
                Operand::A => stage.a,
                Operand::B => stage.b,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{AuxiliaryGate, VariableAllocator, VariableKind};
    use crate::error::{AdderError, Operand};
    use crate::formula_builder::Variable;

    #[test]
    fn rejects_zero_width() {
        assert!(matches!(
            VariableAllocator::new(0, 4),
            Err(AdderError::InvalidWidth {
                operand: Operand::A,
                width: 0
            })
        ));
        assert!(matches!(
            VariableAllocator::new(3, 0),
            Err(AdderError::InvalidWidth {
                operand: Operand::B,
                width: 0
            })
        ));
    }

    #[test]
    fn rejects_widths_beyond_dimacs_range() {
        assert!(matches!(
            VariableAllocator::new(1, 1 << 28),
            Err(AdderError::TooManyVariables { .. })
        ));
        assert!(matches!(
            VariableAllocator::new(usize::MAX, 1),
            Err(AdderError::TooManyVariables { .. })
        ));
    }

    #[test]
    fn layout_of_three_by_four() {
        let allocator = VariableAllocator::new(3, 4).unwrap();
        assert_eq!(5, allocator.max_bits());
        assert_eq!(41, allocator.variable_count());

        // Sum 1..=5, carry 6..=11, operands 12..=21, auxiliaries 22..=41.
        let stage = allocator.stage(0);
        assert_eq!(1, stage.sum.index());
        assert_eq!(6, stage.carry_in.index());
        assert_eq!(7, stage.carry_out.index());
        assert_eq!(12, stage.a.index());
        assert_eq!(13, stage.b.index());
        assert_eq!(22, stage.xor_ab.index());
        assert_eq!(25, stage.and_b_carry.index());

        let last = allocator.stage(4);
        assert_eq!(5, last.sum.index());
        assert_eq!(11, last.carry_out.index());
        assert_eq!(21, last.b.index());
        assert_eq!(41, last.and_b_carry.index());

        assert_eq!(allocator.carry_in_zero(), stage.carry_in);
        assert_eq!(allocator.carry_out(), last.carry_out);
    }

    #[test]
    fn stages_chain_carries() {
        let allocator = VariableAllocator::new(6, 2).unwrap();
        let stages: Vec<_> = allocator.stages().collect();
        assert_eq!(7, stages.len());
        for pair in stages.windows(2) {
            assert_eq!(pair[0].carry_out, pair[1].carry_in);
        }
    }

    #[test]
    fn every_variable_has_exactly_one_role() {
        for &(n, m) in &[(1, 1), (3, 4), (8, 2), (5, 5)] {
            let allocator = VariableAllocator::new(n, m).unwrap();
            let mut roles: HashMap<Variable, VariableKind> = HashMap::new();

            let mut kinds = Vec::new();
            for bit in 0..allocator.max_bits() {
                kinds.push(VariableKind::Sum { bit });
                kinds.push(VariableKind::OperandBit {
                    operand: Operand::A,
                    bit,
                });
                kinds.push(VariableKind::OperandBit {
                    operand: Operand::B,
                    bit,
                });
                for gate in AuxiliaryGate::ALL.iter().copied() {
                    kinds.push(VariableKind::Auxiliary { stage: bit, gate });
                }
            }
            for bit in 0..=allocator.max_bits() {
                kinds.push(VariableKind::Carry { bit });
            }

            for kind in kinds {
                let variable = allocator.variable(kind).unwrap();
                assert!(roles.insert(variable, kind).is_none(), "{:?} reused", variable);
                assert_eq!(Some(kind), allocator.kind_of(variable));
            }
            assert_eq!(allocator.variable_count(), roles.len());
            assert!(roles
                .keys()
                .all(|v| v.index() >= 1 && v.index() as usize <= allocator.variable_count()));
        }
    }

    #[test]
    fn out_of_range_kinds() {
        let allocator = VariableAllocator::new(2, 2).unwrap();
        assert_eq!(None, allocator.variable(VariableKind::Sum { bit: 3 }));
        assert!(allocator.variable(VariableKind::Carry { bit: 3 }).is_some());
        assert_eq!(None, allocator.variable(VariableKind::Carry { bit: 4 }));
        assert_eq!(None, allocator.kind_of(Variable::from_index(26).unwrap()));
    }

    #[test]
    #[should_panic]
    fn stage_past_the_end() {
        VariableAllocator::new(2, 2).unwrap().stage(3);
    }
}

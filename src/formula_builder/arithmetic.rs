use crate::allocator::StageVariables;
use crate::formula_builder::GateFormulaBuilder;

/// Clauses contributed by one full adder: two XORs, three ANDs and a three-input OR.
pub const FULL_ADDER_CLAUSES: usize = 2 * 4 + 3 * 3 + 4;

pub trait ArithmeticFormulaBuilder: GateFormulaBuilder {
    fn add_full_adder_constraint(&mut self, stage: &StageVariables) {
        // a ----->[XOR]--- a^b --->[XOR]-------------------> sum
        // b ----->[   ]      cin ->[   ]
        //
        // a, b ---------->[AND]-- a&b ----->[OR ]----------> carry_out
        // a, cin -------->[AND]-- a&cin --->[   ]
        // b, cin -------->[AND]-- b&cin --->[   ]
        let a = stage.a.as_positive();
        let b = stage.b.as_positive();
        let carry_in = stage.carry_in.as_positive();
        let xor_ab = stage.xor_ab.as_positive();
        let and_ab = stage.and_ab.as_positive();
        let and_a_carry = stage.and_a_carry.as_positive();
        let and_b_carry = stage.and_b_carry.as_positive();

        self.add_logical_xor_constraint(xor_ab, a, b);
        self.add_logical_xor_constraint(stage.sum.as_positive(), xor_ab, carry_in);
        self.add_logical_and_constraint(and_ab, &[a, b]);
        self.add_logical_and_constraint(and_a_carry, &[a, carry_in]);
        self.add_logical_and_constraint(and_b_carry, &[b, carry_in]);
        self.add_logical_or_constraint(
            stage.carry_out.as_positive(),
            &[and_ab, and_a_carry, and_b_carry],
        );
    }
}

impl<T> ArithmeticFormulaBuilder for T where T: GateFormulaBuilder {}

use std::fmt;
use std::num::NonZeroI32;
use std::ops::Neg;

use crate::formula_builder::Variable;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Literal(NonZeroI32);

impl Literal {
    pub const fn new(variable: Variable, polarity: bool) -> Self {
        // `Variable` guarantees an index in `1..=i32::MAX`, so neither sign can overflow.
        let index = variable.index() as i32;
        let value = if polarity { index } else { -index };
        // SAFETY: `value` is nonzero because `index` is positive.
        Self(unsafe { NonZeroI32::new_unchecked(value) })
    }

    /// Reads a literal as written in DIMACS. Returns `None` for `i32::MIN`, whose magnitude is not
    /// a valid variable index.
    pub const fn from_index(index: NonZeroI32) -> Option<Self> {
        if index.get() == i32::MIN {
            None
        } else {
            Some(Self(index))
        }
    }

    pub const fn index(self) -> NonZeroI32 {
        self.0
    }

    pub fn variable(self) -> Variable {
        // `unsigned_abs` of a nonzero value other than `i32::MIN` is in `1..=i32::MAX`.
        match Variable::from_index(self.0.get().unsigned_abs()) {
            Some(variable) => variable,
            None => unreachable!(),
        }
    }

    pub const fn is_positive(self) -> bool {
        self.0.get() > 0
    }

    pub const fn negated(self) -> Self {
        let result = -self.0.get();
        // SAFETY: `result` is nonzero and is not i32::MIN.
        Self(unsafe { NonZeroI32::new_unchecked(result) })
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self {
        self.negated()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroI32;

    use super::Literal;
    use crate::formula_builder::Variable;

    #[test]
    fn polarity_and_negation() {
        let v = Variable::from_index(7).unwrap();
        assert_eq!(7, v.as_positive().index().get());
        assert_eq!(-7, v.as_negative().index().get());
        assert_eq!(v.as_negative(), -v.as_positive());
        assert_eq!(v, v.as_negative().variable());
        assert!(!v.as_negative().is_positive());
    }

    #[test]
    fn rejects_unrepresentable_indices() {
        assert!(Variable::from_index(0).is_none());
        assert!(Variable::from_index(Variable::MAX_INDEX + 1).is_none());
        assert!(Literal::from_index(NonZeroI32::new(i32::MIN).unwrap()).is_none());

        let highest = Variable::from_index(Variable::MAX_INDEX).unwrap();
        assert_eq!(-i32::MAX, highest.as_negative().index().get());
    }
}

use std::fmt;
use std::num::NonZeroU32;

use crate::formula_builder::Literal;

/// A propositional variable. The index is always in `1..=i32::MAX` so that both of its literals
/// can be represented as DIMACS integers.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_INDEX: u32 = i32::MAX as u32;

    pub const fn from_index(index: u32) -> Option<Self> {
        if index > 0 && index <= Self::MAX_INDEX {
            // SAFETY: `index` is nonzero.
            Some(Self(unsafe { NonZeroU32::new_unchecked(index) }))
        } else {
            None
        }
    }

    pub const fn index(self) -> u32 {
        self.0.get()
    }

    pub const fn as_literal(self, polarity: bool) -> Literal {
        Literal::new(self, polarity)
    }

    pub const fn as_positive(self) -> Literal {
        Literal::new(self, true)
    }

    pub const fn as_negative(self) -> Literal {
        Literal::new(self, false)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

use std::fmt;
use std::io;

use thiserror::Error;

/// One of the two addends.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operand {
    A,
    B,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::A => write!(f, "A"),
            Operand::B => write!(f, "B"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AdderError {
    #[error("operand {operand} has width {width}; widths must be at least 1")]
    InvalidWidth { operand: Operand, width: usize },

    #[error("operand {operand} has a {pattern_len}-bit pattern but a declared width of {width}")]
    BitPatternTooLong {
        operand: Operand,
        pattern_len: usize,
        width: usize,
    },

    #[error("a {max_bits}-stage adder needs more variables than DIMACS can number")]
    TooManyVariables { max_bits: usize },

    #[error("failed to write the formula")]
    SinkWrite(#[from] io::Error),
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An unsigned operand value as a sequence of bits, most significant bit first.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct BitPattern(Vec<bool>);

impl BitPattern {
    pub fn from_msb_first(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// The low `width` bits of `value`.
    pub fn from_u64(value: u64, width: usize) -> Self {
        Self(
            (0..width)
                .rev()
                .map(|bit| bit < 64 && (value >> bit) & 1 == 1)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn msb_first(&self) -> &[bool] {
        &self.0
    }

    /// The bit of weight `2^position`, or `None` past the most significant bit.
    pub fn bit_from_lsb(&self, position: usize) -> Option<bool> {
        if position < self.0.len() {
            Some(self.0[self.0.len() - 1 - position])
        } else {
            None
        }
    }

    /// The value, if it fits in a `u128`.
    pub fn to_u128(&self) -> Option<u128> {
        let mut value: u128 = 0;
        for bit in self.0.iter().copied() {
            value = value.checked_mul(2)? | bit as u128;
        }
        Some(value)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BitPatternParseError {
    #[error("bit pattern is empty")]
    Empty,

    #[error("bit pattern contains {0:?}; only 0 and 1 are allowed")]
    InvalidDigit(char),
}

impl FromStr for BitPattern {
    type Err = BitPatternParseError;

    fn from_str(s: &str) -> Result<Self, BitPatternParseError> {
        if s.is_empty() {
            return Err(BitPatternParseError::Empty);
        }
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                c => Err(BitPatternParseError::InvalidDigit(c)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter() {
            write!(f, "{}", if *bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

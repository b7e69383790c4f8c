//! Compiles the addition of two fixed-width unsigned integers into a CNF formula, built from a
//! ripple-carry chain of Tseitin-encoded full adders, and writes it as DIMACS CNF.

pub mod adder;
pub mod allocator;
pub mod bit_pattern;
mod error;
pub mod formula_builder;
pub mod sat_solver;
pub mod solution;

pub use adder::{compile_adder, AdderParameters, CircuitShape, CompiledAdder};
pub use bit_pattern::BitPattern;
pub use error::{AdderError, Operand};

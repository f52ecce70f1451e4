//! Metra Core - Fundamental types
//!
//! This crate provides the numeric and algebraic foundations used throughout
//! Metra:
//! - `Rational`: arbitrary-precision fractions, always reduced
//! - `Factorization`: a formal product of items raised to integer exponents
//! - `NumberFormat`: magnitude-aware decimal rendering of rationals

mod factorization;
mod format;
mod rational;

pub use factorization::Factorization;
pub use format::NumberFormat;
pub use rational::{ArithmeticError, Rational, RoundingMode};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ArithmeticError, Factorization, NumberFormat, Rational, RoundingMode};
}

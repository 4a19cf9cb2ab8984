//! # Linear algebra primitives
//!
//! Dense exact matrices, and the elimination routines used to reason about their rank.
use num::{BigInt, BigRational};

pub mod elimination;
pub mod matrix;

/// Tolerance used when floating point model data is read as integer data.
pub const EPSILON: f64 = 1e-9;

/// Exact conversion of an integer vector to a rational one.
pub fn to_rational(vector: &[BigInt]) -> Vec<BigRational> {
    vector.iter().cloned().map(BigRational::from_integer).collect()
}

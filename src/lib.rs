//! # Lattice representations of integer programs
//!
//! Integer programs are brought into the equality form `Ax = b`, their variables are classified as
//! bounded, unbounded or free and grouped accordingly, and the integer solutions of the equality
//! system are described as a translated lattice: a particular integer solution plus the integer
//! kernel of `A`, computed exactly through a Hermite normal form.
//!
//! From such an instance, relaxations and projections are derived as new instances, with the help
//! of a linear programming oracle. A reference oracle based on an exact simplex method is
//! included.
#![warn(missing_docs)]

pub mod algorithm;
pub mod config;
pub mod data;
pub mod error;

#[cfg(test)]
mod tests;

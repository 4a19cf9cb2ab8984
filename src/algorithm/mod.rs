//! # Algorithms
//!
//! Everything that computes something from an instance: the classification of its variables, its
//! lattice, the oracle answering questions about its relaxation and the instances derived from it.
pub mod classification;
pub mod lattice;
pub mod oracle;
pub mod relaxation;

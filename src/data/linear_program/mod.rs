//! # Representing integer programs
//!
//! A program enters either as raw matrix data or through a model, and ends up as an instance in
//! equality form with classified and grouped variables.
pub mod elements;
pub mod extract;
pub mod instance;
pub mod model;
pub mod normalize;
pub mod permutation;
pub mod problem;

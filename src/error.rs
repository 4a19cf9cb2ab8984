//! # Error reporting
//!
//! Failures that a caller can act on are values of the `Error` type. Violations of structural
//! contracts (a permutation that is not a bijection, a lattice basis that is not orthogonal to the
//! constraint matrix, an optimal basis of the wrong size) are bugs, and cause a panic instead.
//!
//! Heuristics that turn out not to be applicable, such as the search for a truncation weight when
//! the oracle reports unboundedness, don't produce an error either: they return a sentinel value
//! (`None` or a zero vector) that tells the caller to fall back.
use thiserror::Error;

use crate::algorithm::oracle::OracleError;

/// Everything that can go wrong while building or deriving an instance.
#[derive(Debug, Error)]
pub enum Error {
    /// The model could not be interpreted as an integer program.
    ///
    /// For example, a term refers to a variable that the model doesn't know, or a coefficient is
    /// not integral.
    #[error("malformed model: {0}")]
    MalformedModel(String),
    /// Dimensions of the provided data don't agree with each other.
    #[error("inconsistent dimensions: {0}")]
    Dimension(String),
    /// The linear relaxation of the problem has no feasible point.
    ///
    /// Every instance should remain feasible, so construction fails fast.
    #[error("the linear relaxation is infeasible")]
    InfeasibleRelaxation,
    /// The linear relaxation has no finite optimum, so no optimal basis exists.
    #[error("the linear relaxation is unbounded")]
    UnboundedRelaxation,
    /// The equality system `Ax = b` has no integer solution at all.
    #[error("the system Ax = b has no integer solution")]
    NoIntegerSolution,
    /// No objective vanishing on the requested variables induces the requested lattice functional.
    #[error("no objective vanishing on the given variables is compatible with variable {target}")]
    IncompatibleObjective {
        /// Variable whose negation the objective should induce on the lattice.
        target: usize,
    },
    /// The oracle failed in a way that is not a regular solution status.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

//! # Configuration
//!
//! Options that determine how instances are built, and how the reference oracle searches.
use crate::data::linear_algebra::EPSILON;

/// Options used when building an instance from raw data or from a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Whether the raw data is in inequality form `Ax <= b, x <= u` and should be normalized to
    /// equality form.
    ///
    /// Data extracted from a model is always in equality form already, this option is ignored
    /// there.
    pub apply_normalization: bool,
    /// Whether normalization negates the objective, turning a maximization problem into the
    /// minimization problem that all downstream logic assumes.
    pub invert_objective: bool,
    /// Whether variables marked binary in a model get an explicit upper bound of one.
    pub infer_binary: bool,
    /// How boundedness of a variable is decided.
    pub boundedness: BoundednessTest,
    /// How far a model value may be from the nearest integer and still be read as that integer.
    pub tolerance: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            apply_normalization: true,
            invert_objective: true,
            infer_binary: true,
            boundedness: BoundednessTest::Relaxation,
            tolerance: EPSILON,
        }
    }
}

/// The two ways of deciding whether a variable is bounded.
///
/// They should agree on regular inputs, but nothing guarantees that they do on degenerate ones.
/// They are therefore treated as separate queries and never mixed within a single classification.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BoundednessTest {
    /// Maximize the variable over the linear relaxation; bounded if the optimum is finite.
    #[default]
    Relaxation,
    /// Search for an integer direction `d` with `Ad = 0`, `d` nonnegative on the nonnegative
    /// variables and `d_i > 0`; bounded if no such direction exists.
    UnboundedRay,
}

/// Options of the reference oracle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OracleOptions {
    /// Maximum number of branch and bound nodes solved for a single integer query.
    pub node_limit: usize,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self { node_limit: 10_000 }
    }
}

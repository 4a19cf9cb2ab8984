//! # Tests that require a look inside the crate.
//!
//! Convention for function names in the problem modules:
//!
//! * `fn problem()`: the raw data, before normalization and classification
//! * `fn instance()`: the instance built from that data
//!
//! Problems are small enough for every lattice and classification result to be verified by hand.
use num::{BigInt, BigRational};
use num_traits::Zero;

use crate::algorithm::oracle::{IntegerResult, LinearProgram, Optimum, Oracle, OracleError, RelaxationResult};
use crate::config::Options;


/// Options for data that is in equality form already.
pub fn equality_form() -> Options {
    Options { apply_normalization: false, ..Options::default() }
}

/// Oracle that claims every relaxation has an optimum with the same basis.
///
/// Every variable is bounded and every instance is feasible according to this oracle, which makes
/// it possible to check how contract violations are handled.
#[derive(Debug, Clone)]
pub struct ScriptedOracle {
    basis: Vec<bool>,
}

impl ScriptedOracle {
    pub fn new(basis: Vec<bool>) -> Self {
        Self { basis }
    }
}

impl Oracle for ScriptedOracle {
    fn solve_relaxation(&mut self, problem: &LinearProgram) -> RelaxationResult {
        let basis = if self.basis.len() == problem.nr_columns() {
            self.basis.clone()
        } else {
            vec![false; problem.nr_columns()]
        };

        RelaxationResult::FiniteOptimum(Optimum {
            value: BigRational::zero(),
            solution: vec![BigRational::zero(); problem.nr_columns()],
            basis,
            duals: vec![BigRational::zero(); problem.nr_rows()],
        })
    }

    fn solve_integer(&mut self, _problem: &LinearProgram) -> Result<IntegerResult, OracleError> {
        Ok(IntegerResult::infeasible())
    }
}

/// Small integers as arbitrary precision integers.
pub fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|&v| BigInt::from(v)).collect()
}

//! # Variable classification
//!
//! Each variable is nonnegative or free, and bounded or unbounded from above over the linear
//! relaxation. The variables of an instance are grouped by these properties in the order
//!
//! ```text
//! | nonnegative, bounded | nonnegative, unbounded | free |
//! ```
//!
//! which several relaxation identities rely on.
use cumsum::cumsum_array_owned;
use enum_map::{EnumMap, enum_map};
use log::{debug, trace};
use num::{BigInt, BigRational};
use num_traits::{One, Zero};

use crate::algorithm::oracle::{IntegerStatus, LinearProgram, Oracle, RelaxationResult};
use crate::config::BoundednessTest;
use crate::data::linear_program::elements::{VariableClass, VariableType};
use crate::data::linear_program::permutation::Permutation;
use crate::data::linear_program::problem::RawProblem;
use crate::error::Error;

/// Decide for every variable whether it is bounded from above.
///
/// # Return value
///
/// One flag per variable, in the order of the problem.
///
/// # Errors
///
/// `InfeasibleRelaxation` if the relaxation test finds that there are no feasible points, or an
/// oracle error from the ray test.
pub fn classify(
    oracle: &mut impl Oracle,
    problem: &RawProblem,
    test: BoundednessTest,
) -> Result<Vec<bool>, Error> {
    let bounded = (0..problem.nr_columns())
        .map(|variable| is_bounded(oracle, problem, variable, test))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "{} out of {} variables are bounded ({test:?} test)",
        bounded.iter().filter(|&&bounded| bounded).count(), bounded.len(),
    );

    Ok(bounded)
}

/// Decide whether a single variable is bounded from above.
///
/// A variable with an explicit upper bound is bounded without asking the oracle.
pub fn is_bounded(
    oracle: &mut impl Oracle,
    problem: &RawProblem,
    variable: usize,
    test: BoundednessTest,
) -> Result<bool, Error> {
    if problem.u[variable].is_some() {
        return Ok(true);
    }

    let n = problem.nr_columns();
    let bounded = match test {
        BoundednessTest::Relaxation => {
            let mut cost = vec![BigRational::zero(); n];
            cost[variable] = -BigRational::one();
            let program = LinearProgram::equality_form(
                &problem.a, &problem.b, &cost, &problem.u, &problem.nonnegative, vec![VariableType::Continuous; n],
            );

            match oracle.solve_relaxation(&program) {
                RelaxationResult::Infeasible => return Err(Error::InfeasibleRelaxation),
                RelaxationResult::Unbounded => false,
                RelaxationResult::FiniteOptimum(_) => true,
            }
        },
        BoundednessTest::UnboundedRay => {
            // Directions d with Ad = 0 that keep every nonnegative variable nonnegative, don't
            // increase any variable with an upper bound, and increase this variable. Coordinates of
            // integer variables are integral.
            let zero_b = vec![BigInt::zero(); problem.nr_rows()];
            let zero_cost = vec![BigRational::zero(); n];
            let mut program = LinearProgram::equality_form(
                &problem.a, &zero_b, &zero_cost, &vec![None; n], &problem.nonnegative, problem.variable_types.clone(),
            );
            for (j, upper) in problem.u.iter().enumerate() {
                if upper.is_some() {
                    program.upper[j] = Some(BigRational::zero());
                }
            }
            program.lower[variable] = Some(BigRational::one());

            oracle.solve_integer(&program)?.status == IntegerStatus::Infeasible
        },
    };
    trace!("Variable {variable} is {}", if bounded { "bounded" } else { "unbounded" });

    Ok(bounded)
}

/// Compute the permutation that groups the variables by class.
///
/// Within each group, variables keep the order they have in the data that is classified.
///
/// # Arguments
///
/// * `nonnegative`: Sign restriction per variable.
/// * `bounded`: Boundedness per variable.
///
/// # Return value
///
/// The permutation, and the exclusive end of each group in the new order.
pub fn group(
    nonnegative: &[bool],
    bounded: &[bool],
) -> (Permutation, EnumMap<VariableClass, usize>) {
    debug_assert_eq!(nonnegative.len(), bounded.len());

    let classes = nonnegative.iter().zip(bounded)
        .map(|(&nonnegative, &bounded)| VariableClass::of(nonnegative, bounded))
        .collect::<Vec<_>>();
    let mut counts = EnumMap::<VariableClass, usize>::default();
    for &class in &classes {
        counts[class] += 1;
    }

    let cumulative = cumsum_array_owned([
        counts[VariableClass::Bounded],
        counts[VariableClass::Unbounded],
        counts[VariableClass::Free],
    ]);
    let group_end = enum_map!{
        VariableClass::Bounded   => cumulative[0],
        VariableClass::Unbounded => cumulative[1],
        VariableClass::Free      => cumulative[2],
    };
    let mut next = enum_map!{
        VariableClass::Bounded   => 0,
        VariableClass::Unbounded => group_end[VariableClass::Bounded],
        VariableClass::Free      => group_end[VariableClass::Unbounded],
    };

    let forward = classes.iter()
        .map(|&class| {
            let position = next[class];
            next[class] += 1;
            position
        })
        .collect();

    (Permutation::new(forward), group_end)
}

//! # Branch and bound
//!
//! Depth first search over the bounds of the integer variables, using the exact simplex method for
//! the relaxations. Only meant for the small auxiliary programs that boundedness tests produce.
use log::{debug, trace};
use num::BigRational;
use num_traits::Zero;

use crate::algorithm::oracle::{IntegerResult, IntegerStatus, LinearProgram, OracleError, RelaxationResult};
use crate::algorithm::oracle::simplex;
use crate::data::linear_program::elements::VariableType;

/// Solve an integer program.
///
/// # Arguments
///
/// * `problem`: Program with integrality requirements in its variable types.
/// * `node_limit`: Maximum number of relaxations solved per search.
///
/// # Return value
///
/// When the relaxation is unbounded, the program is unbounded exactly when it has an integer
/// point, which is then searched for with a zero objective. If that search exceeds the node limit,
/// the status is `DualInfeasible`.
pub fn solve(problem: &LinearProgram, node_limit: usize) -> Result<IntegerResult, OracleError> {
    match simplex::solve(problem) {
        RelaxationResult::Infeasible => Ok(IntegerResult::infeasible()),
        RelaxationResult::Unbounded => {
            let zero_cost = vec![BigRational::zero(); problem.nr_columns()];
            let feasibility = problem.clone().with_cost(zero_cost);
            match search(&feasibility, node_limit) {
                Ok(Some((solution, _))) => Ok(IntegerResult {
                    status: IntegerStatus::Unbounded,
                    solution: Some(solution),
                    value: None,
                }),
                Ok(None) => Ok(IntegerResult::infeasible()),
                Err(OracleError::NodeLimit(_)) => Ok(IntegerResult {
                    status: IntegerStatus::DualInfeasible,
                    solution: None,
                    value: None,
                }),
                Err(error) => Err(error),
            }
        },
        RelaxationResult::FiniteOptimum(_) => Ok(match search(problem, node_limit)? {
            Some((solution, value)) => IntegerResult {
                status: IntegerStatus::Optimal,
                solution: Some(solution),
                value: Some(value),
            },
            None => IntegerResult::infeasible(),
        }),
    }
}

/// Bounds of the subproblem that a node represents.
struct Node {
    lower: Vec<Option<BigRational>>,
    upper: Vec<Option<BigRational>>,
}

/// Depth first search for an optimal integer point.
///
/// Should only be called on programs whose relaxation is bounded, which then holds for all
/// subproblems as well.
fn search(
    problem: &LinearProgram,
    node_limit: usize,
) -> Result<Option<(Vec<BigRational>, BigRational)>, OracleError> {
    let mut incumbent: Option<(Vec<BigRational>, BigRational)> = None;
    let mut stack = vec![Node { lower: problem.lower.clone(), upper: problem.upper.clone() }];
    let mut nr_nodes = 0;

    while let Some(node) = stack.pop() {
        nr_nodes += 1;
        if nr_nodes > node_limit {
            debug!("Branch and bound gave up after {node_limit} nodes");
            return Err(OracleError::NodeLimit(node_limit));
        }

        let mut subproblem = problem.clone();
        subproblem.lower = node.lower;
        subproblem.upper = node.upper;
        let optimum = match simplex::solve(&subproblem) {
            RelaxationResult::FiniteOptimum(optimum) => optimum,
            RelaxationResult::Infeasible | RelaxationResult::Unbounded => continue,
        };
        if let Some((_, best)) = &incumbent {
            if optimum.value >= *best {
                continue;
            }
        }

        let fractional = optimum.solution.iter().zip(&problem.variable_types)
            .position(|(value, variable_type)| {
                *variable_type == VariableType::Integer && !value.is_integer()
            });
        match fractional {
            None => {
                trace!("New incumbent with value {}", optimum.value);
                incumbent = Some((optimum.solution, optimum.value));
            },
            Some(j) => {
                let value = &optimum.solution[j];
                trace!("Branching on variable {j} with value {value}");

                let mut up = Node { lower: subproblem.lower.clone(), upper: subproblem.upper.clone() };
                up.lower[j] = Some(value.ceil());
                let mut down = Node { lower: subproblem.lower, upper: subproblem.upper };
                down.upper[j] = Some(value.floor());

                stack.push(up);
                stack.push(down);
            },
        }
    }

    debug!("Branch and bound finished after {nr_nodes} nodes");
    Ok(incumbent)
}

#[cfg(test)]
mod test {
    use num::{BigInt, BigRational};

    use crate::algorithm::oracle::{IntegerStatus, LinearProgram, OracleError};
    use crate::algorithm::oracle::branch_and_bound::solve;
    use crate::data::linear_algebra::matrix::IntegerMatrix;
    use crate::data::linear_program::elements::{ConstraintRelation, VariableType};

    fn r(value: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(value))
    }

    fn equality(a: &[Vec<i64>], b: &[i64], cost: &[i64], lower: Option<i64>) -> LinearProgram {
        let n = cost.len();
        LinearProgram::new(
            IntegerMatrix::from_i64(a, n).to_rational(),
            vec![ConstraintRelation::Equal; a.len()],
            b.iter().map(|&v| r(v)).collect(),
            cost.iter().map(|&v| r(v)).collect(),
            vec![lower.map(r); n],
            vec![None; n],
            vec![VariableType::Integer; n],
        )
    }

    #[test]
    fn knapsack() {
        // max 5x + 4y s.t. 6x + 4y + s = 9, all nonnegative integer
        let problem = equality(&[vec![6, 4, 1]], &[9], &[-5, -4, 0], Some(0));
        let result = solve(&problem, 100).unwrap();
        assert_eq!(result.status, IntegerStatus::Optimal);
        assert_eq!(result.value, Some(r(-8)));
        assert_eq!(result.solution, Some(vec![r(0), r(2), r(1)]));
    }

    #[test]
    fn no_integer_point() {
        // 2x = 1 has a fractional solution only
        let problem = equality(&[vec![2]], &[1], &[0], Some(0));
        assert_eq!(solve(&problem, 100).unwrap().status, IntegerStatus::Infeasible);
    }

    #[test]
    fn unbounded() {
        // x - y = 0 with x arbitrarily large
        let problem = equality(&[vec![1, -1]], &[0], &[-1, 0], Some(0));
        let result = solve(&problem, 100).unwrap();
        assert_eq!(result.status, IntegerStatus::Unbounded);
        assert!(result.solution.is_some());

        // 2x - 2y = 1 is unbounded as a relaxation, but has no integer point, which an unbounded
        // search never proves
        let problem = equality(&[vec![2, -2]], &[1], &[-1, 0], Some(0));
        assert_eq!(solve(&problem, 100).unwrap().status, IntegerStatus::DualInfeasible);
    }

    #[test]
    fn node_limit() {
        let problem = equality(&[vec![6, 4, 1]], &[9], &[-5, -4, 0], Some(0));
        assert_eq!(solve(&problem, 1), Err(OracleError::NodeLimit(1)));
    }
}

//! # Normalization to equality form
//!
//! Hand built problems usually come as `Ax <= b, x <= u`. All other logic works on the equality
//! form `Ax = b`, with upper bounds present as constraint rows so that they are visible to the
//! lattice.
use log::debug;
use num::BigInt;
use num_traits::{One, Signed, Zero};

use crate::config::Options;
use crate::data::linear_algebra::matrix::{IntegerMatrix, RationalMatrix};
use crate::data::linear_program::problem::{RawProblem, slack_type};

/// Rewrite `Ax <= b, x <= u` as an equality system.
///
/// The result is
///
/// ```text
/// [ A  I  0 ] [x]   [b]
/// [ U  0  I ] [s] = [u]
///             [t]
/// ```
///
/// where `U` selects the variables with an upper bound. The bound rows are omitted entirely when no
/// variable has an upper bound. The objective is padded with zeros, and negated if requested. A
/// slack is an integer variable if its row only contains integer variables.
///
/// # Arguments
///
/// * `problem`: Data in inequality form.
/// * `options`: Whether to normalize at all, and whether to invert the objective.
///
/// # Return value
///
/// The problem in equality form, or the input itself if normalization is disabled.
pub fn normalize(problem: RawProblem, options: &Options) -> RawProblem {
    if !options.apply_normalization {
        return problem;
    }

    let (m, n) = (problem.nr_rows(), problem.nr_columns());
    let bounded = (0..n).filter(|&j| problem.u[j].is_some()).collect::<Vec<_>>();
    let k = bounded.len();
    let nr_columns = n + m + k;

    let mut a = IntegerMatrix::zeros(m + k, nr_columns);
    for i in 0..m {
        for (j, value) in problem.a.row(i).iter().enumerate() {
            a[(i, j)] = value.clone();
        }
        a[(i, n + i)] = BigInt::one();
    }
    for (t, &j) in bounded.iter().enumerate() {
        a[(m + t, j)] = BigInt::one();
        a[(m + t, n + m + t)] = BigInt::one();
    }

    let mut b = problem.b.clone();
    b.extend(bounded.iter().filter_map(|&j| problem.u[j].clone()));

    let c = RationalMatrix::new(
        problem.c.rows()
            .map(|row| {
                let mut padded = row.iter()
                    .map(|value| if options.invert_objective { -value } else { value.clone() })
                    .collect::<Vec<_>>();
                padded.resize(nr_columns, Zero::zero());
                padded
            })
            .collect(),
        nr_columns,
    );

    let mut u = problem.u.clone();
    u.extend((0..m).map(|i| row_slack_bound(problem.a.row(i), &problem.b[i], &problem.u, &problem.nonnegative)));
    u.extend(bounded.iter().map(|&j| if problem.nonnegative[j] { problem.u[j].clone() } else { None }));

    let mut nonnegative = problem.nonnegative.clone();
    nonnegative.resize(nr_columns, true);

    let mut variable_types = problem.variable_types.clone();
    variable_types.extend((0..m).map(|i| slack_type(problem.a.row(i), &problem.variable_types)));
    variable_types.extend(bounded.iter().map(|&j| problem.variable_types[j]));

    debug!("Normalized {m} constraints and {k} upper bounds into {} equality rows over {nr_columns} variables", m + k);

    RawProblem { a, b, c, u, nonnegative, variable_types }
}

/// Largest value the slack of a `<=` row can take.
///
/// The slack `s = b - ax` is largest when `ax` is smallest, which is known only if every variable
/// with a positive coefficient is nonnegative and every variable with a negative coefficient has
/// an upper bound.
fn row_slack_bound(
    row: &[BigInt],
    rhs: &BigInt,
    u: &[Option<BigInt>],
    nonnegative: &[bool],
) -> Option<BigInt> {
    let mut bound = rhs.clone();
    for ((coefficient, upper), &nonnegative) in row.iter().zip(u).zip(nonnegative) {
        if coefficient.is_positive() {
            if !nonnegative {
                return None;
            }
        } else if coefficient.is_negative() {
            bound -= coefficient * upper.as_ref()?;
        }
    }

    Some(bound)
}

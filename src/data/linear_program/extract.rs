//! # Extraction from a model
//!
//! Reads constraints, bounds and the objective of a `Model`, and writes them as an equality system
//! with integer data. Columns are ordered as the model variables, then one slack per inequality
//! constraint, then one slack per bound row. Rows are ordered as the model constraints, then the
//! bound rows.
use log::{debug, warn};
use num::{BigInt, BigRational};
use num_traits::{FromPrimitive, Signed, Zero};

use crate::config::Options;
use crate::data::linear_algebra::elimination::IndependentSet;
use crate::data::linear_algebra::matrix::{IntegerMatrix, RationalMatrix};
use crate::data::linear_algebra::to_rational;
use crate::data::linear_program::elements::{BoundDirection, ConstraintRelation, Objective};
use crate::data::linear_program::model::Model;
use crate::data::linear_program::problem::{RawProblem, slack_type};
use crate::error::Error;

/// Integer data read from a model.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Extraction {
    /// Equality form of the model, with a minimization objective.
    pub problem: RawProblem,
    /// Direction of optimization of the model.
    pub sense: Objective,
    /// Number of constraints in the model, before dependent equalities were dropped.
    pub nr_model_constraints: usize,
    /// Number of variables in the model.
    pub nr_model_variables: usize,
}

/// Extract the integer program of a model.
///
/// A lower bound of zero makes a variable nonnegative. Any other finite lower bound `l` results in
/// a row `x - s = l`, and an upper bound `u` results in a row `x + s = u`. Equality constraints
/// that are linear combinations of earlier equality constraints are dropped.
///
/// Variables keep the type they have in the model. Slacks of bound rows have the type of their
/// variable, slacks of constraints are integer if the constraint only contains integer variables.
///
/// # Errors
///
/// * `MalformedModel` if a term or bound refers to an unknown variable, or a value is not integral
///   within the tolerance.
/// * `InfeasibleRelaxation` if a dropped equality contradicts the equalities it depends on.
pub fn extract(model: &impl Model, options: &Options) -> Result<Extraction, Error> {
    let n = model.nr_variables();
    let tolerance = options.tolerance;

    let (lower, upper) = collect_bounds(model, options)?;

    let mut nr_model_constraints = 0;
    let mut coefficients = IndependentSet::new(n);
    let mut augmented = IndependentSet::new(n + 1);
    let mut rows = Vec::new();
    for (i, constraint) in model.constraints().enumerate() {
        nr_model_constraints += 1;

        let mut values = vec![0_f64; n];
        for (j, coefficient) in constraint.terms {
            if j >= n {
                return Err(Error::MalformedModel(format!("constraint {i} refers to unknown variable {j}")));
            }
            values[j] += coefficient;
        }
        let row = values.into_iter()
            .map(|value| to_integer(value, tolerance)
                .ok_or_else(|| Error::MalformedModel(format!("constraint {i} has coefficient {value}"))))
            .collect::<Result<Vec<_>, _>>()?;
        let rhs = to_integer(constraint.rhs, tolerance)
            .ok_or_else(|| Error::MalformedModel(format!("constraint {i} has right-hand side {}", constraint.rhs)))?;

        if constraint.relation == ConstraintRelation::Equal {
            let rational = to_rational(&row);
            let mut extended = rational.clone();
            extended.push(BigRational::from_integer(rhs.clone()));

            if coefficients.insert(&rational) {
                augmented.insert(&extended);
            } else if augmented.spans(&extended) {
                warn!("Dropping equality constraint {i}, it is implied by the equalities before it");
                continue;
            } else {
                debug!("Equality constraint {i} contradicts the equalities before it");
                return Err(Error::InfeasibleRelaxation);
            }
        }

        rows.push((row, constraint.relation, rhs));
    }

    let nr_slacks = rows.iter()
        .filter(|(_, relation, _)| *relation != ConstraintRelation::Equal)
        .count();
    let mut bound_rows = Vec::new();
    for j in 0..n {
        if let Some(value) = &lower[j] {
            if !value.is_zero() {
                bound_rows.push((j, BoundDirection::Lower, value.clone()));
            }
        }
        if let Some(value) = &upper[j] {
            bound_rows.push((j, BoundDirection::Upper, value.clone()));
        }
    }
    let nr_columns = n + nr_slacks + bound_rows.len();

    let mut a = IntegerMatrix::zeros(rows.len() + bound_rows.len(), nr_columns);
    let mut b = Vec::with_capacity(a.nr_rows());
    let mut u = upper.clone();
    let mut nonnegative = lower.iter()
        .map(|bound| bound.as_ref().is_some_and(|value| !value.is_negative()))
        .collect::<Vec<_>>();
    let mut variable_types = (0..n).map(|j| model.variable_type(j)).collect::<Vec<_>>();

    let mut next_slack = n;
    for (i, (row, relation, rhs)) in rows.into_iter().enumerate() {
        if let Some(direction) = relation.bound_direction() {
            a[(i, next_slack)] = direction.into::<BigInt>();
            u.push(None);
            nonnegative.push(true);
            variable_types.push(slack_type(&row, &variable_types[..n]));
            next_slack += 1;
        }
        for (j, value) in row.into_iter().enumerate() {
            a[(i, j)] = value;
        }
        b.push(rhs);
    }
    let nr_constraint_rows = b.len();
    for (t, (j, direction, value)) in bound_rows.into_iter().enumerate() {
        let (i, slack) = (nr_constraint_rows + t, next_slack + t);
        a[(i, j)] = BigInt::from(1);
        a[(i, slack)] = direction.into::<BigInt>();
        // The slack measures the distance to the bound, it is bounded by the width of the domain.
        let width = match direction {
            BoundDirection::Lower => upper[j].as_ref().map(|upper| upper - &value),
            BoundDirection::Upper => lower[j].as_ref().map(|lower| &value - lower),
        };
        b.push(value);
        u.push(width);
        nonnegative.push(true);
        variable_types.push(variable_types[j]);
    }

    let c = objective(model, nr_columns, tolerance)?;

    debug!(
        "Extracted {} rows and {nr_columns} columns from {nr_model_constraints} constraints over {n} variables",
        a.nr_rows(),
    );

    Ok(Extraction {
        problem: RawProblem::new(a, b, c, u, nonnegative)?.with_variable_types(variable_types)?,
        sense: model.sense(),
        nr_model_constraints,
        nr_model_variables: n,
    })
}

/// Tightest lower and upper bound of each variable.
fn collect_bounds(
    model: &impl Model,
    options: &Options,
) -> Result<(Vec<Option<BigInt>>, Vec<Option<BigInt>>), Error> {
    let n = model.nr_variables();
    let mut lower: Vec<Option<BigInt>> = vec![None; n];
    let mut upper: Vec<Option<BigInt>> = vec![None; n];

    for bound in model.bounds() {
        let j = bound.variable;
        if j >= n {
            return Err(Error::MalformedModel(format!("bound on unknown variable {j}")));
        }
        if bound.value.is_infinite() {
            continue;
        }
        let value = to_integer(bound.value, options.tolerance)
            .ok_or_else(|| Error::MalformedModel(format!("variable {j} has bound {}", bound.value)))?;
        match bound.direction {
            BoundDirection::Lower => tighten(&mut lower[j], value, BoundDirection::Lower),
            BoundDirection::Upper => tighten(&mut upper[j], value, BoundDirection::Upper),
        }
    }

    if options.infer_binary {
        for j in (0..n).filter(|&j| model.is_binary(j)) {
            tighten(&mut lower[j], BigInt::zero(), BoundDirection::Lower);
            tighten(&mut upper[j], BigInt::from(1), BoundDirection::Upper);
        }
    }

    Ok((lower, upper))
}

fn tighten(bound: &mut Option<BigInt>, value: BigInt, direction: BoundDirection) {
    let tighter = match (bound.as_ref(), direction) {
        (None, _) => true,
        (Some(existing), BoundDirection::Lower) => value > *existing,
        (Some(existing), BoundDirection::Upper) => value < *existing,
    };
    if tighter {
        *bound = Some(value);
    }
}

/// Objective row, negated for maximization such that it is always minimized.
fn objective(model: &impl Model, nr_columns: usize, tolerance: f64) -> Result<RationalMatrix, Error> {
    let n = model.nr_variables();
    let mut values = vec![0_f64; n];
    for (j, coefficient) in model.objective() {
        if j >= n {
            return Err(Error::MalformedModel(format!("objective refers to unknown variable {j}")));
        }
        values[j] += coefficient;
    }

    let mut row = values.into_iter()
        .map(|value| to_integer(value, tolerance)
            .map(BigRational::from_integer)
            .ok_or_else(|| Error::MalformedModel(format!("objective has coefficient {value}"))))
        .collect::<Result<Vec<_>, _>>()?;
    if model.sense() == Objective::Maximize {
        for value in &mut row {
            *value = -&*value;
        }
    }
    row.resize(nr_columns, BigRational::zero());

    Ok(RationalMatrix::new(vec![row], nr_columns))
}

/// Read a floating point value as an integer.
///
/// # Return value
///
/// `None` if the value is not finite, or further than `tolerance` from the nearest integer.
fn to_integer(value: f64, tolerance: f64) -> Option<BigInt> {
    let rounded = value.round();
    if (value - rounded).abs() > tolerance {
        return None;
    }

    BigInt::from_f64(rounded)
}

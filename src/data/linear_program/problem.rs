//! # Raw problem data
//!
//! The matrices and vectors that describe an integer program, before any classification or lattice
//! computation happened. Dimensions are validated once, on construction.
use index_utils::remove_indices;
use num::{BigInt, BigRational};
use num_traits::Zero;

use crate::data::linear_algebra::matrix::{IntegerMatrix, RationalMatrix};
use crate::data::linear_program::elements::VariableType;
use crate::data::linear_program::permutation::Permutation;
use crate::error::Error;

/// An integer program `min c x s.t. Ax = b, 0 <= x <= u` where the lower bounds apply only to the
/// nonnegative variables.
///
/// Before normalization, the same data is read as `Ax <= b, x <= u`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RawProblem {
    pub(crate) a: IntegerMatrix,
    pub(crate) b: Vec<BigInt>,
    /// Objective rows, the first row is the objective that is minimized.
    pub(crate) c: RationalMatrix,
    pub(crate) u: Vec<Option<BigInt>>,
    pub(crate) nonnegative: Vec<bool>,
    /// Integrality requirement per variable.
    pub(crate) variable_types: Vec<VariableType>,
}

impl RawProblem {
    /// Validate and store problem data.
    ///
    /// # Arguments
    ///
    /// * `a`: Constraint matrix of size `m x n`.
    /// * `b`: Right-hand side of length `m`.
    /// * `c`: At least one objective row of length `n`.
    /// * `u`: Upper bound per variable.
    /// * `nonnegative`: Sign restriction per variable.
    ///
    /// All variables are integer, see `with_variable_types` to change that.
    ///
    /// # Return value
    ///
    /// A `Dimension` error if the lengths don't agree.
    pub fn new(
        a: IntegerMatrix,
        b: Vec<BigInt>,
        c: RationalMatrix,
        u: Vec<Option<BigInt>>,
        nonnegative: Vec<bool>,
    ) -> Result<Self, Error> {
        let (m, n) = (a.nr_rows(), a.nr_columns());
        if b.len() != m {
            return Err(Error::Dimension(format!("{m} constraints but {} right-hand side values", b.len())));
        }
        if c.nr_rows() == 0 {
            return Err(Error::Dimension("there should be at least one objective row".to_string()));
        }
        if c.nr_columns() != n {
            return Err(Error::Dimension(format!("{n} variables but objective rows of length {}", c.nr_columns())));
        }
        if u.len() != n {
            return Err(Error::Dimension(format!("{n} variables but {} upper bounds", u.len())));
        }
        if nonnegative.len() != n {
            return Err(Error::Dimension(format!("{n} variables but {} sign restrictions", nonnegative.len())));
        }

        Ok(Self { a, b, c, u, nonnegative, variable_types: vec![VariableType::Integer; n] })
    }

    /// Create an all nonnegative problem with a single objective from small values.
    ///
    /// Mostly convenient for constructing problems by hand.
    pub fn from_i64(a: &[Vec<i64>], b: &[i64], c: &[i64], u: &[Option<i64>]) -> Result<Self, Error> {
        let n = c.len();

        Self::new(
            IntegerMatrix::from_i64(a, n),
            b.iter().map(|&v| BigInt::from(v)).collect(),
            IntegerMatrix::from_i64(&[c.to_vec()], n).to_rational(),
            u.iter().map(|v| v.map(BigInt::from)).collect(),
            vec![true; n],
        )
    }

    /// Replace the sign restrictions.
    pub fn with_nonnegative(mut self, nonnegative: Vec<bool>) -> Result<Self, Error> {
        if nonnegative.len() != self.nr_columns() {
            return Err(Error::Dimension(format!(
                "{} variables but {} sign restrictions", self.nr_columns(), nonnegative.len(),
            )));
        }

        self.nonnegative = nonnegative;
        Ok(self)
    }

    /// Replace the integrality requirements.
    pub fn with_variable_types(mut self, variable_types: Vec<VariableType>) -> Result<Self, Error> {
        if variable_types.len() != self.nr_columns() {
            return Err(Error::Dimension(format!(
                "{} variables but {} variable types", self.nr_columns(), variable_types.len(),
            )));
        }

        self.variable_types = variable_types;
        Ok(self)
    }

    /// Number of constraints.
    pub fn nr_rows(&self) -> usize {
        self.a.nr_rows()
    }

    /// Number of variables.
    pub fn nr_columns(&self) -> usize {
        self.a.nr_columns()
    }

    /// Constraint matrix.
    pub fn a(&self) -> &IntegerMatrix {
        &self.a
    }

    /// Right-hand side.
    pub fn b(&self) -> &[BigInt] {
        &self.b
    }

    /// Objective rows.
    pub fn c(&self) -> &RationalMatrix {
        &self.c
    }

    /// Main objective.
    pub fn objective(&self) -> &[BigRational] {
        self.c.row(0)
    }

    /// Upper bounds.
    pub fn u(&self) -> &[Option<BigInt>] {
        &self.u
    }

    /// Sign restrictions.
    pub fn nonnegative(&self) -> &[bool] {
        &self.nonnegative
    }

    /// Integrality requirements.
    pub fn variable_types(&self) -> &[VariableType] {
        &self.variable_types
    }

    /// Remove constraints.
    ///
    /// # Arguments
    ///
    /// * `rows`: Sorted, deduplicated row indices.
    pub(crate) fn remove_rows(&mut self, rows: &[usize]) {
        self.a.remove_rows(rows);
        remove_indices(&mut self.b, rows);
    }

    /// Reorder the variables.
    ///
    /// All per-variable data moves at once, such that no partially permuted state is observable.
    #[must_use]
    pub(crate) fn permute(self, permutation: &Permutation) -> Self {
        debug_assert_eq!(permutation.len(), self.nr_columns());

        Self {
            a: self.a.permute_columns(permutation.forward()),
            b: self.b,
            c: self.c.permute_columns(permutation.forward()),
            u: permutation.apply(&self.u),
            nonnegative: permutation.apply(&self.nonnegative),
            variable_types: permutation.apply(&self.variable_types),
        }
    }
}

/// Type of the slack of a row with integral coefficients and right-hand side.
///
/// The slack is integral at every integer point exactly when all variables it depends on are.
pub(crate) fn slack_type(row: &[BigInt], variable_types: &[VariableType]) -> VariableType {
    let integral = row.iter().zip(variable_types)
        .all(|(coefficient, &variable_type)| coefficient.is_zero() || variable_type == VariableType::Integer);

    if integral { VariableType::Integer } else { VariableType::Continuous }
}

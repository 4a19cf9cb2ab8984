//! # Lattice of an equality system
//!
//! The integer solutions of `Ax = b` form a translated lattice `x0 + L`, where `L` is the integer
//! kernel of `A`. Both are read from a single Hermite normal form computation: with a unimodular
//! `U` such that `U A^T = H` is in Hermite normal form, the rows of `U` for which `H` is zero form a
//! basis of `L`, and the pivots of `H` determine `x0` through forward substitution.
use log::debug;
use num::{BigInt, Integer};
use num_traits::Zero;

use crate::algorithm::lattice::hermite::{AbovePivot, hermite_normal_form};
use crate::data::linear_algebra::matrix::IntegerMatrix;
use crate::error::Error;

pub mod hermite;

/// Canonical basis of the integer kernel, and a point of the fiber.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LatticeBasis {
    /// One basis vector per row, `(n - rank) x n`.
    basis: IntegerMatrix,
    rank: usize,
    /// Integer solution of `Ax = b`.
    fiber_solution: Vec<BigInt>,
}

impl LatticeBasis {
    /// Compute the lattice of `Ax = b`.
    ///
    /// The rank is computed here and is authoritative: `A` doesn't need to have full row rank.
    ///
    /// # Errors
    ///
    /// `NoIntegerSolution` if the system has no integer solution.
    pub fn new(a: &IntegerMatrix, b: &[BigInt]) -> Result<Self, Error> {
        let (m, n) = (a.nr_rows(), a.nr_columns());
        debug_assert_eq!(b.len(), m);

        let mut extended = a.transpose().hcat(&IntegerMatrix::identity(n));
        let pivots = hermite_normal_form(&mut extended, m, AbovePivot::NonNegative);
        let rank = pivots.len();

        let kernel_rows = (rank..n).collect::<Vec<_>>();
        let transformation_columns = (m..m + n).collect::<Vec<_>>();
        let mut basis = extended.select_rows(&kernel_rows).select_columns(&transformation_columns);
        canonicalize(&mut basis);

        let fiber_solution = fiber_solution(&extended, &pivots, b).ok_or(Error::NoIntegerSolution)?;
        debug!("Lattice of dimension {} in {n} variables, constraint rank {rank}", n - rank);

        let lattice = Self { basis, rank, fiber_solution };
        debug_assert!(lattice.is_consistent(a, b));

        Ok(lattice)
    }

    /// Basis vectors as rows.
    pub fn basis(&self) -> &IntegerMatrix {
        &self.basis
    }

    /// Rank of the constraint matrix.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Dimension of the lattice.
    pub fn dimension(&self) -> usize {
        self.basis.nr_rows()
    }

    /// An integer solution of the equality system.
    pub fn fiber_solution(&self) -> &[BigInt] {
        &self.fiber_solution
    }

    /// Whether this lattice belongs to the system `Ax = b`.
    ///
    /// Every basis vector should be in the kernel of `A`, there should be `n - rank` of them, and
    /// the fiber solution should solve the system.
    pub fn is_consistent(&self, a: &IntegerMatrix, b: &[BigInt]) -> bool {
        let n = a.nr_columns();

        self.basis.nr_columns() == n
            && self.basis.nr_rows() + self.rank == n
            && self.basis.rows().all(|row| a.mul_vector(row).iter().all(Zero::is_zero))
            && self.fiber_solution.len() == n
            && a.mul_vector(&self.fiber_solution) == b
    }
}

/// Bring a lattice basis into its canonical form.
///
/// The Hermite normal form with entries above the pivots reduced into `(-pivot, 0]`. Two bases of
/// the same lattice have the same canonical form.
pub fn canonicalize(basis: &mut IntegerMatrix) {
    let nr_columns = basis.nr_columns();
    hermite_normal_form(basis, nr_columns, AbovePivot::NonPositive);
}

/// Solve `H^T y = b` by forward substitution over the pivots, and map `y` back through `U`.
///
/// # Arguments
///
/// * `extended`: The matrix `[H | U]` with `H` in Hermite normal form.
/// * `pivots`: Pivot columns of `H`.
/// * `b`: Right-hand side, of the same length as the rows of `H`.
fn fiber_solution(extended: &IntegerMatrix, pivots: &[usize], b: &[BigInt]) -> Option<Vec<BigInt>> {
    let m = b.len();
    let n = extended.nr_rows();

    let mut residual = b.to_vec();
    let mut y = Vec::with_capacity(pivots.len());
    for (k, &column) in pivots.iter().enumerate() {
        let (quotient, remainder) = residual[column].div_rem(&extended[(k, column)]);
        if !remainder.is_zero() {
            return None;
        }
        for (c, value) in residual.iter_mut().enumerate() {
            if !extended[(k, c)].is_zero() {
                *value -= &quotient * &extended[(k, c)];
            }
        }
        y.push(quotient);
    }
    if !residual.iter().all(Zero::is_zero) {
        return None;
    }

    let mut x = vec![BigInt::zero(); n];
    for (k, y_k) in y.iter().enumerate().filter(|(_, y_k)| !y_k.is_zero()) {
        for (j, value) in x.iter_mut().enumerate() {
            *value += y_k * &extended[(k, m + j)];
        }
    }

    Some(x)
}

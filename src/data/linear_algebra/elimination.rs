//! # Exact elimination
//!
//! Rank computations and linear solves over the rationals. None of these routines round; a value
//! is zero only if it is exactly zero.
use num::BigRational;
use num_traits::Zero;

use crate::data::linear_algebra::matrix::RationalMatrix;

/// Incrementally built echelon form of a set of vectors.
///
/// Vectors are offered one at a time and accepted only if they are linearly independent of all
/// vectors accepted before. This makes greedy "grow the rank" selections cheap: every offer costs
/// a single reduction against the vectors already accepted.
#[derive(Debug, Clone)]
pub struct IndependentSet {
    /// Reduced vectors with their pivot index. Each vector is one at its pivot and zero at the
    /// pivots of all vectors before it.
    rows: Vec<(usize, Vec<BigRational>)>,
    len: usize,
}

impl IndependentSet {
    /// Create an empty set for vectors of length `len`.
    pub fn new(len: usize) -> Self {
        Self { rows: Vec::new(), len }
    }

    /// Dimension of the span of the accepted vectors.
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    /// Whether the accepted vectors span the entire space.
    pub fn is_full(&self) -> bool {
        self.rank() == self.len
    }

    /// Subtract the projection onto the accepted vectors.
    ///
    /// # Return value
    ///
    /// A vector that is zero if and only if `vector` is in the span of the accepted vectors.
    pub fn reduce(&self, vector: &[BigRational]) -> Vec<BigRational> {
        debug_assert_eq!(vector.len(), self.len);

        let mut reduced = vector.to_vec();
        for (pivot, row) in &self.rows {
            if !reduced[*pivot].is_zero() {
                let factor = reduced[*pivot].clone();
                for (value, r) in reduced.iter_mut().zip(row) {
                    if !r.is_zero() {
                        *value -= &factor * r;
                    }
                }
            }
        }

        reduced
    }

    /// Whether `vector` is in the span of the accepted vectors.
    pub fn spans(&self, vector: &[BigRational]) -> bool {
        self.reduce(vector).iter().all(Zero::is_zero)
    }

    /// Offer a vector.
    ///
    /// # Return value
    ///
    /// Whether the vector was accepted, that is, whether the rank increased.
    pub fn insert(&mut self, vector: &[BigRational]) -> bool {
        let mut reduced = self.reduce(vector);
        match reduced.iter().position(|value| !value.is_zero()) {
            Some(pivot) => {
                let pivot_value = reduced[pivot].clone();
                for value in &mut reduced {
                    *value /= &pivot_value;
                }
                self.rows.push((pivot, reduced));
                true
            },
            None => false,
        }
    }
}

/// Rank of a matrix.
pub fn rank(matrix: &RationalMatrix) -> usize {
    independent_rows(matrix).len()
}

/// Greedily select rows that are linearly independent.
///
/// # Return value
///
/// Sorted row indices. A row is selected if and only if it is not in the span of the rows before
/// it.
pub fn independent_rows(matrix: &RationalMatrix) -> Vec<usize> {
    let mut set = IndependentSet::new(matrix.nr_columns());

    (0..matrix.nr_rows())
        .filter(|&i| set.insert(matrix.row(i)))
        .collect()
}

/// Solve a square system `matrix * x = rhs`.
///
/// Gauss-Jordan elimination, pivoting on the first nonzero in each column.
///
/// # Return value
///
/// The unique solution, or `None` if the matrix is singular.
pub fn solve(matrix: &RationalMatrix, rhs: &[BigRational]) -> Option<Vec<BigRational>> {
    let n = matrix.nr_rows();
    debug_assert_eq!(matrix.nr_columns(), n);
    debug_assert_eq!(rhs.len(), n);

    let mut rows = matrix.clone().into_rows();
    for (row, value) in rows.iter_mut().zip(rhs) {
        row.push(value.clone());
    }

    for column in 0..n {
        let pivot_row = (column..n).find(|&i| !rows[i][column].is_zero())?;
        rows.swap(column, pivot_row);

        let pivot = rows[column][column].clone();
        for value in &mut rows[column] {
            *value /= &pivot;
        }
        let pivot_values = rows[column].clone();
        for (i, row) in rows.iter_mut().enumerate() {
            if i != column && !row[column].is_zero() {
                let factor = row[column].clone();
                for (value, p) in row.iter_mut().zip(&pivot_values) {
                    *value -= &factor * p;
                }
            }
        }
    }

    Some(rows.into_iter().map(|mut row| row.pop().unwrap_or_else(BigRational::zero)).collect())
}

//! # Hermite normal form
//!
//! Row style Hermite normal form through unimodular row operations only, such that the row lattice
//! of the matrix never changes.
use num::{BigInt, Integer};
use num_traits::{One, Signed, Zero};

use crate::data::linear_algebra::matrix::IntegerMatrix;

/// Range that the entries above a pivot are reduced into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AbovePivot {
    /// `0 <= entry < pivot`, the classical normal form.
    NonNegative,
    /// `-pivot < entry <= 0`.
    NonPositive,
}

/// Bring a matrix into Hermite normal form.
///
/// After the transformation, each of the first `rank` rows has a positive pivot, the entries
/// below each pivot are zero and the entries above each pivot are reduced into the range given by
/// `above_pivot`. The remaining rows are zero in the pivot search columns.
///
/// # Arguments
///
/// * `matrix`: Matrix to transform in place.
/// * `nr_pivot_columns`: Only the first this many columns are searched for pivots. Columns to the
///   right of them are transformed along, which can be used to record the transformation.
/// * `above_pivot`: How to reduce the entries above a pivot.
///
/// # Return value
///
/// The pivot column of each of the first `rank` rows.
pub fn hermite_normal_form(
    matrix: &mut IntegerMatrix,
    nr_pivot_columns: usize,
    above_pivot: AbovePivot,
) -> Vec<usize> {
    debug_assert!(nr_pivot_columns <= matrix.nr_columns());

    let mut pivots = Vec::new();
    for column in 0..nr_pivot_columns {
        let pivot_row = pivots.len();
        if pivot_row == matrix.nr_rows() {
            break;
        }

        for row in pivot_row + 1..matrix.nr_rows() {
            if !matrix[(row, column)].is_zero() {
                combine(matrix, pivot_row, row, column);
            }
        }
        if matrix[(pivot_row, column)].is_zero() {
            continue;
        }
        if matrix[(pivot_row, column)].is_negative() {
            let negated = matrix.row(pivot_row).iter().map(|value| -value).collect();
            matrix.set_row(pivot_row, negated);
        }
        for row in 0..pivot_row {
            reduce(matrix, pivot_row, row, column, above_pivot);
        }

        pivots.push(column);
    }

    pivots
}

/// Replace two rows by unimodular combinations such that `row` becomes zero in `column`.
///
/// With `a` and `b` the entries of the two rows in `column`, the rows are multiplied from the left
/// by `[[s, t], [-b / g, a / g]]`, which has determinant one. Here `g = s * a + t * b` is the
/// nonnegative greatest common divisor.
fn combine(matrix: &mut IntegerMatrix, pivot_row: usize, row: usize, column: usize) {
    let a = matrix[(pivot_row, column)].clone();
    let b = matrix[(row, column)].clone();
    let bezout = a.extended_gcd(&b);
    let (g, s, t) = if bezout.gcd.is_negative() {
        (-bezout.gcd, -bezout.x, -bezout.y)
    } else {
        (bezout.gcd, bezout.x, bezout.y)
    };
    let (a_g, b_g) = (&a / &g, &b / &g);

    let (new_pivot_row, new_row): (Vec<_>, Vec<_>) = matrix.row(pivot_row).iter().zip(matrix.row(row))
        .map(|(x, y)| (&s * x + &t * y, &a_g * y - &b_g * x))
        .unzip();
    matrix.set_row(pivot_row, new_pivot_row);
    matrix.set_row(row, new_row);

    debug_assert!(matrix[(row, column)].is_zero());
}

/// Reduce the entry of `row` in `column` modulo the pivot below it.
fn reduce(matrix: &mut IntegerMatrix, pivot_row: usize, row: usize, column: usize, above_pivot: AbovePivot) {
    let pivot = &matrix[(pivot_row, column)];
    let (mut quotient, remainder) = matrix[(row, column)].div_mod_floor(pivot);
    if above_pivot == AbovePivot::NonPositive && remainder.is_positive() {
        quotient += BigInt::one();
    }

    if !quotient.is_zero() {
        matrix.mul_add_rows(pivot_row, row, &-quotient);
    }
}

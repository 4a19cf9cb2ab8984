//! # Dense matrices
//!
//! Row major storage for the exact integer and rational matrices of this crate. After
//! normalization the problems are dense enough, and the lattice computations work on full rows
//! anyway, so no sparse representation is provided.
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{AddAssign, Index, IndexMut, Mul};

use index_utils::remove_indices;
use num::{BigInt, BigRational};
use num_traits::{One, Zero};

/// Uses a `Vec<Vec<F>>` as underlying data structure. Dimensions are fixed at creation, except
/// through the explicit row and column removal and concatenation methods.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Dense<F> {
    data: Vec<Vec<F>>,
    nr_columns: usize,
}

/// Constraint matrices and lattice bases.
pub type IntegerMatrix = Dense<BigInt>;
/// Objective rows and anything derived through division.
pub type RationalMatrix = Dense<BigRational>;

impl<F> Dense<F> {
    /// Create a matrix from row major data.
    ///
    /// The number of columns is passed explicitly, such that matrices without rows still have a
    /// width.
    pub fn new(data: Vec<Vec<F>>, nr_columns: usize) -> Self {
        debug_assert!(data.iter().all(|row| row.len() == nr_columns));

        Self { data, nr_columns }
    }

    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.data.len()
    }

    /// Number of columns.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Get all values in row `i` of this matrix.
    pub fn row(&self, i: usize) -> &[F] {
        debug_assert!(i < self.nr_rows());

        &self.data[i]
    }

    /// Iterate over the rows of this matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[F]> {
        self.data.iter().map(Vec::as_slice)
    }

    /// Get the data of this matrix.
    pub fn into_rows(self) -> Vec<Vec<F>> {
        self.data
    }

    /// Append a row at the bottom.
    pub fn push_row(&mut self, row: Vec<F>) {
        debug_assert_eq!(row.len(), self.nr_columns);

        self.data.push(row);
    }

    /// Exchange rows `i` and `j`.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.nr_rows() && j < self.nr_rows());

        self.data.swap(i, j);
    }

    /// Overwrite row `i`.
    pub fn set_row(&mut self, i: usize, row: Vec<F>) {
        debug_assert!(i < self.nr_rows());
        debug_assert_eq!(row.len(), self.nr_columns);

        self.data[i] = row;
    }

    /// Remove rows.
    ///
    /// # Arguments
    ///
    /// * `indices`: Sorted, deduplicated row indices.
    pub fn remove_rows(&mut self, indices: &[usize]) {
        debug_assert!(indices.is_sorted());
        debug_assert!(indices.iter().all(|&i| i < self.nr_rows()));

        remove_indices(&mut self.data, indices);
    }

    /// Remove columns.
    ///
    /// # Arguments
    ///
    /// * `indices`: Sorted, deduplicated column indices.
    pub fn remove_columns(&mut self, indices: &[usize]) {
        debug_assert!(indices.is_sorted());
        debug_assert!(indices.iter().all(|&j| j < self.nr_columns));

        for row in &mut self.data {
            remove_indices(row, indices);
        }
        self.nr_columns -= indices.len();
    }

    /// Apply a function to every element.
    pub fn map<G>(&self, mut f: impl FnMut(&F) -> G) -> Dense<G> {
        Dense {
            data: self.data.iter().map(|row| row.iter().map(&mut f).collect()).collect(),
            nr_columns: self.nr_columns,
        }
    }
}

impl<F: Clone> Dense<F> {
    /// Get all values in column `j` of this matrix.
    pub fn column(&self, j: usize) -> Vec<F> {
        debug_assert!(j < self.nr_columns);

        self.data.iter().map(|row| row[j].clone()).collect()
    }

    /// Swap the roles of rows and columns.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let data = (0..self.nr_columns).map(|j| self.column(j)).collect();

        Self::new(data, self.nr_rows())
    }

    /// Restrict to a subset of the columns, in the order given.
    #[must_use]
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        debug_assert!(columns.iter().all(|&j| j < self.nr_columns));

        let data = self.data.iter()
            .map(|row| columns.iter().map(|&j| row[j].clone()).collect())
            .collect();

        Self::new(data, columns.len())
    }

    /// Restrict to a subset of the rows, in the order given.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        debug_assert!(rows.iter().all(|&i| i < self.nr_rows()));

        Self::new(rows.iter().map(|&i| self.data[i].clone()).collect(), self.nr_columns)
    }

    /// Place the columns of `other` to the right of the columns of this matrix.
    #[must_use]
    pub fn hcat(mut self, other: &Self) -> Self {
        debug_assert_eq!(self.nr_rows(), other.nr_rows());

        for (row, extra) in self.data.iter_mut().zip(&other.data) {
            row.extend_from_slice(extra);
        }
        self.nr_columns += other.nr_columns;

        self
    }

    /// Place the rows of `other` below the rows of this matrix.
    #[must_use]
    pub fn vcat(mut self, other: &Self) -> Self {
        debug_assert_eq!(self.nr_columns, other.nr_columns);

        self.data.extend(other.data.iter().cloned());
        self
    }

    /// Move column `j` to position `permutation[j]`.
    #[must_use]
    pub fn permute_columns(&self, permutation: &[usize]) -> Self {
        debug_assert_eq!(permutation.len(), self.nr_columns);

        let data = self.data.iter()
            .map(|row| {
                let mut permuted = row.clone();
                for (j, value) in row.iter().enumerate() {
                    permuted[permutation[j]] = value.clone();
                }
                permuted
            })
            .collect();

        Self::new(data, self.nr_columns)
    }
}

impl<F: Clone + Zero> Dense<F> {
    /// Create a dense matrix of zeros of dimension `nr_rows` x `nr_columns`.
    pub fn zeros(nr_rows: usize, nr_columns: usize) -> Self {
        Self::new(vec![vec![F::zero(); nr_columns]; nr_rows], nr_columns)
    }

    /// Whether all elements are zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().flatten().all(Zero::is_zero)
    }
}

impl<F: Clone + Zero + One> Dense<F> {
    /// Create a dense square identity matrix of size `len`.
    pub fn identity(len: usize) -> Self {
        let mut matrix = Self::zeros(len, len);
        for i in 0..len {
            matrix.data[i][i] = F::one();
        }

        matrix
    }
}

impl<F> Dense<F>
where
    F: Zero + AddAssign,
    for<'r> &'r F: Mul<&'r F, Output = F>,
{
    /// Matrix vector product `self * x`.
    pub fn mul_vector(&self, x: &[F]) -> Vec<F> {
        debug_assert_eq!(x.len(), self.nr_columns);

        self.data.iter().map(|row| inner_product(row, x)).collect()
    }

    /// Add a multiple of row `read_row` to row `write_row`.
    pub fn mul_add_rows(&mut self, read_row: usize, write_row: usize, factor: &F) {
        debug_assert!(read_row < self.nr_rows());
        debug_assert!(write_row < self.nr_rows());
        debug_assert_ne!(read_row, write_row);

        let (source, target) = if read_row < write_row {
            let (left, right) = self.data.split_at_mut(write_row);
            (&left[read_row], &mut right[0])
        } else {
            let (left, right) = self.data.split_at_mut(read_row);
            (&right[0], &mut left[write_row])
        };

        for (value, read) in target.iter_mut().zip(source) {
            *value += factor * read;
        }
    }
}

/// Inner product of two vectors of equal length.
pub fn inner_product<F>(left: &[F], right: &[F]) -> F
where
    F: Zero + AddAssign,
    for<'r> &'r F: Mul<&'r F, Output = F>,
{
    debug_assert_eq!(left.len(), right.len());

    let mut total = F::zero();
    for (l, r) in left.iter().zip(right) {
        total += l * r;
    }

    total
}

impl IntegerMatrix {
    /// Create an integer matrix from small values.
    ///
    /// Mostly convenient for constructing problems by hand.
    pub fn from_i64(data: &[Vec<i64>], nr_columns: usize) -> Self {
        Self::new(
            data.iter().map(|row| row.iter().map(|&v| BigInt::from(v)).collect()).collect(),
            nr_columns,
        )
    }

    /// Exact conversion to a rational matrix.
    pub fn to_rational(&self) -> RationalMatrix {
        self.map(|value| BigRational::from_integer(value.clone()))
    }
}

impl<F> Index<(usize, usize)> for Dense<F> {
    type Output = F;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        debug_assert!(j < self.nr_columns);

        &self.data[i][j]
    }
}

impl<F> IndexMut<(usize, usize)> for Dense<F> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        debug_assert!(j < self.nr_columns);

        &mut self.data[i][j]
    }
}

impl<F: Display> Display for Dense<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in &self.data {
            let mut first = true;
            for value in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{:>5}", value.to_string())?;
                first = false;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

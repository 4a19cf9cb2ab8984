//! # Projection of the lattice basis
//!
//! A lattice of dimension `d` in `n` variables is determined by its coordinates in `d` well chosen
//! variables. Project-and-lift works on those coordinates and lifts back to the others.
use itertools::Itertools;
use log::debug;
use num::BigRational;

use crate::algorithm::oracle::Oracle;
use crate::data::linear_algebra::elimination::IndependentSet;
use crate::data::linear_algebra::matrix::IntegerMatrix;
use crate::data::linear_program::instance::IpInstance;

/// How to choose the columns of the lattice basis that are kept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LatticeProjection {
    /// First columns that increase the rank.
    #[default]
    Any,
    /// Columns of the variables that are nonbasic in an optimal basis of the relaxation.
    SimplexBasis,
}

impl<O: Oracle> IpInstance<O> {
    /// Select columns of the lattice basis that are linearly independent, as many as the lattice
    /// has dimensions.
    ///
    /// When the optimal basis of the relaxation is requested but there is no optimum, columns are
    /// selected as for `LatticeProjection::Any`.
    ///
    /// # Return value
    ///
    /// Sorted column indices.
    pub fn lattice_projection(&mut self, mode: LatticeProjection) -> Vec<usize> {
        let n = self.nr_columns();

        let preferred = match mode {
            LatticeProjection::Any => Vec::new(),
            LatticeProjection::SimplexBasis => self.nonbasic_columns().unwrap_or_default(),
        };
        let rest = (0..n).filter(|j| preferred.binary_search(j).is_err()).collect::<Vec<_>>();

        let basis = self.lattice.basis();
        let mut columns = IndependentSet::new(basis.nr_rows());
        let mut selected = preferred.into_iter().chain(rest)
            .filter(|&j| !columns.is_full() && columns.insert(&rational_column(basis, j)))
            .collect::<Vec<_>>();
        selected.sort_unstable();
        debug_assert_eq!(selected.len(), self.lattice.dimension());

        selected
    }

    /// Columns outside of a set of linearly independent constraint columns of maximal size, which
    /// is grown from the basic columns of an optimal basis.
    ///
    /// When the objective is constant on every fiber, all feasible bases are optimal and the one
    /// found is used all the same.
    fn nonbasic_columns(&mut self) -> Option<Vec<usize>> {
        let (m, n) = (self.nr_rows(), self.nr_columns());
        let a = self.a.to_rational();

        let basis = self.optimal_basis().ok()?;
        let rank = self.lattice.rank();
        let mut columns = IndependentSet::new(m);
        let mut chosen = vec![false; n];
        let order = basis.iter().positions(|&basic| basic)
            .chain(basis.iter().positions(|&basic| !basic));
        for j in order {
            if columns.rank() == rank {
                break;
            }
            chosen[j] = columns.insert(&a.column(j));
        }

        let nonbasic = chosen.iter().positions(|&chosen| !chosen).collect::<Vec<_>>();
        debug!("Preferring nonbasic columns {nonbasic:?} for the lattice projection");

        Some(nonbasic)
    }

    /// The lattice basis restricted to some of its columns.
    pub fn projected_lattice(&self, columns: &[usize]) -> IntegerMatrix {
        self.lattice.basis().select_columns(columns)
    }
}

fn rational_column(matrix: &IntegerMatrix, j: usize) -> Vec<BigRational> {
    matrix.column(j).into_iter().map(BigRational::from_integer).collect()
}

#[cfg(test)]
mod test {
    use crate::algorithm::oracle::simplex::SimplexOracle;
    use crate::algorithm::relaxation::lattice_projection::LatticeProjection;
    use crate::data::linear_algebra::matrix::IntegerMatrix;
    use crate::data::linear_program::instance::IpInstance;
    use crate::data::linear_program::problem::RawProblem;
    use crate::tests::{equality_form, problem_1};

    #[test]
    fn any() {
        let mut instance = problem_1::instance(SimplexOracle::default());
        assert_eq!(instance.lattice_projection(LatticeProjection::Any), vec![0]);
        assert_eq!(instance.projected_lattice(&[0]), IntegerMatrix::from_i64(&[vec![1]], 1));
    }

    #[test]
    fn simplex_basis() {
        let mut instance = problem_1::instance(SimplexOracle::default());
        let basis = instance.optimal_basis().unwrap();

        let columns = instance.lattice_projection(LatticeProjection::SimplexBasis);
        assert_eq!(columns.len(), 1);
        assert!(!basis[columns[0]]);
    }

    #[test]
    fn constant_objective() {
        // The objective is the sum of the constraint rows
        let problem = RawProblem::from_i64(&[vec![1, 1, 0], vec![0, 1, 1]], &[1, 1], &[1, 2, 1], &[None; 3]).unwrap();
        let mut instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();

        let basis = instance.optimal_basis().unwrap();

        let columns = instance.lattice_projection(LatticeProjection::SimplexBasis);
        assert_eq!(columns.len(), 1);
        assert!(!basis[columns[0]]);
    }

    #[test]
    fn larger() {
        let problem = RawProblem::from_i64(&[vec![1, 2, 3, 4]], &[10], &[1, 1, 1, 1], &[None; 4]).unwrap();
        let mut instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();
        assert_eq!(instance.lattice().dimension(), 3);

        for mode in [LatticeProjection::Any, LatticeProjection::SimplexBasis] {
            let columns = instance.lattice_projection(mode);
            assert_eq!(columns.len(), 3);
            let projected = instance.projected_lattice(&columns);
            assert_eq!(projected.nr_rows(), 3);
        }
    }
}

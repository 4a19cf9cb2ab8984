//! # Relaxations and projections
//!
//! Derived instances are built from the data of an existing instance. The parent is never
//! modified, the new instance receives a clone of its oracle and goes through the same
//! classification and lattice computation as an instance built from raw data, without being
//! normalized again.
use index_utils::remove_indices;
use itertools::Itertools;
use log::{debug, warn};
use num::BigRational;

use crate::algorithm::oracle::{Oracle, RelaxationResult};
use crate::data::linear_algebra::elimination::solve;
use crate::data::linear_algebra::matrix::{RationalMatrix, inner_product};
use crate::data::linear_program::instance::IpInstance;
use crate::data::linear_program::instance::builder::{Derivation, finish};
use crate::error::Error;

pub mod lattice_projection;
pub mod objective;
pub mod weight;

impl<O: Oracle> IpInstance<O> {
    /// Basic variables of an optimal basis of the linear relaxation.
    ///
    /// # Errors
    ///
    /// `InfeasibleRelaxation` or `UnboundedRelaxation` when there is no optimum.
    pub fn optimal_basis(&mut self) -> Result<Vec<bool>, Error> {
        let program = self.relaxation();
        match self.oracle.solve_relaxation(&program) {
            RelaxationResult::FiniteOptimum(optimum) => Ok(optimum.basis),
            RelaxationResult::Infeasible => Err(Error::InfeasibleRelaxation),
            RelaxationResult::Unbounded => Err(Error::UnboundedRelaxation),
        }
    }

    /// Optimal dual values of the linear relaxation, one per constraint.
    ///
    /// # Errors
    ///
    /// `InfeasibleRelaxation` or `UnboundedRelaxation` when there is no optimum.
    pub fn duals(&mut self) -> Result<Vec<BigRational>, Error> {
        let program = self.relaxation();
        match self.oracle.solve_relaxation(&program) {
            RelaxationResult::FiniteOptimum(optimum) => Ok(optimum.duals),
            RelaxationResult::Infeasible => Err(Error::InfeasibleRelaxation),
            RelaxationResult::Unbounded => Err(Error::UnboundedRelaxation),
        }
    }

    /// Create the instance in which exactly the flagged variables are nonnegative.
    ///
    /// If exactly as many variables lose their sign restriction as there are constraints, and
    /// their columns form an invertible matrix `A_R`, every objective row is replaced by
    /// `c - c_R A_R^-1 A`. That objective is zero on the relaxed variables and differs from the
    /// original objective by a constant on every fiber. Otherwise, the objective is kept.
    ///
    /// # Arguments
    ///
    /// * `keep`: For each column, whether it is nonnegative in the new instance.
    ///
    /// # Return value
    ///
    /// A new instance with its variables classified and grouped again.
    pub fn nonnegativity_relaxation(&self, keep: &[bool]) -> Result<Self, Error> {
        assert_eq!(keep.len(), self.nr_columns(), "one flag per variable is needed");

        let relaxed = keep.iter().positions(|&keep| !keep).collect::<Vec<_>>();
        let mut problem = self.to_problem();
        if relaxed.len() == self.nr_rows() {
            match reduced_objective(&self.a.to_rational(), &self.c, &relaxed) {
                Some(c) => problem.c = c,
                None => warn!("Relaxed columns {relaxed:?} are singular, the objective is kept"),
            }
        }
        problem.nonnegative = keep.to_vec();
        debug!("Relaxing nonnegativity of {} out of {} variables", relaxed.len(), self.nr_columns());

        finish(problem, self.oracle(), Derivation::of(self, self.origin.clone(), None))
    }

    /// Create the group relaxation.
    ///
    /// The nonbasic variables of an optimal basis of the relaxation lose their sign restriction,
    /// the basic nonnegative variables keep it.
    ///
    /// # Panics
    ///
    /// If the oracle reports an optimal basis that doesn't have exactly one basic variable per
    /// constraint.
    pub fn group_relaxation(&mut self) -> Result<Self, Error> {
        let basis = self.optimal_basis()?;
        let nr_basic = basis.iter().filter(|&&basic| basic).count();
        assert_eq!(
            nr_basic, self.nr_rows(),
            "an optimal basis should have one basic variable per constraint",
        );

        let keep = basis.iter().zip(&self.nonnegative)
            .map(|(&basic, &nonnegative)| basic && nonnegative)
            .collect::<Vec<_>>();

        self.nonnegativity_relaxation(&keep)
    }

    /// Remove free variables.
    ///
    /// The constraints are kept as they are, only the columns disappear. The new constraint matrix
    /// may have lower rank, the lattice is computed again.
    ///
    /// # Arguments
    ///
    /// * `away_from`: Sorted, deduplicated columns, all of them free.
    ///
    /// # Errors
    ///
    /// `InfeasibleRelaxation` if the remaining relaxation is infeasible, and `NoIntegerSolution` if
    /// the remaining system has no integer solution.
    ///
    /// # Panics
    ///
    /// If one of the columns is nonnegative.
    pub fn project(&self, away_from: &[usize]) -> Result<Self, Error> {
        assert!(
            away_from.iter().all(|&j| self.nonnegative_end <= j && j < self.nr_columns()),
            "only free variables can be projected away",
        );
        debug_assert!(away_from.is_sorted_by(|x, y| x < y));

        let mut problem = self.to_problem();
        problem.a.remove_columns(away_from);
        problem.c.remove_columns(away_from);
        remove_indices(&mut problem.u, away_from);
        remove_indices(&mut problem.nonnegative, away_from);
        remove_indices(&mut problem.variable_types, away_from);

        let mut origin = self.origin.clone();
        remove_indices(&mut origin, away_from);
        let mut bounded = self.permute(&self.originally_bounded);
        remove_indices(&mut bounded, away_from);
        debug!("Projecting away {} variables", away_from.len());

        finish(problem, self.oracle(), Derivation::of(self, origin, Some(bounded)))
    }
}

/// Subtract the combination of constraint rows that makes each objective row zero on `relaxed`.
///
/// # Return value
///
/// `None` if the columns of `relaxed` don't form an invertible matrix.
fn reduced_objective(a: &RationalMatrix, c: &RationalMatrix, relaxed: &[usize]) -> Option<RationalMatrix> {
    let a_relaxed_transposed = a.select_columns(relaxed).transpose();

    let rows = c.rows()
        .map(|row| {
            let c_relaxed = relaxed.iter().map(|&j| row[j].clone()).collect::<Vec<_>>();
            let y = solve(&a_relaxed_transposed, &c_relaxed)?;
            Some(
                (0..a.nr_columns())
                    .map(|j| &row[j] - inner_product(&y, &a.column(j)))
                    .collect()
            )
        })
        .collect::<Option<Vec<_>>>()?;

    Some(RationalMatrix::new(rows, a.nr_columns()))
}

#[cfg(test)]
mod test {
    use num::{BigInt, BigRational};

    use crate::algorithm::oracle::simplex::SimplexOracle;
    use crate::data::linear_program::instance::IpInstance;
    use crate::data::linear_program::problem::RawProblem;
    use crate::error::Error;
    use crate::tests::{ScriptedOracle, equality_form, problem_1, problem_2};

    fn r(value: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(value))
    }

    #[test]
    fn reduced_costs() {
        let instance = problem_1::instance(SimplexOracle::default());
        let relaxed = instance.nonnegativity_relaxation(&[true, false, false]).unwrap();

        assert!(relaxed.is_consistent());
        assert_eq!(relaxed.objective(), &[r(2), r(0), r(0)]);
        assert_eq!(relaxed.nonnegative(), &[true, false, false]);
        assert_eq!((relaxed.bounded_end(), relaxed.nonnegative_end()), (0, 1));
        assert_eq!(relaxed.a(), instance.a());
        assert_eq!(relaxed.b(), instance.b());
    }

    #[test]
    fn objective_kept() {
        let instance = problem_1::instance(SimplexOracle::default());
        let relaxed = instance.nonnegativity_relaxation(&[true, true, false]).unwrap();

        assert_eq!(relaxed.objective(), instance.objective());
        assert_eq!(relaxed.nonnegative_end(), 2);
    }

    #[test]
    fn restore() {
        let instance = problem_2::instance(SimplexOracle::default());
        let relaxed = instance.nonnegativity_relaxation(&[false, true, false]).unwrap();
        assert_eq!(relaxed.origin(), &[1, 2, 0]);

        let restore = relaxed.origin().iter()
            .map(|&i| instance.nonnegative()[instance.origin().iter().position(|&k| k == i).unwrap()])
            .collect::<Vec<_>>();
        let restored = relaxed.nonnegativity_relaxation(&restore).unwrap();

        assert_eq!(restored.a(), instance.a());
        assert_eq!(restored.b(), instance.b());
        assert_eq!(restored.u(), instance.u());
        assert_eq!(restored.origin(), instance.origin());
        assert_eq!(restored.nonnegative(), instance.nonnegative());
    }

    #[test]
    fn block_order_follows_parent() {
        // x1 + x2 = 1 and x0 - x3 = 0: x1 and x2 are bounded, x0 and x3 are not
        let problem = RawProblem::from_i64(&[vec![0, 1, 1, 0], vec![1, 0, 0, -1]], &[1, 0], &[0; 4], &[None; 4]).unwrap();
        let instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();
        assert_eq!(instance.origin(), &[1, 2, 0, 3]);

        // Without a sign restriction on x2, x1 is unbounded as well
        let relaxed = instance.nonnegativity_relaxation(&[true, false, true, true]).unwrap();
        assert!(relaxed.is_consistent());
        assert_eq!((relaxed.bounded_end(), relaxed.nonnegative_end()), (0, 3));
        assert_eq!(relaxed.permutation().forward(), &[0, 3, 1, 2]);
        assert_eq!(relaxed.origin(), &[1, 0, 3, 2]);

        let restored = relaxed.nonnegativity_relaxation(&[true; 4]).unwrap();
        assert!(restored.is_consistent());
        assert_eq!(restored.origin(), instance.origin());
        assert_eq!(restored.a(), instance.a());
    }

    #[test]
    fn group() {
        let mut instance = problem_1::instance(SimplexOracle::default());
        let relaxation = instance.group_relaxation().unwrap();

        assert!(relaxation.is_consistent());
        assert_eq!(relaxation.nonnegative_end(), instance.nr_rows());

        // One variable is relaxed, which is not as many as there are constraints, so the objective
        // is carried over. Columns may have moved, compare them by root variable.
        let columns = |instance: &IpInstance<SimplexOracle>| {
            let columns = (0..instance.nr_columns())
                .map(|j| (instance.a().column(j), instance.objective()[j].clone()))
                .collect::<Vec<_>>();
            instance.to_root_order(&columns)
        };
        assert_eq!(columns(&relaxation), columns(&instance));
    }

    #[test]
    #[should_panic]
    fn basis_of_wrong_size() {
        let problem = problem_1::problem();
        let oracle = ScriptedOracle::new(vec![true; problem.nr_columns()]);
        let mut instance = IpInstance::new(problem, equality_form(), oracle).unwrap();
        let _ = instance.group_relaxation();
    }

    #[test]
    fn projection() {
        let instance = problem_2::instance(SimplexOracle::default());
        let relaxed = instance.nonnegativity_relaxation(&[true, false, false]).unwrap();
        assert_eq!(relaxed.nonnegative_end(), 1);

        let projected = relaxed.project(&[2]).unwrap();
        assert!(projected.is_consistent());
        assert_eq!(projected.nr_columns(), 2);
        assert_eq!(projected.b(), relaxed.b());
        assert_eq!(projected.a().column(0), relaxed.a().column(0));
        assert_eq!(projected.a().column(1), relaxed.a().column(1));
        assert!(projected.permutation().is_identity());
        assert_eq!(projected.to_root_order(&['p', 'q']).iter().filter(|value| value.is_none()).count(), 1);
    }

    #[test]
    #[should_panic]
    fn project_nonnegative() {
        let instance = problem_1::instance(SimplexOracle::default());
        let _ = instance.project(&[0]);
    }

    #[test]
    fn projection_without_integer_point() {
        // 2 x0 + x1 = 1 with x1 free: without x1 there is no integer solution
        let problem = RawProblem::from_i64(&[vec![2, 1]], &[1], &[0, 0], &[None, None])
            .unwrap()
            .with_nonnegative(vec![true, false])
            .unwrap();
        let instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();
        assert_eq!(instance.nonnegative_end(), 1);

        let result = instance.project(&[1]);
        assert!(matches!(result, Err(Error::NoIntegerSolution)));
    }

    #[test]
    fn unbounded_relaxation() {
        let problem = RawProblem::from_i64(&[vec![1, -1]], &[2], &[-1, 0], &[None, None]).unwrap();
        let mut instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();
        assert!(matches!(instance.optimal_basis(), Err(Error::UnboundedRelaxation)));
        assert!(matches!(instance.duals(), Err(Error::UnboundedRelaxation)));
    }
}

//! # Objectives for project-and-lift
//!
//! When lifting a lattice basis back over a projected variable, the lattice walk needs an
//! objective that ignores the variables that are already lifted, and that decreases along the
//! lattice exactly as the projected variable increases.
use log::debug;
use num::BigRational;
use num_traits::{One, Zero};

use crate::algorithm::oracle::{LinearProgram, Oracle, RelaxationResult};
use crate::data::linear_algebra::matrix::{RationalMatrix, inner_product};
use crate::data::linear_algebra::to_rational;
use crate::data::linear_program::elements::{ConstraintRelation, VariableType};
use crate::data::linear_program::instance::IpInstance;
use crate::error::Error;

impl<O: Oracle> IpInstance<O> {
    /// Create an instance with a new main objective `c = -e_target + A^T y`.
    ///
    /// The vector `y` is chosen such that `c` is zero on all variables in `sigma`. Because
    /// `A^T y` vanishes on the lattice, `c u = -u_target` for every lattice vector `u`.
    ///
    /// # Errors
    ///
    /// `IncompatibleObjective` if no such `y` exists.
    ///
    /// # Panics
    ///
    /// If `target` is not a variable, or if the computed objective doesn't have the required
    /// properties.
    pub fn reconstruct_objective(&mut self, target: usize, sigma: &[usize]) -> Result<Self, Error> {
        let (m, n) = (self.nr_rows(), self.nr_columns());
        assert!(target < n, "target {target} is not one of the {n} variables");

        let y = if sigma.is_empty() {
            vec![BigRational::zero(); m]
        } else {
            let a_sigma_transposed = self.a.select_columns(sigma).transpose().to_rational();
            let rhs = sigma.iter()
                .map(|&j| if j == target { BigRational::one() } else { BigRational::zero() })
                .collect();
            let program = LinearProgram::new(
                a_sigma_transposed,
                vec![ConstraintRelation::Equal; sigma.len()],
                rhs,
                vec![BigRational::zero(); m],
                vec![None; m],
                vec![None; m],
                vec![VariableType::Continuous; m],
            );

            match self.oracle.solve_relaxation(&program) {
                RelaxationResult::FiniteOptimum(optimum) => optimum.solution,
                RelaxationResult::Infeasible | RelaxationResult::Unbounded => {
                    return Err(Error::IncompatibleObjective { target });
                },
            }
        };

        let a = self.a.to_rational();
        let c = (0..n)
            .map(|j| {
                let value = inner_product(&y, &a.column(j));
                if j == target { value - BigRational::one() } else { value }
            })
            .collect::<Vec<_>>();

        assert!(sigma.iter().all(|&j| c[j].is_zero()), "objective should vanish on sigma");
        assert!(
            self.lattice.basis().rows().all(|row| {
                inner_product(&c, &to_rational(row)) == -BigRational::from_integer(row[target].clone())
            }),
            "objective should decrease along the lattice as the target increases",
        );
        debug!("Reconstructed objective for target {target}, vanishing on {} variables", sigma.len());

        let mut instance = self.clone();
        let mut rows = self.c.clone().into_rows();
        rows[0] = c;
        instance.c = RationalMatrix::new(rows, n);
        debug_assert!(instance.is_consistent());

        Ok(instance)
    }
}

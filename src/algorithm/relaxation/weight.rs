//! # Weights from the row span
//!
//! A vector `w = A^T y` has the same inner product `y^T b` with every point of a fiber. When `w`
//! is positive on a variable, that variable is bounded on the fiber as long as the other
//! coordinates are controlled, which is what truncation of a lattice walk needs.
use log::debug;
use num::{BigInt, BigRational, Integer};
use num_traits::{One, Zero};

use crate::algorithm::oracle::{LinearProgram, Oracle, RelaxationResult};
use crate::data::linear_algebra::matrix::RationalMatrix;
use crate::data::linear_program::elements::{ConstraintRelation, VariableClass, VariableType};
use crate::data::linear_program::instance::IpInstance;

impl<O: Oracle> IpInstance<O> {
    /// Weight that is at least one on every nonnegative variable that is unbounded.
    ///
    /// The weight is nonnegative on the bounded variables, and unrestricted on the free
    /// variables. Among those, one with minimal total weight on the nonnegative variables is
    /// chosen and scaled to integers.
    ///
    /// # Return value
    ///
    /// The zero vector if no such weight exists. Truncation should then be disabled.
    pub fn truncation_weight(&mut self) -> Vec<BigInt> {
        let program = self.weight_program(|class| match class {
            VariableClass::Bounded => BigRational::zero(),
            VariableClass::Unbounded | VariableClass::Free => BigRational::one(),
        });

        self.solve_weight(&program).unwrap_or_else(|| {
            debug!("No truncation weight exists, truncation is disabled");
            vec![BigInt::zero(); self.nr_columns()]
        })
    }

    /// Weight that is at least one on every nonnegative variable.
    ///
    /// # Return value
    ///
    /// `None` if the row span contains no such vector.
    pub fn positive_row_span(&mut self) -> Option<Vec<BigInt>> {
        let program = self.weight_program(|_| BigRational::one());

        self.solve_weight(&program)
    }

    /// The program `min sum_{j nonnegative} w_j s.t. w - A^T y = 0` over `(y, w)`.
    ///
    /// # Arguments
    ///
    /// * `minimum`: Lower bound on the weight of a nonnegative variable, by class. It is not
    ///   called for free variables.
    fn weight_program(&self, minimum: impl Fn(VariableClass) -> BigRational) -> LinearProgram {
        let (m, n) = (self.nr_rows(), self.nr_columns());

        let negated_transpose = self.a.transpose().map(|value| BigRational::from_integer(-value));
        let constraints = negated_transpose.hcat(&RationalMatrix::identity(n));

        let mut cost = vec![BigRational::zero(); m];
        let mut lower = vec![None; m];
        for j in 0..n {
            match self.variable_class(j) {
                VariableClass::Free => {
                    cost.push(BigRational::zero());
                    lower.push(None);
                },
                class => {
                    cost.push(BigRational::one());
                    lower.push(Some(minimum(class)));
                },
            }
        }

        LinearProgram::new(
            constraints,
            vec![ConstraintRelation::Equal; n],
            vec![BigRational::zero(); n],
            cost,
            lower,
            vec![None; m + n],
            vec![VariableType::Continuous; m + n],
        )
    }

    fn solve_weight(&mut self, program: &LinearProgram) -> Option<Vec<BigInt>> {
        match self.oracle.solve_relaxation(program) {
            RelaxationResult::FiniteOptimum(optimum) => Some(scale_to_integers(&optimum.solution[self.nr_rows()..])),
            RelaxationResult::Infeasible | RelaxationResult::Unbounded => None,
        }
    }
}

/// Multiply by the least common multiple of the denominators.
fn scale_to_integers(values: &[BigRational]) -> Vec<BigInt> {
    let multiple = values.iter()
        .fold(BigInt::one(), |multiple, value| multiple.lcm(value.denom()));

    values.iter()
        .map(|value| value.numer() * (&multiple / value.denom()))
        .collect()
}

#[cfg(test)]
mod test {
    use num::{BigInt, BigRational};

    use crate::algorithm::oracle::simplex::SimplexOracle;
    use crate::algorithm::relaxation::weight::scale_to_integers;
    use crate::data::linear_program::instance::IpInstance;
    use crate::data::linear_program::problem::RawProblem;
    use crate::tests::{equality_form, problem_1};

    fn ints(values: &[i64]) -> Vec<BigInt> {
        values.iter().map(|&v| BigInt::from(v)).collect()
    }

    #[test]
    fn scaling() {
        let values = [
            BigRational::new(BigInt::from(1), BigInt::from(2)),
            BigRational::new(BigInt::from(-2), BigInt::from(3)),
            BigRational::from_integer(BigInt::from(4)),
        ];
        assert_eq!(scale_to_integers(&values), ints(&[3, -4, 24]));
    }

    #[test]
    fn free_variable_compensates() {
        // x0 - x1 = 2, x1 free
        let problem = RawProblem::from_i64(&[vec![1, -1]], &[2], &[0, 0], &[None, None])
            .unwrap()
            .with_nonnegative(vec![true, false])
            .unwrap();
        let mut instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();
        assert_eq!((instance.bounded_end(), instance.nonnegative_end()), (0, 1));

        assert_eq!(instance.truncation_weight(), ints(&[1, -1]));
        assert_eq!(instance.positive_row_span(), Some(ints(&[1, -1])));
    }

    #[test]
    fn no_weight() {
        // x0 - x1 = 2, both unbounded
        let problem = RawProblem::from_i64(&[vec![1, -1]], &[2], &[0, 0], &[None, None]).unwrap();
        let mut instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();

        assert_eq!(instance.truncation_weight(), ints(&[0, 0]));
        assert_eq!(instance.positive_row_span(), None);
    }

    #[test]
    fn bounded() {
        let mut instance = problem_1::instance(SimplexOracle::default());

        assert_eq!(instance.truncation_weight(), ints(&[0, 0, 0]));
        assert_eq!(instance.positive_row_span(), Some(ints(&[1, 2, 1])));
    }
}

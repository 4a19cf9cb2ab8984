//! # Integer program instances
//!
//! The end product of the pipeline: an equality system with its variables grouped by class, the
//! lattice of the system and an oracle to ask questions about the relaxation. Instances are never
//! modified after construction; relaxations and projections create new instances.
use num::{BigInt, BigRational};

use crate::algorithm::lattice::LatticeBasis;
use crate::algorithm::oracle::{LinearProgram, Oracle};
use crate::config::Options;
use crate::data::linear_algebra::matrix::{IntegerMatrix, RationalMatrix};
use crate::data::linear_program::elements::{Objective, VariableClass, VariableType};
use crate::data::linear_program::extract::extract;
use crate::data::linear_program::model::Model;
use crate::data::linear_program::permutation::Permutation;
use crate::data::linear_program::problem::RawProblem;
use crate::error::Error;

pub use builder::Builder;

pub mod builder;

/// An integer program `min c x s.t. Ax = b, x <= u`, with `x >= 0` on the nonnegative variables.
///
/// Columns are ordered as
///
/// ```text
/// | bounded, nonnegative | unbounded, nonnegative | free |
/// 0                bounded_end            nonnegative_end     n
/// ```
///
/// and within each group in the order the variables had before classification. For a derived
/// instance, that is the column order of the instance it was derived from.
#[derive(Debug, Clone)]
pub struct IpInstance<O> {
    pub(crate) a: IntegerMatrix,
    pub(crate) b: Vec<BigInt>,
    /// Objective rows, only the first is optimized.
    pub(crate) c: RationalMatrix,
    pub(crate) u: Vec<Option<BigInt>>,
    pub(crate) nonnegative: Vec<bool>,
    pub(crate) variable_types: Vec<VariableType>,

    /// From the order of the data before classification to the current order.
    pub(crate) permutation: Permutation,
    pub(crate) bounded_end: usize,
    pub(crate) nonnegative_end: usize,
    /// Nonnegative integer variables with upper bound one.
    pub(crate) binaries: Vec<bool>,
    /// Boundedness of each variable, in the order before classification.
    pub(crate) originally_bounded: Vec<bool>,

    /// For each column, the column of the root instance it descends from.
    pub(crate) origin: Vec<usize>,
    pub(crate) nr_root_columns: usize,
    /// Size of the problem before normalization or extraction.
    pub(crate) nr_original_constraints: usize,
    pub(crate) nr_original_variables: usize,
    pub(crate) sense: Objective,
    pub(crate) options: Options,

    pub(crate) lattice: LatticeBasis,
    pub(crate) oracle: O,
}

impl<O: Oracle> IpInstance<O> {
    /// Build an instance from raw data with the given options.
    ///
    /// See `Builder` for more control.
    pub fn new(problem: RawProblem, options: Options, oracle: O) -> Result<Self, Error> {
        Builder::new(problem, oracle).options(options).build()
    }

    /// Build an instance from a model.
    ///
    /// Extracted data is in equality form already, so it is never normalized again. The sense of
    /// the model is kept, while the objective is always stored as a minimization objective.
    pub fn from_model(model: &impl Model, options: Options, oracle: O) -> Result<Self, Error> {
        let extraction = extract(model, &options)?;

        Builder::new(extraction.problem, oracle)
            .options(Options { apply_normalization: false, ..options })
            .sense(extraction.sense)
            .original_dimensions(extraction.nr_model_constraints, extraction.nr_model_variables)
            .build()
    }

    /// Linear relaxation of this instance with the main objective.
    pub fn relaxation(&self) -> LinearProgram {
        relaxation_program(&self.a, &self.b, self.c.row(0), &self.u, &self.nonnegative)
    }

    /// This instance as an integer program with the main objective.
    ///
    /// Only the integer variables are required to be integral.
    pub fn integer_program(&self) -> LinearProgram {
        LinearProgram::equality_form(
            &self.a, &self.b, self.c.row(0), &self.u, &self.nonnegative, self.variable_types.clone(),
        )
    }

    /// Clone of the oracle, for use by derived instances.
    pub(crate) fn oracle(&self) -> O {
        self.oracle.clone()
    }

    /// The raw data of this instance, for deriving new instances from.
    pub(crate) fn to_problem(&self) -> RawProblem {
        RawProblem {
            a: self.a.clone(),
            b: self.b.clone(),
            c: self.c.clone(),
            u: self.u.clone(),
            nonnegative: self.nonnegative.clone(),
            variable_types: self.variable_types.clone(),
        }
    }

    /// Whether all invariants hold.
    ///
    /// Full row rank is not part of it: projected instances may lose rank, the lattice records
    /// the actual rank.
    pub fn is_consistent(&self) -> bool {
        let (m, n) = (self.nr_rows(), self.nr_columns());

        let dimensions = self.b.len() == m
            && self.c.nr_columns() == n
            && self.c.nr_rows() > 0
            && self.u.len() == n
            && self.nonnegative.len() == n
            && self.variable_types.len() == n
            && self.binaries.len() == n
            && self.originally_bounded.len() == n
            && self.origin.len() == n
            && self.permutation.len() == n;
        if !dimensions {
            return false;
        }

        let blocks = self.bounded_end <= self.nonnegative_end
            && self.nonnegative_end <= n
            && (0..n).all(|j| self.nonnegative[j] == (j < self.nonnegative_end))
            && (0..self.nonnegative_end)
                .all(|j| self.originally_bounded[self.permutation.inverse()[j]] == (j < self.bounded_end));
        let stable = [0..self.bounded_end, self.bounded_end..self.nonnegative_end, self.nonnegative_end..n]
            .into_iter()
            .all(|block| self.permutation.inverse()[block].is_sorted_by(|x, y| x < y));
        let origins = self.origin.iter().all(|&i| i < self.nr_root_columns);
        let permutation = (0..n).all(|i| self.permutation.inverse()[self.permutation.forward()[i]] == i);
        let binaries = (0..n).all(|j| {
            self.binaries[j] == (self.nonnegative[j]
                && self.variable_types[j] == VariableType::Integer
                && self.u[j].as_ref().is_some_and(|u| *u == BigInt::from(1)))
        });

        blocks
            && stable
            && origins
            && permutation
            && binaries
            && self.lattice.is_consistent(&self.a, &self.b)
    }
}

impl<O> IpInstance<O> {
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

    /// All objective rows.
    pub fn c(&self) -> &RationalMatrix {
        &self.c
    }

    /// Main objective, always minimized.
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

    /// Permutation applied during classification.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// End of the group of bounded variables.
    pub fn bounded_end(&self) -> usize {
        self.bounded_end
    }

    /// End of the group of nonnegative variables.
    pub fn nonnegative_end(&self) -> usize {
        self.nonnegative_end
    }

    /// Nonnegative integer variables with an upper bound of one.
    pub fn binaries(&self) -> &[bool] {
        &self.binaries
    }

    /// Boundedness of the variables before they were permuted.
    pub fn originally_bounded(&self) -> &[bool] {
        &self.originally_bounded
    }

    /// Root variable of each column.
    pub fn origin(&self) -> &[usize] {
        &self.origin
    }

    /// Number of constraints of the problem as it was provided.
    pub fn nr_original_constraints(&self) -> usize {
        self.nr_original_constraints
    }

    /// Number of variables of the problem as it was provided.
    pub fn nr_original_variables(&self) -> usize {
        self.nr_original_variables
    }

    /// Direction of optimization of the problem as it was provided.
    pub fn sense(&self) -> Objective {
        self.sense
    }

    /// Options this instance was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Lattice of the equality system.
    pub fn lattice(&self) -> &LatticeBasis {
        &self.lattice
    }

    /// Group of a variable.
    pub fn variable_class(&self, j: usize) -> VariableClass {
        debug_assert!(j < self.nr_columns());

        if j < self.bounded_end {
            VariableClass::Bounded
        } else if j < self.nonnegative_end {
            VariableClass::Unbounded
        } else {
            VariableClass::Free
        }
    }

    /// Reorder values from the order before classification into the column order.
    pub fn permute<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.permutation.apply(values)
    }

    /// Reorder values from the column order into the order before classification.
    pub fn inverse_permute<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.permutation.apply_inverse(values)
    }

    /// Place values of this instance at the positions of their root variables.
    ///
    /// Root variables that no longer have a column, for example because they were projected away,
    /// get `None`.
    pub fn to_root_order<T: Clone>(&self, values: &[T]) -> Vec<Option<T>> {
        debug_assert_eq!(values.len(), self.nr_columns());

        let mut root = vec![None; self.nr_root_columns];
        for (&i, value) in self.origin.iter().zip(values) {
            root[i] = Some(value.clone());
        }

        root
    }
}

/// The linear relaxation of an equality system.
///
/// Everything that asks the oracle about the relaxation of an instance goes through here, such
/// that identical questions produce identical programs.
pub(crate) fn relaxation_program(
    a: &IntegerMatrix,
    b: &[BigInt],
    objective: &[BigRational],
    u: &[Option<BigInt>],
    nonnegative: &[bool],
) -> LinearProgram {
    LinearProgram::equality_form(a, b, objective, u, nonnegative, vec![VariableType::Continuous; a.nr_columns()])
}

#[cfg(test)]
mod test {
    use num::BigInt;

    use crate::algorithm::oracle::simplex::SimplexOracle;
    use crate::config::Options;
    use crate::data::linear_program::elements::{Objective, VariableClass, VariableType};
    use crate::data::linear_program::instance::IpInstance;
    use crate::data::linear_program::problem::RawProblem;
    use crate::error::Error;

    fn options() -> Options {
        Options { apply_normalization: false, ..Options::default() }
    }

    #[test]
    fn path() {
        let problem = RawProblem::from_i64(&[vec![1, 1, 0], vec![0, 1, 1]], &[1, 1], &[1, 2, 3], &[None; 3]).unwrap();
        let instance = IpInstance::new(problem, options(), SimplexOracle::default()).unwrap();

        assert!(instance.is_consistent());
        assert_eq!(instance.bounded_end(), 3);
        assert_eq!(instance.nonnegative_end(), 3);
        assert!(instance.permutation().is_identity());
        assert_eq!(instance.lattice().dimension(), 1);
        assert_eq!(instance.sense(), Objective::Minimize);
        assert_eq!(instance.binaries(), &[false, false, false]);
        assert_eq!(instance.to_root_order(&[7, 8, 9]), vec![Some(7), Some(8), Some(9)]);
    }

    #[test]
    fn groups() {
        // x0 - x1 + x2 = 1, x2 <= 1, x0 free
        let problem = RawProblem::from_i64(&[vec![1, -1, 1]], &[1], &[0, 0, 0], &[None, None, Some(1)])
            .unwrap()
            .with_nonnegative(vec![false, true, true])
            .unwrap();
        let instance = IpInstance::new(problem, options(), SimplexOracle::default()).unwrap();

        assert!(instance.is_consistent());
        assert_eq!(instance.permutation().forward(), &[2, 1, 0]);
        assert_eq!(instance.origin(), &[2, 1, 0]);
        assert_eq!((instance.bounded_end(), instance.nonnegative_end()), (1, 2));
        assert_eq!(instance.variable_class(0), VariableClass::Bounded);
        assert_eq!(instance.variable_class(1), VariableClass::Unbounded);
        assert_eq!(instance.variable_class(2), VariableClass::Free);
        assert_eq!(instance.binaries(), &[true, false, false]);
        assert_eq!(instance.originally_bounded(), &[false, false, true]);
        assert_eq!(instance.inverse_permute(&instance.permute(&['a', 'b', 'c'])), vec!['a', 'b', 'c']);
        assert_eq!(instance.a().row(0), &[1, -1, 1].map(BigInt::from));
    }

    #[test]
    fn normalized() {
        // x0 + x1 <= 4, x0 <= 3, maximize x0 + 2 x1
        let problem = RawProblem::from_i64(&[vec![1, 1]], &[4], &[1, 2], &[Some(3), None]).unwrap();
        let instance = IpInstance::new(problem, Options::default(), SimplexOracle::default()).unwrap();

        assert!(instance.is_consistent());
        assert_eq!(instance.nr_rows(), 2);
        assert_eq!(instance.nr_columns(), 4);
        assert_eq!(instance.nr_original_constraints(), 1);
        assert_eq!(instance.nr_original_variables(), 2);
        assert_eq!(instance.sense(), Objective::Maximize);
        assert_eq!(instance.bounded_end(), 4);
        assert_eq!(instance.lattice().dimension(), 2);
    }

    #[test]
    fn infeasible() {
        let problem = RawProblem::from_i64(&[vec![1, 1]], &[-1], &[0, 0], &[Some(1), Some(1)]).unwrap();
        let result = IpInstance::new(problem, options(), SimplexOracle::default());
        assert!(matches!(result, Err(Error::InfeasibleRelaxation)));
    }

    #[test]
    fn no_integer_point() {
        let problem = RawProblem::from_i64(&[vec![2, 2]], &[3], &[0, 0], &[None, None]).unwrap();
        let result = IpInstance::new(problem, options(), SimplexOracle::default());
        assert!(matches!(result, Err(Error::NoIntegerSolution)));
    }

    #[test]
    fn variable_types() {
        // x0 + x1 = 1 with x1 continuous, both at most one
        let types = vec![VariableType::Integer, VariableType::Continuous];
        let problem = RawProblem::from_i64(&[vec![1, 1]], &[1], &[0, 0], &[Some(1), Some(1)])
            .unwrap()
            .with_variable_types(types.clone())
            .unwrap();
        let instance = IpInstance::new(problem, options(), SimplexOracle::default()).unwrap();

        assert!(instance.is_consistent());
        assert_eq!(instance.variable_types(), types.as_slice());
        assert_eq!(instance.binaries(), &[true, false]);
        assert_eq!(instance.integer_program().variable_types, types);
        assert_eq!(instance.relaxation().variable_types, vec![VariableType::Continuous; 2]);
    }
}

//! # Linear and integer programming oracle
//!
//! All questions about the polyhedra of an instance (is it feasible, is a variable bounded, which
//! basis is optimal) are delegated to an oracle. The contract is small such that it can be
//! implemented on top of any exact solver, or replaced by a scripted stub in tests.
use num::{BigInt, BigRational};
use num_traits::Zero;
use thiserror::Error;

use crate::data::linear_algebra::matrix::{IntegerMatrix, RationalMatrix, inner_product};
use crate::data::linear_algebra::to_rational;
use crate::data::linear_program::elements::{ConstraintRelation, VariableType};

pub mod branch_and_bound;
pub mod simplex;

/// A linear program, possibly with integrality requirements, always minimized.
///
/// Variables without a lower bound are free from below, and variables without an upper bound are
/// free from above.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LinearProgram {
    /// Row major constraint coefficients.
    pub constraints: RationalMatrix,
    /// Relation of each row to its right-hand side.
    pub relations: Vec<ConstraintRelation>,
    /// Right-hand side.
    pub b: Vec<BigRational>,
    /// Cost vector to minimize.
    pub cost: Vec<BigRational>,
    /// Lower bound per variable.
    pub lower: Vec<Option<BigRational>>,
    /// Upper bound per variable.
    pub upper: Vec<Option<BigRational>>,
    /// Integrality requirements, only relevant to integer queries.
    pub variable_types: Vec<VariableType>,
}

impl LinearProgram {
    /// Create a new program.
    ///
    /// # Arguments
    ///
    /// * `constraints`: Matrix of size `m x n`.
    /// * `relations`: Length `m`.
    /// * `b`: Length `m`.
    /// * `cost`: Length `n`.
    /// * `lower`, `upper`, `variable_types`: Length `n`.
    pub fn new(
        constraints: RationalMatrix,
        relations: Vec<ConstraintRelation>,
        b: Vec<BigRational>,
        cost: Vec<BigRational>,
        lower: Vec<Option<BigRational>>,
        upper: Vec<Option<BigRational>>,
        variable_types: Vec<VariableType>,
    ) -> Self {
        let program = Self { constraints, relations, b, cost, lower, upper, variable_types };
        debug_assert!(program.is_consistent());

        program
    }

    /// The program `min cost x s.t. Ax = b, x >= 0 where nonnegative, x <= u`.
    pub fn equality_form(
        a: &IntegerMatrix,
        b: &[BigInt],
        cost: &[BigRational],
        u: &[Option<BigInt>],
        nonnegative: &[bool],
        variable_types: Vec<VariableType>,
    ) -> Self {
        Self::new(
            a.to_rational(),
            vec![ConstraintRelation::Equal; a.nr_rows()],
            to_rational(b),
            cost.to_vec(),
            nonnegative.iter()
                .map(|&nonnegative| if nonnegative { Some(BigRational::zero()) } else { None })
                .collect(),
            u.iter().map(|bound| bound.clone().map(BigRational::from_integer)).collect(),
            variable_types,
        )
    }

    /// Number of constraints.
    pub fn nr_rows(&self) -> usize {
        self.constraints.nr_rows()
    }

    /// Number of variables.
    pub fn nr_columns(&self) -> usize {
        self.constraints.nr_columns()
    }

    /// Replace the cost vector.
    #[must_use]
    pub fn with_cost(mut self, cost: Vec<BigRational>) -> Self {
        debug_assert_eq!(cost.len(), self.nr_columns());

        self.cost = cost;
        self
    }

    /// Evaluate the cost vector.
    pub fn value(&self, x: &[BigRational]) -> BigRational {
        inner_product(&self.cost, x)
    }

    fn is_consistent(&self) -> bool {
        let (m, n) = (self.nr_rows(), self.nr_columns());

        self.relations.len() == m
            && self.b.len() == m
            && self.cost.len() == n
            && self.lower.len() == n
            && self.upper.len() == n
            && self.variable_types.len() == n
    }
}

/// Outcome of solving a linear relaxation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RelaxationResult {
    /// No point satisfies the constraints.
    Infeasible,
    /// The cost can be decreased without limit.
    Unbounded,
    /// An optimal vertex was found.
    FiniteOptimum(Optimum),
}

impl RelaxationResult {
    /// Whether the polyhedron is nonempty.
    pub fn is_feasible(&self) -> bool {
        !matches!(self, RelaxationResult::Infeasible)
    }
}

/// An optimal vertex with its certificate.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Optimum {
    /// Objective value.
    pub value: BigRational,
    /// Value of each variable.
    pub solution: Vec<BigRational>,
    /// Whether each variable is basic in the optimal basis.
    ///
    /// Exactly as many variables are basic as the equality system has rows, provided that system
    /// has full row rank.
    pub basis: Vec<bool>,
    /// Dual value of each constraint.
    pub duals: Vec<BigRational>,
}

/// Status of an integer query.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IntegerStatus {
    /// An optimal integer solution was found.
    Optimal,
    /// There is no integer solution.
    Infeasible,
    /// Integer solutions exist with arbitrarily low cost.
    Unbounded,
    /// The relaxation is unbounded, but the search could not establish whether an integer point
    /// exists.
    DualInfeasible,
}

/// Outcome of an integer query.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IntegerResult {
    /// What is known about the program.
    pub status: IntegerStatus,
    /// An integer solution, if one was found.
    pub solution: Option<Vec<BigRational>>,
    /// Value of the solution, if it is optimal.
    pub value: Option<BigRational>,
}

impl IntegerResult {
    /// No integer solution exists.
    pub fn infeasible() -> Self {
        Self { status: IntegerStatus::Infeasible, solution: None, value: None }
    }
}

/// Failures of an oracle that don't correspond to a solution status.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum OracleError {
    /// Branch and bound needed more nodes than allowed.
    #[error("node limit of {0} reached")]
    NodeLimit(usize),
    /// The underlying solver reported a status that has no meaning in this contract.
    #[error("unsupported solver status: {0}")]
    UnsupportedStatus(String),
}

/// Exact solver for linear relaxations and integer programs.
///
/// Instances own an oracle. Every derived instance receives a clone of the oracle of its parent,
/// such that queries on one instance never influence another.
pub trait Oracle: Clone {
    /// Solve the linear relaxation, ignoring all integrality requirements.
    fn solve_relaxation(&mut self, problem: &LinearProgram) -> RelaxationResult;

    /// Solve the program with its integrality requirements.
    fn solve_integer(&mut self, problem: &LinearProgram) -> Result<IntegerResult, OracleError>;

    /// Whether the linear relaxation has a feasible point.
    fn is_feasible(&mut self, problem: &LinearProgram) -> bool {
        self.solve_relaxation(problem).is_feasible()
    }

    /// Whether the linear relaxation has a finite optimum.
    fn is_bounded(&mut self, problem: &LinearProgram) -> bool {
        matches!(self.solve_relaxation(problem), RelaxationResult::FiniteOptimum(_))
    }

    /// Basic variables of an optimal basis of the linear relaxation, if there is an optimum.
    fn optimal_basis(&mut self, problem: &LinearProgram) -> Option<Vec<bool>> {
        match self.solve_relaxation(problem) {
            RelaxationResult::FiniteOptimum(optimum) => Some(optimum.basis),
            _ => None,
        }
    }

    /// Optimal dual values of the linear relaxation, if there is an optimum.
    fn duals(&mut self, problem: &LinearProgram) -> Option<Vec<BigRational>> {
        match self.solve_relaxation(problem) {
            RelaxationResult::FiniteOptimum(optimum) => Some(optimum.duals),
            _ => None,
        }
    }
}

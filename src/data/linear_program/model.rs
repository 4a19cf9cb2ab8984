//! # Models
//!
//! The minimal view on an optimization model that is needed to extract an integer program from it.
//! Anything that can enumerate linear constraints, variable bounds and a linear objective can be
//! turned into an instance.
use crate::data::linear_program::elements::{BoundDirection, ConstraintRelation, Objective, VariableType};

/// A linear constraint `sum of terms <relation> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Pairs of a variable index and its coefficient. Indices may repeat, their coefficients add.
    pub terms: Vec<(usize, f64)>,
    /// How the activity relates to the right-hand side.
    pub relation: ConstraintRelation,
    /// Right-hand side.
    pub rhs: f64,
}

/// A single bound on a single variable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VariableBound {
    /// Index of the variable.
    pub variable: usize,
    /// Whether this is a lower or an upper bound.
    pub direction: BoundDirection,
    /// Value of the bound, infinite values are no bound at all.
    pub value: f64,
}

/// Read access to an optimization model.
///
/// Variables are identified by their index in `0..nr_variables()`. Variables without a lower bound
/// have no sign restriction.
pub trait Model {
    /// Number of variables.
    fn nr_variables(&self) -> usize;

    /// All linear constraints.
    fn constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_;

    /// All variable bounds.
    fn bounds(&self) -> impl Iterator<Item = VariableBound> + '_;

    /// Whether the variable has an integrality requirement.
    fn variable_type(&self, variable: usize) -> VariableType;

    /// Whether the variable is restricted to zero and one.
    fn is_binary(&self, variable: usize) -> bool;

    /// Terms of the linear objective, pairs of a variable index and its coefficient.
    fn objective(&self) -> impl Iterator<Item = (usize, f64)> + '_;

    /// Direction of optimization.
    fn sense(&self) -> Objective;
}

/// A model stored as plain lists, built up one element at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearModel {
    variables: Vec<(String, VariableType, bool)>,
    constraints: Vec<LinearConstraint>,
    bounds: Vec<VariableBound>,
    objective: Vec<(usize, f64)>,
    sense: Objective,
}

impl LinearModel {
    /// Create an empty model.
    pub fn new(sense: Objective) -> Self {
        Self { sense, ..Self::default() }
    }

    /// Add a variable without bounds.
    ///
    /// # Return value
    ///
    /// The index of the new variable.
    pub fn add_variable(&mut self, name: impl Into<String>, variable_type: VariableType) -> usize {
        self.variables.push((name.into(), variable_type, false));
        self.variables.len() - 1
    }

    /// Add a variable that is restricted to zero and one.
    ///
    /// The restriction is a marker only, the bounds are derived from it during extraction when
    /// requested.
    pub fn add_binary(&mut self, name: impl Into<String>) -> usize {
        self.variables.push((name.into(), VariableType::Integer, true));
        self.variables.len() - 1
    }

    /// Name of a variable.
    pub fn name(&self, variable: usize) -> &str {
        &self.variables[variable].0
    }

    /// Add a constraint.
    pub fn add_constraint(&mut self, terms: Vec<(usize, f64)>, relation: ConstraintRelation, rhs: f64) {
        self.constraints.push(LinearConstraint { terms, relation, rhs });
    }

    /// Add a bound on a variable.
    pub fn add_bound(&mut self, variable: usize, direction: BoundDirection, value: f64) {
        self.bounds.push(VariableBound { variable, direction, value });
    }

    /// Replace the objective.
    pub fn set_objective(&mut self, terms: Vec<(usize, f64)>) {
        self.objective = terms;
    }
}

impl Model for LinearModel {
    fn nr_variables(&self) -> usize {
        self.variables.len()
    }

    fn constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_ {
        self.constraints.iter().cloned()
    }

    fn bounds(&self) -> impl Iterator<Item = VariableBound> + '_ {
        self.bounds.iter().copied()
    }

    fn variable_type(&self, variable: usize) -> VariableType {
        self.variables[variable].1
    }

    fn is_binary(&self, variable: usize) -> bool {
        self.variables[variable].2
    }

    fn objective(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.objective.iter().copied()
    }

    fn sense(&self) -> Objective {
        self.sense
    }
}

//! # Building blocks to describe linear and integer programs.
use std::ops::Neg;

use enum_map::Enum;
use num_traits::One;

/// A `ConstraintRelation` is a type of (in)equality.
///
/// These are read "from constraint to constraint value", so `Less` means `<a, x> <= b`.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstraintRelation {
    Equal,
    Greater,
    Less,
}

impl ConstraintRelation {
    /// Direction of the bound this relation places on the row activity, if any.
    pub fn bound_direction(self) -> Option<BoundDirection> {
        match self {
            ConstraintRelation::Equal => None,
            ConstraintRelation::Greater => Some(BoundDirection::Lower),
            ConstraintRelation::Less => Some(BoundDirection::Upper),
        }
    }
}

/// Direction of a bound.
///
/// Is used more generally in the case where the three variants of the `ConstraintRelation` don't
/// suit the needs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoundDirection {
    /// In the case of a variable, x >= b.
    Lower,
    /// In the case of a variable, x <= b.
    Upper,
}

impl BoundDirection {
    /// Coefficient of the slack that turns a bound in this direction into an equality.
    ///
    /// Upper bounds needs positive slacks, lower bounds need negative slacks.
    #[must_use]
    pub fn into<F: One + Neg<Output = F>>(self) -> F {
        match self {
            BoundDirection::Lower => -F::one(),
            BoundDirection::Upper => F::one(),
        }
    }
}

/// A variable is either continuous or integer.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VariableType {
    Continuous,
    Integer,
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Objective {
    Maximize,
    #[default]
    Minimize,
}

/// The three groups variables of an instance are sorted into.
///
/// The order of the variants is the order of the groups in the column order of an instance.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum VariableClass {
    /// Nonnegative, and bounded from above in every feasible solution.
    Bounded,
    /// Nonnegative, but not bounded from above.
    Unbounded,
    /// No sign restriction.
    Free,
}

impl VariableClass {
    /// Derive the group from the two properties that define it.
    pub fn of(nonnegative: bool, bounded: bool) -> Self {
        match (nonnegative, bounded) {
            (true, true) => VariableClass::Bounded,
            (true, false) => VariableClass::Unbounded,
            (false, _) => VariableClass::Free,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::{BoundDirection, ConstraintRelation, VariableClass};

    #[test]
    fn slack_signs() {
        assert_eq!(ConstraintRelation::Less.bound_direction().map(BoundDirection::into::<i32>), Some(1));
        assert_eq!(ConstraintRelation::Greater.bound_direction().map(BoundDirection::into::<i32>), Some(-1));
        assert_eq!(ConstraintRelation::Equal.bound_direction(), None);
    }

    #[test]
    fn classes_are_ordered() {
        assert!(VariableClass::Bounded < VariableClass::Unbounded);
        assert!(VariableClass::Unbounded < VariableClass::Free);
        assert_eq!(VariableClass::of(false, true), VariableClass::Free);
        assert_eq!(VariableClass::of(true, false), VariableClass::Unbounded);
    }
}

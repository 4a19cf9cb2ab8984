//! # Building instances
//!
//! Construction happens in two phases. The raw data is validated when the `RawProblem` is created,
//! which doesn't need an oracle. The second phase classifies the variables, permutes them and
//! computes the lattice, asking the oracle whatever it needs to know.
use log::{debug, warn};
use num::BigInt;

use crate::algorithm::classification::{classify, group};
use crate::algorithm::lattice::LatticeBasis;
use crate::algorithm::oracle::Oracle;
use crate::config::Options;
use crate::data::linear_algebra::elimination::independent_rows;
use crate::data::linear_algebra::matrix::IntegerMatrix;
use crate::data::linear_program::elements::{Objective, VariableClass, VariableType};
use crate::data::linear_program::instance::{IpInstance, relaxation_program};
use crate::data::linear_program::normalize::normalize;
use crate::data::linear_program::problem::RawProblem;
use crate::error::Error;

/// Builds an instance from validated raw data.
///
/// ```
/// # use relp_lattice::algorithm::oracle::simplex::SimplexOracle;
/// # use relp_lattice::config::Options;
/// # use relp_lattice::data::linear_program::instance::Builder;
/// # use relp_lattice::data::linear_program::problem::RawProblem;
/// let problem = RawProblem::from_i64(&[vec![1, 1]], &[4], &[1, 1], &[None, None]).unwrap();
/// let instance = Builder::new(problem, SimplexOracle::default())
///     .options(Options::default())
///     .build()
///     .unwrap();
/// assert_eq!(instance.nr_columns(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Builder<O> {
    problem: RawProblem,
    oracle: O,
    options: Options,
    sense: Option<Objective>,
    original_dimensions: Option<(usize, usize)>,
}

impl<O: Oracle> Builder<O> {
    /// Start building from raw data.
    pub fn new(problem: RawProblem, oracle: O) -> Self {
        Self {
            problem,
            oracle,
            options: Options::default(),
            sense: None,
            original_dimensions: None,
        }
    }

    /// Replace the default options.
    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Direction of optimization of the problem as provided.
    ///
    /// Without it, the problem is taken to be a maximization problem exactly when normalization
    /// inverts the objective.
    #[must_use]
    pub fn sense(mut self, sense: Objective) -> Self {
        self.sense = Some(sense);
        self
    }

    /// Size of the problem before it was turned into raw data.
    #[must_use]
    pub(crate) fn original_dimensions(mut self, nr_constraints: usize, nr_variables: usize) -> Self {
        self.original_dimensions = Some((nr_constraints, nr_variables));
        self
    }

    /// Normalize, classify and compute the lattice.
    ///
    /// # Errors
    ///
    /// * `InfeasibleRelaxation` if the relaxation has no feasible point, including the case where
    ///   the right-hand side is not in the column span of the constraint matrix.
    /// * `NoIntegerSolution` if the equality system has no integer solution.
    /// * Errors of the oracle during classification.
    pub fn build(self) -> Result<IpInstance<O>, Error> {
        let Self { problem, oracle, options, sense, original_dimensions } = self;

        let (nr_original_constraints, nr_original_variables) = original_dimensions
            .unwrap_or((problem.nr_rows(), problem.nr_columns()));
        let sense = sense.unwrap_or(if options.apply_normalization && options.invert_objective {
            Objective::Maximize
        } else {
            Objective::Minimize
        });

        let mut problem = normalize(problem, &options);
        enforce_full_row_rank(&mut problem)?;
        let n = problem.nr_columns();

        finish(problem, oracle, Derivation {
            origin: (0..n).collect(),
            nr_root_columns: n,
            nr_original_constraints,
            nr_original_variables,
            sense,
            options,
            bounded: None,
        })
    }
}

/// Everything a derived instance inherits from its parent.
#[derive(Debug, Clone)]
pub(crate) struct Derivation {
    /// Root column of each column of the new data.
    pub origin: Vec<usize>,
    pub nr_root_columns: usize,
    pub nr_original_constraints: usize,
    pub nr_original_variables: usize,
    pub sense: Objective,
    pub options: Options,
    /// Boundedness of the columns of the new data, if it doesn't need to be determined again.
    pub bounded: Option<Vec<bool>>,
}

impl Derivation {
    /// Inherit everything from a parent, except for the columns.
    pub fn of<O>(parent: &IpInstance<O>, origin: Vec<usize>, bounded: Option<Vec<bool>>) -> Self {
        Self {
            origin,
            nr_root_columns: parent.nr_root_columns,
            nr_original_constraints: parent.nr_original_constraints,
            nr_original_variables: parent.nr_original_variables,
            sense: parent.sense,
            options: parent.options.clone(),
            bounded,
        }
    }
}

/// Second phase of construction, shared by root and derived instances.
///
/// The data is never normalized here.
pub(crate) fn finish<O: Oracle>(
    problem: RawProblem,
    mut oracle: O,
    derivation: Derivation,
) -> Result<IpInstance<O>, Error> {
    let Derivation {
        origin,
        nr_root_columns,
        nr_original_constraints,
        nr_original_variables,
        sense,
        options,
        bounded,
    } = derivation;
    debug_assert_eq!(origin.len(), problem.nr_columns());

    let originally_bounded = match bounded {
        Some(bounded) => bounded,
        None => classify(&mut oracle, &problem, options.boundedness)?,
    };
    let (permutation, group_end) = group(&problem.nonnegative, &originally_bounded);
    let problem = problem.permute(&permutation);
    let origin = permutation.apply(&origin);

    let program = relaxation_program(&problem.a, &problem.b, problem.objective(), &problem.u, &problem.nonnegative);
    if !oracle.is_feasible(&program) {
        return Err(Error::InfeasibleRelaxation);
    }

    let lattice = LatticeBasis::new(&problem.a, &problem.b)?;
    let one = BigInt::from(1);
    let binaries = (0..problem.nr_columns())
        .map(|j| {
            problem.nonnegative[j]
                && problem.variable_types[j] == VariableType::Integer
                && problem.u[j].as_ref() == Some(&one)
        })
        .collect();

    let RawProblem { a, b, c, u, nonnegative, variable_types } = problem;
    let instance = IpInstance {
        a,
        b,
        c,
        u,
        nonnegative,
        variable_types,
        permutation,
        bounded_end: group_end[VariableClass::Bounded],
        nonnegative_end: group_end[VariableClass::Unbounded],
        binaries,
        originally_bounded,
        origin,
        nr_root_columns,
        nr_original_constraints,
        nr_original_variables,
        sense,
        options,
        lattice,
        oracle,
    };
    debug!(
        "Built instance with {} rows and {} columns ({} bounded, {} unbounded, {} free), lattice dimension {}",
        instance.nr_rows(), instance.nr_columns(),
        instance.bounded_end, instance.nonnegative_end - instance.bounded_end,
        instance.nr_columns() - instance.nonnegative_end,
        instance.lattice.dimension(),
    );
    debug_assert!(instance.is_consistent());

    Ok(instance)
}

/// Drop constraints that are linear combinations of earlier constraints.
///
/// # Errors
///
/// `InfeasibleRelaxation` if a dropped constraint contradicts the constraints it depends on.
fn enforce_full_row_rank(problem: &mut RawProblem) -> Result<(), Error> {
    let a = problem.a.to_rational();
    let independent = independent_rows(&a);
    if independent.len() == problem.nr_rows() {
        return Ok(());
    }

    let rhs = IntegerMatrix::new(problem.b.iter().map(|value| vec![value.clone()]).collect(), 1);
    let augmented = problem.a.clone().hcat(&rhs).to_rational();
    if independent_rows(&augmented).len() > independent.len() {
        return Err(Error::InfeasibleRelaxation);
    }

    let dependent = (0..problem.nr_rows())
        .filter(|i| independent.binary_search(i).is_err())
        .collect::<Vec<_>>();
    warn!("Dropping {} linearly dependent constraints: {dependent:?}", dependent.len());
    problem.remove_rows(&dependent);

    Ok(())
}

//! # Exact two phase simplex
//!
//! Reference implementation of the `Oracle` trait on a dense tableau of arbitrary precision
//! rationals. The problems it is asked about are small lattice related programs, so the simple
//! tableau is preferred over a revised method with a factorized basis.
//!
//! Pivots are selected using Bland's rule: the first column with a negative reduced cost enters,
//! and ties in the ratio test are broken by the lowest basic column. This guarantees termination
//! on degenerate problems, which are common here.
use log::{debug, trace};
use num::BigRational;
use num_traits::{One, Zero};

use crate::algorithm::oracle::{IntegerResult, LinearProgram, Optimum, Oracle, OracleError, RelaxationResult};
use crate::algorithm::oracle::branch_and_bound;
use crate::config::OracleOptions;

/// Exact oracle remembering the last relaxation it solved.
///
/// Derived instances repeatedly ask about the same linear program (feasibility, then the optimal
/// basis, then the duals), which a single entry cache answers without pivoting again.
#[derive(Debug, Clone, Default)]
pub struct SimplexOracle {
    options: OracleOptions,
    cache: Option<(LinearProgram, RelaxationResult)>,
}

impl SimplexOracle {
    /// Create a new oracle with an empty cache.
    pub fn new(options: OracleOptions) -> Self {
        Self { options, cache: None }
    }
}

impl Oracle for SimplexOracle {
    fn solve_relaxation(&mut self, problem: &LinearProgram) -> RelaxationResult {
        if let Some((cached, result)) = &self.cache {
            if cached == problem {
                trace!("Relaxation answered from cache");
                return result.clone();
            }
        }

        let result = solve(problem);
        self.cache = Some((problem.clone(), result.clone()));

        result
    }

    fn solve_integer(&mut self, problem: &LinearProgram) -> Result<IntegerResult, OracleError> {
        branch_and_bound::solve(problem, self.options.node_limit)
    }
}

/// Solve the linear relaxation of a program, ignoring variable types.
pub(crate) fn solve(problem: &LinearProgram) -> RelaxationResult {
    let form = StandardForm::new(problem);
    let nr_columns = form.nr_columns();
    let mut tableau = Tableau::new(&form);
    let nr_rows = tableau.nr_rows();

    let mut artificial_cost = vec![BigRational::zero(); nr_columns];
    artificial_cost.extend((0..nr_rows).map(|_| BigRational::one()));
    let bounded = tableau.optimize(&artificial_cost);
    debug_assert!(bounded, "the sum of the artificial variables is bounded from below by zero");
    if !tableau.value(&artificial_cost).is_zero() {
        debug!("Phase one ended with a positive artificial cost, the relaxation is infeasible");
        return RelaxationResult::Infeasible;
    }
    tableau.remove_artificial_basis_variables();

    let mut cost = form.cost.clone();
    cost.extend((0..nr_rows).map(|_| BigRational::zero()));
    if !tableau.optimize(&cost) {
        debug!("Phase two found a ray of unbounded decrease");
        return RelaxationResult::Unbounded;
    }

    let optimum = form.optimum(problem, &tableau, &cost);
    debug!("Relaxation solved with value {}", optimum.value);

    RelaxationResult::FiniteOptimum(optimum)
}

/// How an original variable is expressed in the nonnegative variables of the standard form.
#[derive(Debug)]
enum Substitution {
    /// `x = lower + x'`, and if there is an upper bound, `x' + s = upper - lower`.
    Shifted {
        column: usize,
        lower: BigRational,
        bound_slack: Option<usize>,
    },
    /// `x = upper - x'`.
    Flipped {
        column: usize,
        upper: BigRational,
    },
    /// `x = x+ - x-`.
    Split {
        positive: usize,
        negative: usize,
    },
}

/// A problem `min cx s.t. Ax = b, x >= 0`, stored column by column.
struct StandardForm {
    columns: Vec<Vec<BigRational>>,
    b: Vec<BigRational>,
    cost: Vec<BigRational>,
    substitutions: Vec<Substitution>,
}

impl StandardForm {
    fn new(problem: &LinearProgram) -> Self {
        let m = problem.nr_rows();
        let nr_bound_rows = problem.lower.iter().zip(&problem.upper)
            .filter(|(lower, upper)| lower.is_some() && upper.is_some())
            .count();
        let nr_rows = m + nr_bound_rows;

        let mut b = problem.b.clone();
        b.resize(nr_rows, BigRational::zero());
        let mut columns = Vec::new();
        let mut cost = Vec::new();
        let mut substitutions = Vec::with_capacity(problem.nr_columns());
        let mut next_bound_row = m;

        for j in 0..problem.nr_columns() {
            let mut coefficients = problem.constraints.column(j);
            coefficients.resize(nr_rows, BigRational::zero());
            let c_j = &problem.cost[j];

            let substitution = match (&problem.lower[j], &problem.upper[j]) {
                (Some(lower), upper) => {
                    if !lower.is_zero() {
                        for i in 0..m {
                            b[i] -= &coefficients[i] * lower;
                        }
                    }
                    let column = columns.len();
                    columns.push(coefficients);
                    cost.push(c_j.clone());

                    let bound_slack = upper.as_ref().map(|upper| {
                        let row = next_bound_row;
                        next_bound_row += 1;
                        columns[column][row] = BigRational::one();
                        b[row] = upper - lower;

                        let mut slack = vec![BigRational::zero(); nr_rows];
                        slack[row] = BigRational::one();
                        columns.push(slack);
                        cost.push(BigRational::zero());
                        columns.len() - 1
                    });

                    Substitution::Shifted { column, lower: lower.clone(), bound_slack }
                },
                (None, Some(upper)) => {
                    for i in 0..m {
                        b[i] -= &coefficients[i] * upper;
                    }
                    let column = columns.len();
                    columns.push(coefficients.into_iter().map(|value| -value).collect());
                    cost.push(-c_j.clone());

                    Substitution::Flipped { column, upper: upper.clone() }
                },
                (None, None) => {
                    let positive = columns.len();
                    let negative = positive + 1;
                    let negated = coefficients.iter().map(|value| -value).collect();
                    columns.push(coefficients);
                    columns.push(negated);
                    cost.push(c_j.clone());
                    cost.push(-c_j.clone());

                    Substitution::Split { positive, negative }
                },
            };
            substitutions.push(substitution);
        }

        for (i, relation) in problem.relations.iter().enumerate() {
            if let Some(direction) = relation.bound_direction() {
                let mut slack = vec![BigRational::zero(); nr_rows];
                slack[i] = direction.into::<BigRational>();
                columns.push(slack);
                cost.push(BigRational::zero());
            }
        }

        Self { columns, b, cost, substitutions }
    }

    fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    /// Translate an optimal tableau back to the variables and rows of the original problem.
    fn optimum(&self, problem: &LinearProgram, tableau: &Tableau, cost: &[BigRational]) -> Optimum {
        let mut values = vec![BigRational::zero(); self.nr_columns()];
        for (row, &column) in tableau.basis.iter().enumerate() {
            if column < self.nr_columns() {
                values[column] = tableau.rhs[row].clone();
            }
        }

        let solution = self.substitutions.iter()
            .map(|substitution| match substitution {
                Substitution::Shifted { column, lower, .. } => lower + &values[*column],
                Substitution::Flipped { column, upper } => upper - &values[*column],
                Substitution::Split { positive, negative } => &values[*positive] - &values[*negative],
            })
            .collect::<Vec<_>>();
        let basis = self.substitutions.iter()
            .map(|substitution| match substitution {
                Substitution::Shifted { column, bound_slack, .. } => {
                    tableau.is_basic[*column] && bound_slack.map_or(true, |slack| tableau.is_basic[slack])
                },
                Substitution::Flipped { column, .. } => tableau.is_basic[*column],
                Substitution::Split { positive, negative } => {
                    tableau.is_basic[*positive] || tableau.is_basic[*negative]
                },
            })
            .collect();
        let duals = (0..problem.nr_rows())
            .map(|i| {
                let dual = tableau.dual(cost, self.nr_columns() + i);
                if tableau.negated[i] { -dual } else { dual }
            })
            .collect();

        Optimum { value: problem.value(&solution), solution, basis, duals }
    }
}

/// The matrix `B^-1 [A | I]` together with `B^-1 b`.
///
/// The identity columns belong to the artificial variables of the first phase. They are never
/// allowed to enter the basis again once the first phase is over.
struct Tableau {
    rows: Vec<Vec<BigRational>>,
    rhs: Vec<BigRational>,
    basis: Vec<usize>,
    is_basic: Vec<bool>,
    nr_structural: usize,
    /// Whether a row was multiplied by `-1` to make its right-hand side nonnegative.
    negated: Vec<bool>,
}

impl Tableau {
    /// Start from the basis of artificial variables.
    fn new(form: &StandardForm) -> Self {
        let nr_rows = form.b.len();
        let nr_structural = form.nr_columns();

        let mut rows = Vec::with_capacity(nr_rows);
        let mut rhs = Vec::with_capacity(nr_rows);
        let mut negated = Vec::with_capacity(nr_rows);
        for i in 0..nr_rows {
            let negate = form.b[i] < BigRational::zero();
            let mut row = form.columns.iter()
                .map(|column| if negate { -&column[i] } else { column[i].clone() })
                .collect::<Vec<_>>();
            row.extend((0..nr_rows).map(|k| if k == i { BigRational::one() } else { BigRational::zero() }));

            rows.push(row);
            rhs.push(if negate { -&form.b[i] } else { form.b[i].clone() });
            negated.push(negate);
        }

        let mut is_basic = vec![false; nr_structural];
        is_basic.extend((0..nr_rows).map(|_| true));

        Self {
            rows,
            rhs,
            basis: (nr_structural..nr_structural + nr_rows).collect(),
            is_basic,
            nr_structural,
            negated,
        }
    }

    fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    /// Pivot until no structural column has a negative reduced cost.
    ///
    /// # Return value
    ///
    /// `false` if the problem turned out to be unbounded.
    fn optimize(&mut self, cost: &[BigRational]) -> bool {
        while let Some(column) = self.entering_column(cost) {
            match self.leaving_row(column) {
                Some(row) => self.pivot(row, column),
                None => return false,
            }
        }

        true
    }

    fn reduced_cost(&self, cost: &[BigRational], column: usize) -> BigRational {
        let mut reduced = cost[column].clone();
        for (row, &basic) in self.rows.iter().zip(&self.basis) {
            if !row[column].is_zero() && !cost[basic].is_zero() {
                reduced -= &cost[basic] * &row[column];
            }
        }

        reduced
    }

    /// First profitable column, which is the entering rule of Bland.
    fn entering_column(&self, cost: &[BigRational]) -> Option<usize> {
        (0..self.nr_structural)
            .filter(|&j| !self.is_basic[j])
            .find(|&j| self.reduced_cost(cost, j) < BigRational::zero())
    }

    /// Minimum ratio test, ties broken by the lowest basic column.
    fn leaving_row(&self, column: usize) -> Option<usize> {
        let mut best: Option<(usize, BigRational)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row[column] > BigRational::zero() {
                let ratio = &self.rhs[i] / &row[column];
                let better = match &best {
                    None => true,
                    Some((best_row, best_ratio)) => {
                        ratio < *best_ratio || (ratio == *best_ratio && self.basis[i] < self.basis[*best_row])
                    },
                };
                if better {
                    best = Some((i, ratio));
                }
            }
        }

        best.map(|(row, _)| row)
    }

    fn pivot(&mut self, row: usize, column: usize) {
        trace!("Pivot on row {row}, column {column}");

        let pivot = self.rows[row][column].clone();
        for value in &mut self.rows[row] {
            *value /= &pivot;
        }
        self.rhs[row] /= &pivot;

        let pivot_row = self.rows[row].clone();
        let pivot_rhs = self.rhs[row].clone();
        for i in 0..self.nr_rows() {
            if i != row && !self.rows[i][column].is_zero() {
                let factor = self.rows[i][column].clone();
                for (value, p) in self.rows[i].iter_mut().zip(&pivot_row) {
                    if !p.is_zero() {
                        *value -= &factor * p;
                    }
                }
                self.rhs[i] -= &factor * &pivot_rhs;
            }
        }

        self.is_basic[self.basis[row]] = false;
        self.basis[row] = column;
        self.is_basic[column] = true;
    }

    /// Value of the current basic solution.
    fn value(&self, cost: &[BigRational]) -> BigRational {
        self.basis.iter().zip(&self.rhs)
            .map(|(&basic, value)| &cost[basic] * value)
            .sum()
    }

    /// Pivot artificial variables at value zero out of the basis where possible.
    ///
    /// An artificial variable stays basic only in a row that is linearly dependent on the others.
    /// Such a row is zero in every structural column, so later pivots don't touch it.
    fn remove_artificial_basis_variables(&mut self) {
        for row in 0..self.nr_rows() {
            if self.basis[row] >= self.nr_structural {
                debug_assert!(self.rhs[row].is_zero());

                let replacement = (0..self.nr_structural)
                    .find(|&j| !self.is_basic[j] && !self.rows[row][j].is_zero());
                match replacement {
                    Some(column) => self.pivot(row, column),
                    None => trace!("Row {row} is redundant, its artificial variable stays basic"),
                }
            }
        }
    }

    /// Dual value `c_B B^-1 e_i`, read from the artificial column of row `i`.
    fn dual(&self, cost: &[BigRational], artificial_column: usize) -> BigRational {
        self.basis.iter().zip(&self.rows)
            .filter(|&(&basic, _)| !cost[basic].is_zero())
            .map(|(&basic, row)| &cost[basic] * &row[artificial_column])
            .sum()
    }
}

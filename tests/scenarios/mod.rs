use num::BigInt;

use relp_lattice::algorithm::oracle::simplex::SimplexOracle;
use relp_lattice::algorithm::relaxation::lattice_projection::LatticeProjection;
use relp_lattice::config::{BoundednessTest, Options};
use relp_lattice::data::linear_algebra::matrix::IntegerMatrix;
use relp_lattice::data::linear_program::elements::{BoundDirection, ConstraintRelation, Objective, VariableType};
use relp_lattice::data::linear_program::instance::IpInstance;
use relp_lattice::data::linear_program::model::LinearModel;
use relp_lattice::data::linear_program::problem::RawProblem;

fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|&v| BigInt::from(v)).collect()
}

fn equality_form() -> Options {
    Options { apply_normalization: false, ..Options::default() }
}

#[test]
fn path_lattice() {
    let problem = RawProblem::from_i64(&[vec![1, 1, 0], vec![0, 1, 1]], &[1, 1], &[0, 0, 0], &[None; 3]).unwrap();
    let instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();

    let lattice = instance.lattice();
    assert_eq!(lattice.basis(), &IntegerMatrix::from_i64(&[vec![1, -1, 1]], 3));
    assert_eq!(instance.a().mul_vector(lattice.fiber_solution()), ints(&[1, 1]));
}

#[test]
fn free_variables_are_last() {
    // x0 + x1 + x2 = 3 with x0 free but at most 5, x1 free and x2 nonnegative
    let problem = RawProblem::from_i64(&[vec![1, 1, 1]], &[3], &[0, 0, 0], &[Some(5), None, None])
        .unwrap()
        .with_nonnegative(vec![false, false, true])
        .unwrap();

    for boundedness in [BoundednessTest::Relaxation, BoundednessTest::UnboundedRay] {
        let options = Options { boundedness, ..equality_form() };
        let instance = IpInstance::new(problem.clone(), options, SimplexOracle::default()).unwrap();

        assert!(instance.is_consistent());
        assert_eq!(instance.originally_bounded(), &[true, false, false]);
        assert_eq!(instance.nonnegative_end(), 1);
        assert_eq!(instance.permutation().forward(), &[1, 2, 0]);
        assert!(instance.permutation().forward()[1] >= instance.nonnegative_end());
    }
}

#[test]
fn relax_and_restore() {
    // x0 - x1 + x2 = 1, x1 >= 0, 0 <= x2 <= 1, x0 free
    let problem = RawProblem::from_i64(&[vec![1, -1, 1]], &[1], &[1, 1, 1], &[None, None, Some(1)])
        .unwrap()
        .with_nonnegative(vec![false, true, true])
        .unwrap();
    let instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();

    let relaxed = instance.nonnegativity_relaxation(&[false, true, false]).unwrap();
    assert!(relaxed.is_consistent());
    assert_eq!(relaxed.objective(), instance.objective());

    let mask = relaxed.origin().iter()
        .map(|i| instance.origin().iter().position(|k| k == i).is_some_and(|j| j < instance.nonnegative_end()))
        .collect::<Vec<_>>();
    let restored = relaxed.nonnegativity_relaxation(&mask).unwrap();

    assert!(restored.is_consistent());
    assert_eq!(restored.a(), instance.a());
    assert_eq!(restored.b(), instance.b());
    assert_eq!(restored.nonnegative(), instance.nonnegative());
    assert_eq!(restored.bounded_end(), instance.bounded_end());
}

#[test]
fn project_relaxed_variables() {
    // x0 + x1 + x2 + x3 = 2 and x0 - x3 = 0
    let problem = RawProblem::from_i64(&[vec![1, 1, 1, 1], vec![1, 0, 0, -1]], &[2, 0], &[1, 1, 1, 1], &[None; 4])
        .unwrap();
    let instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();
    assert_eq!(instance.bounded_end(), 4);

    let relaxed = instance.nonnegativity_relaxation(&[true, true, false, false]).unwrap();
    assert_eq!(relaxed.nonnegative_end(), 2);

    let projected = relaxed.project(&[2, 3]).unwrap();
    assert!(projected.is_consistent());
    assert_eq!(projected.nr_columns(), relaxed.nr_columns() - 2);
    assert_eq!(projected.b(), relaxed.b());
    for j in 0..projected.nr_columns() {
        assert_eq!(projected.a().column(j), relaxed.a().column(j));
    }
    assert_eq!(projected.to_root_order(&['a', 'b']), vec![Some('a'), Some('b'), None, None]);
}

#[test]
fn group_relaxation_and_projection() {
    let problem = RawProblem::from_i64(&[vec![1, 2, 3, 4]], &[10], &[1, 1, 1, 1], &[None; 4]).unwrap();
    let mut instance = IpInstance::new(problem, equality_form(), SimplexOracle::default()).unwrap();

    let mut relaxation = instance.group_relaxation().unwrap();
    assert!(relaxation.is_consistent());
    // Only the basic variable x3 stays nonnegative
    assert_eq!(relaxation.nonnegative_end(), 1);
    assert_eq!(relaxation.origin(), &[3, 0, 1, 2]);
    let columns = relaxation.lattice_projection(LatticeProjection::SimplexBasis);
    assert_eq!(columns.len(), relaxation.lattice().dimension());
}

#[test]
fn from_model() {
    // max x + 2y s.t. x + y <= 4, x - y >= -2, 1 <= x <= 3, y >= 0
    let mut model = LinearModel::new(Objective::Maximize);
    let x = model.add_variable("x", VariableType::Integer);
    let y = model.add_variable("y", VariableType::Integer);
    model.add_constraint(vec![(x, 1.0), (y, 1.0)], ConstraintRelation::Less, 4.0);
    model.add_constraint(vec![(x, 1.0), (y, -1.0)], ConstraintRelation::Greater, -2.0);
    model.add_bound(x, BoundDirection::Lower, 1.0);
    model.add_bound(x, BoundDirection::Upper, 3.0);
    model.add_bound(y, BoundDirection::Lower, 0.0);
    model.set_objective(vec![(x, 1.0), (y, 2.0)]);

    let mut instance = IpInstance::from_model(&model, Options::default(), SimplexOracle::default()).unwrap();
    assert!(instance.is_consistent());
    assert_eq!(instance.sense(), Objective::Maximize);
    assert_eq!((instance.nr_original_constraints(), instance.nr_original_variables()), (2, 2));
    assert_eq!((instance.nr_rows(), instance.nr_columns()), (4, 6));
    assert_eq!(instance.bounded_end(), 6);
    assert!(instance.permutation().is_identity());
    assert_eq!(instance.lattice().dimension(), 2);

    // The relaxation optimum is x = 3, y = 1 for the original objective, -5 once minimized
    let basis = instance.optimal_basis().unwrap();
    assert_eq!(basis.iter().filter(|&&basic| basic).count(), 4);
}

use num::BigInt;
use num_traits::{Signed, Zero};
use proptest::prelude::*;

use relp_lattice::algorithm::classification::group;
use relp_lattice::algorithm::lattice::{LatticeBasis, canonicalize};
use relp_lattice::config::Options;
use relp_lattice::data::linear_algebra::matrix::IntegerMatrix;
use relp_lattice::data::linear_program::elements::VariableClass;
use relp_lattice::data::linear_program::normalize::normalize;
use relp_lattice::data::linear_program::permutation::Permutation;
use relp_lattice::data::linear_program::problem::RawProblem;

/// A matrix with a known integer point, and the right-hand side that point induces.
fn system() -> impl Strategy<Value = (IntegerMatrix, Vec<BigInt>)> {
    (1_usize..4, 1_usize..6).prop_flat_map(|(m, n)| {
        (
            prop::collection::vec(prop::collection::vec(-5_i64..=5, n), m),
            prop::collection::vec(-5_i64..=5, n),
        )
            .prop_map(move |(rows, x)| {
                let a = IntegerMatrix::from_i64(&rows, n);
                let x = x.into_iter().map(BigInt::from).collect::<Vec<_>>();
                let b = a.mul_vector(&x);
                (a, b)
            })
    })
}

fn permutation() -> impl Strategy<Value = Permutation> {
    (0_usize..10).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle().prop_map(Permutation::new))
}

proptest! {
    #[test]
    fn fiber_and_kernel((a, b) in system()) {
        let lattice = LatticeBasis::new(&a, &b).unwrap();

        prop_assert_eq!(a.mul_vector(lattice.fiber_solution()), b);
        for row in lattice.basis().rows() {
            prop_assert!(a.mul_vector(row).iter().all(Zero::is_zero));
        }
        prop_assert_eq!(lattice.dimension() + lattice.rank(), a.nr_columns());
    }

    #[test]
    fn canonical_basis_is_stable((a, b) in system()) {
        let lattice = LatticeBasis::new(&a, &b).unwrap();

        let basis = lattice.basis();
        let mut again = basis.clone();
        canonicalize(&mut again);
        prop_assert_eq!(&again, basis);

        // Staircase with positive pivots, entries above a pivot in (-pivot, 0]
        let mut previous = None;
        for (i, row) in basis.rows().enumerate() {
            let pivot_column = row.iter().position(|value| !value.is_zero());
            prop_assert!(pivot_column.is_some());
            let pivot_column = pivot_column.unwrap();
            prop_assert!(previous.is_none_or(|previous| previous < pivot_column));
            previous = Some(pivot_column);

            let pivot = &row[pivot_column];
            prop_assert!(pivot.is_positive());
            for above in basis.rows().take(i) {
                let value = &above[pivot_column];
                prop_assert!(!value.is_positive() && value.abs() < *pivot);
            }
        }
    }

    #[test]
    fn permutation_round_trip(permutation in permutation()) {
        let values = (0..permutation.len()).map(|i| i * 10).collect::<Vec<_>>();

        prop_assert_eq!(permutation.apply_inverse(&permutation.apply(&values)), values);
        for i in 0..permutation.len() {
            prop_assert_eq!(permutation.inverse()[permutation.forward()[i]], i);
        }
    }

    #[test]
    fn groups_are_contiguous(flags in prop::collection::vec((any::<bool>(), any::<bool>()), 0..12)) {
        let (nonnegative, bounded): (Vec<_>, Vec<_>) = flags.into_iter().unzip();
        let (permutation, group_end) = group(&nonnegative, &bounded);

        let bounded_end = group_end[VariableClass::Bounded];
        let nonnegative_end = group_end[VariableClass::Unbounded];
        prop_assert!(bounded_end <= nonnegative_end && nonnegative_end <= nonnegative.len());
        for (old, &new) in permutation.forward().iter().enumerate() {
            let class = VariableClass::of(nonnegative[old], bounded[old]);
            let expected = if new < bounded_end {
                VariableClass::Bounded
            } else if new < nonnegative_end {
                VariableClass::Unbounded
            } else {
                VariableClass::Free
            };
            prop_assert_eq!(class, expected);
        }
        // Within a group, the original order is kept
        for new in 1..permutation.len() {
            let (left, right) = (permutation.inverse()[new - 1], permutation.inverse()[new]);
            let same_group = VariableClass::of(nonnegative[left], bounded[left])
                == VariableClass::of(nonnegative[right], bounded[right]);
            prop_assert!(!same_group || left < right);
        }
    }

    #[test]
    fn disabled_normalization_is_identity(
        (a, b) in system(),
        upper in prop::collection::vec(prop::option::of(0_i64..10), 6),
    ) {
        let n = a.nr_columns();
        let problem = RawProblem::new(
            a,
            b,
            IntegerMatrix::from_i64(&[vec![1; n]], n).to_rational(),
            upper[..n].iter().map(|value| value.map(BigInt::from)).collect(),
            vec![true; n],
        ).unwrap();

        let options = Options { apply_normalization: false, ..Options::default() };
        prop_assert_eq!(normalize(problem.clone(), &options), problem);
    }
}

//! # Column permutations
//!
//! The variables of an instance are reordered once, right after classification. Because every
//! piece of per-variable data has to move along, the permutation is stored in both directions and
//! applied through a single method.

/// A bijection on variable indices.
///
/// `forward[i]` is the new position of the variable that was at position `i`, and `inverse[j]` is
/// the old position of the variable that is now at position `j`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Permutation {
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Create a permutation from the new position of each variable.
    ///
    /// # Panics
    ///
    /// If the positions are not a bijection on `0..forward.len()`.
    pub fn new(forward: Vec<usize>) -> Self {
        let mut inverse = vec![usize::MAX; forward.len()];
        for (old, &new) in forward.iter().enumerate() {
            assert!(
                new < forward.len() && inverse[new] == usize::MAX,
                "position {new} is not a valid or unique target in a permutation of length {}", forward.len(),
            );
            inverse[new] = old;
        }

        Self { forward, inverse }
    }

    /// Create a permutation from the old position of each variable in the new order.
    ///
    /// # Panics
    ///
    /// If the positions are not a bijection on `0..order.len()`.
    pub fn from_order(order: Vec<usize>) -> Self {
        let Self { forward, inverse } = Self::new(order);

        Self { forward: inverse, inverse: forward }
    }

    /// The permutation that doesn't move anything.
    pub fn identity(len: usize) -> Self {
        Self { forward: (0..len).collect(), inverse: (0..len).collect() }
    }

    /// Number of elements permuted.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether this permutation is of the empty set.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Whether no element is moved.
    pub fn is_identity(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &j)| i == j)
    }

    /// New position of each old position.
    pub fn forward(&self) -> &[usize] {
        &self.forward
    }

    /// Old position of each new position.
    pub fn inverse(&self) -> &[usize] {
        &self.inverse
    }

    /// Reorder values from the old order into the new order.
    pub fn apply<T: Clone>(&self, values: &[T]) -> Vec<T> {
        debug_assert_eq!(values.len(), self.len());

        self.inverse.iter().map(|&old| values[old].clone()).collect()
    }

    /// Reorder values from the new order back into the old order.
    pub fn apply_inverse<T: Clone>(&self, values: &[T]) -> Vec<T> {
        debug_assert_eq!(values.len(), self.len());

        self.forward.iter().map(|&new| values[new].clone()).collect()
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::permutation::Permutation;

    #[test]
    fn directions() {
        let permutation = Permutation::new(vec![2, 0, 1]);
        assert_eq!(permutation.inverse(), &[1, 2, 0]);
        assert_eq!(permutation.apply(&['a', 'b', 'c']), vec!['b', 'c', 'a']);
        assert_eq!(permutation.apply_inverse(&['b', 'c', 'a']), vec!['a', 'b', 'c']);
        assert_eq!(Permutation::from_order(vec![1, 2, 0]), permutation);
        assert!(!permutation.is_identity());
        assert!(Permutation::identity(4).is_identity());
    }

    #[test]
    #[should_panic]
    fn not_a_bijection() {
        Permutation::new(vec![0, 0, 1]);
    }
}

//! Symmetric pairwise distance matrix over a cohort of persons.

use crate::distance::MdtwDistance;

/// Square matrix of pairwise distances, stored row-major with both halves
/// materialized.
///
/// Construction mirrors each computed pair across the diagonal, so lookups
/// and the row-major export are plain indexing with no triangular index
/// arithmetic at read time. The diagonal is zero. Row and column order
/// follow whatever person ordering the caller fixed when computing the
/// pairs; the engine never reorders.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the full matrix from the unique pairs in triangular order:
    /// (1,0), (2,0), (2,1), (3,0), ... for `n` persons, `n*(n-1)/2` values.
    pub(crate) fn from_pairs(n: usize, pairs: Vec<MdtwDistance>) -> Self {
        debug_assert_eq!(pairs.len(), n.saturating_sub(1) * n / 2);
        let mut cells = vec![0.0_f64; n * n];
        let mut pairs = pairs.into_iter();
        for i in 1..n {
            for j in 0..i {
                let Some(distance) = pairs.next() else { break };
                cells[i * n + j] = distance.value();
                cells[j * n + i] = distance.value();
            }
        }
        Self { n, cells }
    }

    /// Return the number of persons in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix covers no persons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the distance between persons `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> MdtwDistance {
        assert!(
            i < self.n && j < self.n,
            "cell ({i}, {j}) out of bounds for {} persons",
            self.n
        );
        MdtwDistance::from_cost(self.cells[i * self.n + j])
    }

    /// Borrow person `i`'s distances to every person, in column order.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    /// Iterate over the unique pairs `(i, j, distance)` with `i > j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, MdtwDistance)> + '_ {
        (1..self.n).flat_map(move |i| (0..i).map(move |j| (i, j, self.get(i, j))))
    }

    /// Materialize the matrix as row-major rows of raw values, the shape
    /// the labelled artifacts carry.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.n.max(1)).map(<[f64]>::to_vec).collect()
    }
}

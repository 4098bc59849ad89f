//! Modified-DTW alignment between eating-event series.

use rayon::prelude::*;
use tracing::instrument;

use crate::cost::{CostParams, LocalEvent, local_cost};
use crate::distance::MdtwDistance;
use crate::event::EventSeries;
use crate::matrix::DistanceMatrix;
use crate::prepare::NormalizedPerson;

/// Dynamic-programming kernel selection.
///
/// Both kernels implement the identical recurrence and return numerically
/// equal results; they trade memory for simplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DpKernel {
    /// Reference implementation over the full (m1+1) x (m2+1) grid.
    /// O(m1 * m2) time and space.
    FullMatrix,
    /// Rolling two-row buffer with precomputed skip costs.
    /// O(m1 * m2) time, O(m2) space.
    #[default]
    TwoRow,
}

/// How two series are paired before the DP runs.
///
/// The two policies are distinct and never substituted for one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Free monotonic warping: the DP may skip events on either side.
    #[default]
    Warped,
    /// Events compared strictly by chronological rank: the shorter series
    /// is padded with gap entries until lengths match, which makes the
    /// skip paths cost-irrelevant without removing them from the DP.
    PositionPaired,
}

/// Immutable mDTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mdtw {
    params: CostParams,
    kernel: DpKernel,
}

impl Mdtw {
    /// Create an aligner with the given local cost parameters and the
    /// default two-row kernel.
    #[must_use]
    pub fn new(params: CostParams) -> Self {
        Self {
            params,
            kernel: DpKernel::default(),
        }
    }

    /// Select the dynamic-programming kernel.
    #[must_use]
    pub fn with_kernel(mut self, kernel: DpKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Return the local cost parameters.
    #[must_use]
    pub fn params(&self) -> CostParams {
        self.params
    }

    /// Compute the warped mDTW distance between two series.
    ///
    /// An empty series on one side costs the sum of squared norms of the
    /// other side's vectors; two empty series are at distance 0.
    ///
    /// # Errors
    ///
    /// Propagates [`local_cost`] validation failures
    /// ([`MdtwError::DimensionMismatch`](crate::MdtwError::DimensionMismatch),
    /// [`MdtwError::NutrientOutOfRange`](crate::MdtwError::NutrientOutOfRange)).
    #[instrument(skip(a, b), fields(m1 = a.len(), m2 = b.len()))]
    pub fn distance(&self, a: &EventSeries, b: &EventSeries) -> Result<MdtwDistance, crate::MdtwError> {
        let ea = series_events(a);
        let eb = series_events(b);
        self.run_kernel(&ea, &eb)
    }

    /// Compute the mDTW distance under an explicit alignment policy.
    ///
    /// # Errors
    ///
    /// Same as [`distance`][Mdtw::distance].
    pub fn distance_aligned(
        &self,
        a: &EventSeries,
        b: &EventSeries,
        alignment: Alignment,
    ) -> Result<MdtwDistance, crate::MdtwError> {
        match alignment {
            Alignment::Warped => self.distance(a, b),
            Alignment::PositionPaired => {
                let len = a.len().max(b.len());
                let mut ea = series_events(a);
                let mut eb = series_events(b);
                ea.resize(len, LocalEvent::Gap);
                eb.resize(len, LocalEvent::Gap);
                self.run_kernel(&ea, &eb)
            }
        }
    }

    /// Compute pairwise distances for a cohort of prepared persons.
    ///
    /// Cell (i, j) for i != j holds the distance between persons i and j
    /// under the chosen alignment policy; the diagonal is fixed at zero
    /// without computation. Pairs are sharded across rayon workers; each
    /// pair touches only its own cell, so no locking is involved.
    ///
    /// # Errors
    ///
    /// The first [`local_cost`] validation failure aborts the whole matrix.
    #[instrument(skip(self, people), fields(n = people.len()))]
    pub fn pairwise(
        &self,
        people: &[NormalizedPerson],
        alignment: Alignment,
    ) -> Result<DistanceMatrix, crate::MdtwError> {
        let n = people.len();
        let total_pairs = n.saturating_sub(1) * n / 2;

        let distances: Vec<MdtwDistance> = (0..total_pairs)
            .into_par_iter()
            .map(|flat_idx| {
                // Map flat index back to (i, j) where i > j:
                // flat_idx = i*(i-1)/2 + j, i = floor((1 + sqrt(1 + 8*flat_idx)) / 2)
                let i = ((1.0 + (1.0 + 8.0 * flat_idx as f64).sqrt()) / 2.0).floor() as usize;
                let j = flat_idx - i * (i - 1) / 2;
                self.distance_aligned(people[i].as_series(), people[j].as_series(), alignment)
            })
            .collect::<Result<_, _>>()?;

        Ok(DistanceMatrix::from_pairs(n, distances))
    }

    fn run_kernel(&self, a: &[LocalEvent<'_>], b: &[LocalEvent<'_>]) -> Result<MdtwDistance, crate::MdtwError> {
        let raw = match self.kernel {
            DpKernel::FullMatrix => self.mdtw_full(a, b)?,
            DpKernel::TwoRow => self.mdtw_two_row(a, b)?,
        };
        Ok(MdtwDistance::from_cost(raw))
    }

    /// Full-grid reference kernel.
    ///
    /// Cell (i, j) of the (m1+1) x (m2+1) grid maps to flat index
    /// `i * (m2 + 1) + j`. Row 0 and column 0 accumulate running skip
    /// costs; interior cells take the cheapest of match-both, skip-a,
    /// and skip-b.
    fn mdtw_full(&self, a: &[LocalEvent<'_>], b: &[LocalEvent<'_>]) -> Result<f64, crate::MdtwError> {
        let m1 = a.len();
        let m2 = b.len();
        let width = m2 + 1;

        let skip_a: Vec<f64> = a.iter().map(self_cost).collect();
        let skip_b: Vec<f64> = b.iter().map(self_cost).collect();

        let mut dp = vec![0.0_f64; (m1 + 1) * width];
        for i in 1..=m1 {
            dp[i * width] = dp[(i - 1) * width] + skip_a[i - 1];
        }
        for j in 1..=m2 {
            dp[j] = dp[j - 1] + skip_b[j - 1];
        }

        for i in 1..=m1 {
            for j in 1..=m2 {
                let matched = local_cost(a[i - 1], b[j - 1], &self.params)?;
                let both = dp[(i - 1) * width + (j - 1)] + matched;
                let skip_i = dp[(i - 1) * width + j] + skip_a[i - 1];
                let skip_j = dp[i * width + (j - 1)] + skip_b[j - 1];
                dp[i * width + j] = both.min(skip_i).min(skip_j);
            }
        }

        Ok(dp[m1 * width + m2])
    }

    /// Rolling two-row kernel. Same recurrence as [`mdtw_full`][Self::mdtw_full]
    /// with only `previous` and `current` rows live, swapped per outer
    /// iteration. Skip costs are precomputed self-dot-products so the inner
    /// loop never re-derives them.
    fn mdtw_two_row(&self, a: &[LocalEvent<'_>], b: &[LocalEvent<'_>]) -> Result<f64, crate::MdtwError> {
        let m1 = a.len();
        let m2 = b.len();

        let skip_b: Vec<f64> = b.iter().map(self_cost).collect();

        let mut prev = vec![0.0_f64; m2 + 1];
        let mut curr = vec![0.0_f64; m2 + 1];
        for j in 1..=m2 {
            prev[j] = prev[j - 1] + skip_b[j - 1];
        }

        for i in 1..=m1 {
            let skip_i = self_cost(&a[i - 1]);
            curr[0] = prev[0] + skip_i;
            for j in 1..=m2 {
                let matched = local_cost(a[i - 1], b[j - 1], &self.params)?;
                let both = prev[j - 1] + matched;
                let from_above = prev[j] + skip_i;
                let from_left = curr[j - 1] + skip_b[j - 1];
                curr[j] = both.min(from_above).min(from_left);
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last completed row.
        Ok(prev[m2])
    }
}

/// Squared norm of an event's nutrient vector, i.e. its cost against a gap.
fn self_cost(event: &LocalEvent<'_>) -> f64 {
    event.nutrients().iter().map(|v| v * v).sum()
}

fn series_events(series: &EventSeries) -> Vec<LocalEvent<'_>> {
    series
        .iter()
        .map(|(time, nutrients)| LocalEvent::Occurrence { time, nutrients })
        .collect()
}

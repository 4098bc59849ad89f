//! Distance values produced by the alignment kernels.

use std::fmt;

/// An accumulated mDTW alignment cost.
///
/// Wraps the raw `f64` so a distance cannot be confused with a local cost
/// or a nutrient value in a signature. Alignment over valid inputs only
/// ever produces finite, non-negative values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MdtwDistance(f64);

impl MdtwDistance {
    /// Wrap the accumulated cost of a completed alignment.
    pub(crate) fn from_cost(cost: f64) -> Self {
        Self(cost)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<MdtwDistance> for f64 {
    fn from(distance: MdtwDistance) -> Self {
        distance.0
    }
}

impl fmt::Display for MdtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

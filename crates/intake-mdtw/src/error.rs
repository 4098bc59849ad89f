//! Error types for event preparation and mDTW distance computation.

/// Errors from person preparation, local cost evaluation, and alignment.
#[derive(Debug, thiserror::Error)]
pub enum MdtwError {
    /// Returned when a person carries zero eating events.
    #[error("person has no eating events")]
    EmptyPerson,

    /// Returned when two non-empty nutrient vectors of different dimension
    /// are compared, or a person's records disagree on dimension.
    #[error("nutrient dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension of the first vector (or the person's first record).
        expected: usize,
        /// Dimension of the offending vector.
        got: usize,
    },

    /// Returned when a nutrient value lies outside the normalized [0, 1] range.
    #[error("nutrient value {value} at index {index} outside [0, 1]")]
    NutrientOutOfRange {
        /// Position of the offending value within its vector.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a nutrient dimension sums to zero across a person's
    /// events, leaving normalization undefined.
    #[error("nutrient dimension {dimension} sums to zero across all events")]
    ZeroTotal {
        /// Zero-based index of the degenerate dimension.
        dimension: usize,
    },

    /// Returned when an event series is constructed from records that are
    /// not sorted ascending by time.
    #[error("event series not sorted by time at index {index}")]
    UnsortedSeries {
        /// Index of the first record that breaks ascending order.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = MdtwError::DimensionMismatch { expected: 3, got: 2 };
        assert_eq!(
            err.to_string(),
            "nutrient dimension mismatch: expected 3, got 2"
        );

        let err = MdtwError::ZeroTotal { dimension: 1 };
        assert!(err.to_string().contains("dimension 1"));
    }
}

//! Local cost between two eating events, with gap handling.

use crate::error::MdtwError;

/// Parameters of the modified-DTW local cost.
///
/// Always passed explicitly; the engine carries no ambient configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostParams {
    /// Time-offset normalizer. The default of 23 scales an hour offset to
    /// roughly unit range over one day.
    pub delta: f64,
    /// Weight of the time-coupling term.
    pub beta: f64,
    /// Exponent of the normalized time offset.
    pub alpha: f64,
    /// When set, the cost is the pure squared value difference and the
    /// time-coupling term is dropped entirely.
    pub traditional: bool,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            delta: 23.0,
            beta: 1.0,
            alpha: 2.0,
            traditional: false,
        }
    }
}

impl CostParams {
    /// Pure value-difference cost, no temporal penalty.
    #[must_use]
    pub fn traditional() -> Self {
        Self {
            traditional: true,
            ..Self::default()
        }
    }
}

/// One side of a local cost evaluation: a real event or an alignment gap.
///
/// A gap is what a real event is charged against when the warping path
/// skips it, and what padding inserts in position-paired alignment.
#[derive(Debug, Clone, Copy)]
pub enum LocalEvent<'a> {
    /// A real eating event with a time coordinate.
    Occurrence {
        /// Hour of the event.
        time: f64,
        /// Normalized nutrient vector.
        nutrients: &'a [f64],
    },
    /// No counterpart on this side.
    Gap,
}

impl<'a> LocalEvent<'a> {
    /// Borrow this side's nutrient vector; empty for a gap.
    #[must_use]
    pub fn nutrients(&self) -> &'a [f64] {
        match self {
            Self::Occurrence { nutrients, .. } => nutrients,
            Self::Gap => &[],
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn check_range(v: &[f64]) -> Result<(), MdtwError> {
    for (index, &value) in v.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(MdtwError::NutrientOutOfRange { index, value });
        }
    }
    Ok(())
}

/// Local cost between two events.
///
/// - One side empty: the squared norm of the other side's vector, the
///   full penalty for un-matched nutrient mass. No time term applies.
/// - Both sides non-empty: squared Euclidean value difference, plus (unless
///   `params.traditional`) a time penalty `(|ta - tb| / delta)^alpha`
///   scaled by `2 * beta * (a·b)`, so events sharing more nutrient mass pay
///   more for being far apart in time.
///
/// Validation runs here even for callers that bypassed preparation.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MdtwError::DimensionMismatch`] | Both vectors non-empty with different lengths |
/// | [`MdtwError::NutrientOutOfRange`] | Any value outside [0, 1] |
pub fn local_cost(a: LocalEvent<'_>, b: LocalEvent<'_>, params: &CostParams) -> Result<f64, MdtwError> {
    let va = a.nutrients();
    let vb = b.nutrients();

    // Empty-side cases carry no time coordinate and skip range validation,
    // matching the gap costs accumulated along the DP borders.
    match (va.is_empty(), vb.is_empty()) {
        (true, true) => return Ok(0.0),
        (true, false) => return Ok(dot(vb, vb)),
        (false, true) => return Ok(dot(va, va)),
        (false, false) => {}
    }

    if va.len() != vb.len() {
        return Err(MdtwError::DimensionMismatch {
            expected: va.len(),
            got: vb.len(),
        });
    }
    check_range(va)?;
    check_range(vb)?;

    // Weight matrix is the identity.
    let value_diff: f64 = va.iter().zip(vb).map(|(x, y)| (x - y).powi(2)).sum();
    if params.traditional {
        return Ok(value_diff);
    }

    // Non-empty nutrients imply a real occurrence on both sides.
    let (LocalEvent::Occurrence { time: ta, .. }, LocalEvent::Occurrence { time: tb, .. }) = (a, b)
    else {
        return Ok(value_diff);
    };

    let time_diff = ((ta - tb).abs() / params.delta).powf(params.alpha);
    let scale = 2.0 * params.beta * dot(va, vb);
    Ok(value_diff + scale * time_diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(time: f64, nutrients: &[f64]) -> LocalEvent<'_> {
        LocalEvent::Occurrence { time, nutrients }
    }

    #[test]
    fn same_time_reduces_to_value_diff() {
        // Zero time offset kills the coupling term, so the cost equals the
        // squared value difference.
        let params = CostParams::default();
        let cost = local_cost(occ(8.0, &[0.5]), occ(8.0, &[0.3]), &params).unwrap();
        assert!((cost - 0.04).abs() < 1e-12);

        let cost = local_cost(occ(10.0, &[0.2, 0.8]), occ(10.0, &[0.4, 0.6]), &params).unwrap();
        assert!((cost - 0.08).abs() < 1e-12);
    }

    #[test]
    fn identical_events_cost_zero() {
        let params = CostParams::default();
        let cost = local_cost(occ(12.0, &[0.3, 0.7]), occ(12.0, &[0.3, 0.7]), &params).unwrap();
        assert!(cost.abs() < 1e-12);
    }

    #[test]
    fn gap_side_charges_squared_norm() {
        let params = CostParams::default();
        let cost = local_cost(occ(8.0, &[0.6, 0.8]), LocalEvent::Gap, &params).unwrap();
        assert!((cost - 1.0).abs() < 1e-12);

        let cost = local_cost(LocalEvent::Gap, occ(8.0, &[0.5]), &params).unwrap();
        assert!((cost - 0.25).abs() < 1e-12);
    }

    #[test]
    fn gap_against_gap_is_free() {
        let cost = local_cost(LocalEvent::Gap, LocalEvent::Gap, &CostParams::default()).unwrap();
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn time_coupling_term() {
        // value_diff = 0, scale = 2 * 1 * 0.25, time_diff = (5/23)^2
        let params = CostParams::default();
        let cost = local_cost(occ(8.0, &[0.5]), occ(13.0, &[0.5]), &params).unwrap();
        let expected = 2.0 * 0.25 * (5.0_f64 / 23.0).powi(2);
        assert!((cost - expected).abs() < 1e-12, "got {cost}, expected {expected}");
    }

    #[test]
    fn traditional_mode_drops_time_term() {
        let params = CostParams::traditional();
        let cost = local_cost(occ(8.0, &[0.5]), occ(20.0, &[0.5]), &params).unwrap();
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn dimension_mismatch() {
        let params = CostParams::default();
        let result = local_cost(occ(8.0, &[0.5]), occ(9.0, &[0.3, 0.7]), &params);
        assert!(matches!(
            result,
            Err(MdtwError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn rejects_negative_value() {
        let params = CostParams::default();
        let result = local_cost(occ(8.0, &[-0.1]), occ(9.0, &[0.3]), &params);
        assert!(matches!(
            result,
            Err(MdtwError::NutrientOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_value_above_one() {
        let params = CostParams::default();
        let result = local_cost(occ(8.0, &[0.5, 0.5]), occ(9.0, &[0.2, 1.5]), &params);
        assert!(matches!(
            result,
            Err(MdtwError::NutrientOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn cost_is_symmetric() {
        let params = CostParams::default();
        let ab = local_cost(occ(8.0, &[0.2, 0.3]), occ(14.0, &[0.1, 0.4]), &params).unwrap();
        let ba = local_cost(occ(14.0, &[0.1, 0.4]), occ(8.0, &[0.2, 0.3]), &params).unwrap();
        assert!((ab - ba).abs() < 1e-15);
    }
}

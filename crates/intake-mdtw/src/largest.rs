//! Largest-event extraction from a prepared person.

use crate::prepare::NormalizedPerson;

/// The time and fractional share of a person's largest eating event,
/// measured on the first nutrient dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LargestEvent {
    /// Hour of the event with the maximal first-dimension value.
    pub time: f64,
    /// That value divided by the sum over all events; 0 when the sum is 0.
    pub fraction: f64,
}

/// Find a person's largest eating event on the first nutrient dimension.
///
/// Ties keep the earliest event. A zero total yields fraction 0 rather
/// than an error: this consumes already-normalized data, where a zero
/// total indicates an empty dimension, not invalid input. Returns `None`
/// only for a person with no events, which preparation never produces.
#[must_use]
pub fn largest_event(person: &NormalizedPerson) -> Option<LargestEvent> {
    let mut total = 0.0_f64;
    let mut best: Option<(f64, f64)> = None;

    for (time, nutrients) in person.iter() {
        let value = nutrients.first().copied().unwrap_or(0.0);
        total += value;
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((time, value)),
        }
    }

    best.map(|(time, value)| LargestEvent {
        time,
        fraction: if total > 0.0 { value / total } else { 0.0 },
    })
}

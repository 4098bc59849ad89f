//! Person preparation: validation, time sorting, and nutrient normalization.

use crate::error::MdtwError;
use crate::event::{EventRecord, EventSeries, Person};

/// A person's events after preparation: an ordered mapping from time to a
/// nutrient vector, where every dimension sums to 1 across all events.
///
/// Keys are unique and strictly ascending. When a person reports two events
/// at the exact same hour, the later record in stable-sorted order wins.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPerson {
    series: EventSeries,
}

impl NormalizedPerson {
    /// Borrow the underlying time-sorted series.
    #[must_use]
    pub fn as_series(&self) -> &EventSeries {
        &self.series
    }

    /// Number of distinct event times.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Return true if the person has no events. Never the case for a value
    /// produced by [`prepare_person`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Look up the normalized vector at an exact time key.
    #[must_use]
    pub fn get(&self, time: f64) -> Option<&[f64]> {
        self.series
            .records()
            .iter()
            .find(|r| r.time == time)
            .map(|r| r.nutrients.as_slice())
    }

    /// Iterate over `(time, normalized vector)` pairs in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.series.iter()
    }
}

/// Prepare a raw person for distance computation.
///
/// Steps, each fail-fast:
/// 1. All nutrient vectors must share one dimension.
/// 2. Stable sort by time (ties keep arrival order).
/// 3. Per-dimension totals must all be non-zero.
/// 4. Divide each vector element-wise by the totals, yielding values in [0, 1].
///
/// Pure function; the input person is left untouched.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MdtwError::EmptyPerson`] | The person has no records |
/// | [`MdtwError::DimensionMismatch`] | Records disagree on nutrient dimension |
/// | [`MdtwError::ZeroTotal`] | A dimension sums to zero across all events |
pub fn prepare_person(person: &Person) -> Result<NormalizedPerson, MdtwError> {
    let records = &person.records;
    let Some(first) = records.first() else {
        return Err(MdtwError::EmptyPerson);
    };

    let dim = first.nutrients.len();
    for record in records {
        if record.nutrients.len() != dim {
            return Err(MdtwError::DimensionMismatch {
                expected: dim,
                got: record.nutrients.len(),
            });
        }
    }

    let mut sorted: Vec<EventRecord> = records.clone();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut totals = vec![0.0_f64; dim];
    for record in &sorted {
        for (total, value) in totals.iter_mut().zip(&record.nutrients) {
            *total += value;
        }
    }
    if let Some(dimension) = totals.iter().position(|&t| t == 0.0) {
        return Err(MdtwError::ZeroTotal { dimension });
    }

    let mut normalized: Vec<EventRecord> = Vec::with_capacity(sorted.len());
    for record in sorted {
        let nutrients: Vec<f64> = record
            .nutrients
            .iter()
            .zip(&totals)
            .map(|(value, total)| value / total)
            .collect();
        // Duplicate time keys collapse to the later record.
        if normalized.last().is_some_and(|last: &EventRecord| last.time == record.time) {
            normalized.pop();
        }
        normalized.push(EventRecord::new(record.time, nutrients));
    }

    Ok(NormalizedPerson {
        series: EventSeries::new_unchecked(normalized),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(records: Vec<(f64, Vec<f64>)>) -> Person {
        Person::new(
            "p1",
            records
                .into_iter()
                .map(|(time, nutrients)| EventRecord::new(time, nutrients))
                .collect(),
        )
    }

    #[test]
    fn sorts_and_normalizes_single_dimension() {
        // 100 + 200 + 100 = 400 total
        let p = person(vec![
            (20.0, vec![100.0]),
            (8.0, vec![100.0]),
            (13.0, vec![200.0]),
        ]);
        let prepared = prepare_person(&p).unwrap();
        let entries: Vec<(f64, Vec<f64>)> =
            prepared.iter().map(|(t, v)| (t, v.to_vec())).collect();
        assert_eq!(
            entries,
            vec![
                (8.0, vec![0.25]),
                (13.0, vec![0.5]),
                (20.0, vec![0.25]),
            ]
        );
    }

    #[test]
    fn dimensions_sum_to_one() {
        let p = person(vec![
            (7.0, vec![300.0, 10.0]),
            (12.0, vec![500.0, 30.0]),
            (19.0, vec![200.0, 60.0]),
        ]);
        let prepared = prepare_person(&p).unwrap();
        let mut sums = vec![0.0; 2];
        for (_, v) in prepared.iter() {
            for (s, x) in sums.iter_mut().zip(v) {
                *s += x;
            }
        }
        for s in sums {
            assert!((s - 1.0).abs() < 1e-9, "dimension sum was {s}");
        }
    }

    #[test]
    fn keys_strictly_ascending() {
        let p = person(vec![
            (23.0, vec![50.0]),
            (1.0, vec![50.0]),
            (12.0, vec![50.0]),
            (6.0, vec![50.0]),
        ]);
        let prepared = prepare_person(&p).unwrap();
        let times: Vec<f64> = prepared.iter().map(|(t, _)| t).collect();
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn duplicate_time_keeps_later_record() {
        let p = person(vec![(8.0, vec![100.0]), (8.0, vec![300.0])]);
        let prepared = prepare_person(&p).unwrap();
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared.get(8.0).unwrap(), &[0.75]);
    }

    #[test]
    fn rejects_empty_person() {
        let p = person(vec![]);
        assert!(matches!(prepare_person(&p), Err(MdtwError::EmptyPerson)));
    }

    #[test]
    fn rejects_inconsistent_dimensions() {
        let p = person(vec![(8.0, vec![100.0]), (12.0, vec![100.0, 50.0])]);
        assert!(matches!(
            prepare_person(&p),
            Err(MdtwError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn rejects_zero_total_dimension() {
        let p = person(vec![(8.0, vec![100.0, 0.0]), (12.0, vec![50.0, 0.0])]);
        assert!(matches!(
            prepare_person(&p),
            Err(MdtwError::ZeroTotal { dimension: 1 })
        ));
    }

    #[test]
    fn input_person_unchanged() {
        let p = person(vec![(20.0, vec![100.0]), (8.0, vec![100.0])]);
        let before = p.clone();
        let _ = prepare_person(&p).unwrap();
        assert_eq!(p, before);
    }

    #[test]
    fn get_misses_absent_time() {
        let p = person(vec![(8.0, vec![100.0])]);
        let prepared = prepare_person(&p).unwrap();
        assert!(prepared.get(9.0).is_none());
    }
}

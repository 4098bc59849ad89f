//! Eating-event data model: records, persons, and time-sorted series.

use crate::error::MdtwError;

/// A single timestamped eating event: an hour-of-day and a nutrient vector.
///
/// The engine does not constrain `time` to 0–23; it only requires that all
/// nutrient vectors within one person share the same dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Hour of the event.
    pub time: f64,
    /// Nutrient measurements, one value per tracked dimension.
    pub nutrients: Vec<f64>,
}

impl EventRecord {
    /// Create a new event record.
    #[must_use]
    pub fn new(time: f64, nutrients: Vec<f64>) -> Self {
        Self { time, nutrients }
    }
}

/// A person's raw eating events, in arrival order (no time ordering assumed).
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Unique person identifier.
    pub id: String,
    /// Eating events as received from the upstream store.
    pub records: Vec<EventRecord>,
}

impl Person {
    /// Create a new person from raw records.
    #[must_use]
    pub fn new(id: impl Into<String>, records: Vec<EventRecord>) -> Self {
        Self { id: id.into(), records }
    }
}

/// An immutable sequence of eating events sorted ascending by time.
///
/// Produced by [`prepare_person`](crate::prepare_person) or built directly
/// from pre-sorted records. Ties in time are permitted; descending steps
/// are rejected at construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventSeries(Vec<EventRecord>);

impl EventSeries {
    /// Create a series from records, validating ascending time order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MdtwError::UnsortedSeries`] | A record's time is less than its predecessor's |
    pub fn new(records: Vec<EventRecord>) -> Result<Self, MdtwError> {
        for (index, pair) in records.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(MdtwError::UnsortedSeries { index: index + 1 });
            }
        }
        Ok(Self(records))
    }

    /// The empty series.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Create a series without the ordering check. Internal use only, for
    /// records already sorted by preparation.
    pub(crate) fn new_unchecked(records: Vec<EventRecord>) -> Self {
        Self(records)
    }

    /// Return the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the series has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the underlying time-sorted records.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.0
    }

    /// Iterate over `(time, nutrients)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.0.iter().map(|r| (r.time, r.nutrients.as_slice()))
    }
}

impl AsRef<[EventRecord]> for EventSeries {
    fn as_ref(&self) -> &[EventRecord] {
        &self.0
    }
}

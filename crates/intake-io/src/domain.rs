//! Domain types for intake-io.

use intake_mdtw::Person;
use serde::{Deserialize, Serialize};

use crate::IoError;

/// A person identifier.
///
/// Wraps the non-empty `person_id` primary key of the upstream store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonId(String);

impl PersonId {
    /// Create a new person ID from a non-empty string.
    pub(crate) fn new(id: String) -> Self {
        debug_assert!(!id.is_empty(), "person ID must not be empty");
        Self(id)
    }

    /// Return the person ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The canonical wire shape of one eating event, as stored upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Hour of the event.
    pub time: f64,
    /// Nutrient measurements.
    pub nutrients: Vec<f64>,
}

/// The canonical wire shape of one person record as the keyed store
/// returns it; `person_id` is the primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPerson {
    /// Unique person identifier.
    pub person_id: String,
    /// Eating events in arrival order; no time ordering is guaranteed.
    pub records: Vec<RawRecord>,
}

impl From<RawPerson> for Person {
    fn from(raw: RawPerson) -> Self {
        Person::new(
            raw.person_id,
            raw.records
                .into_iter()
                .map(|r| intake_mdtw::EventRecord::new(r.time, r.nutrients))
                .collect(),
        )
    }
}

impl From<&Person> for RawPerson {
    fn from(person: &Person) -> Self {
        Self {
            person_id: person.id.clone(),
            records: person
                .records
                .iter()
                .map(|r| RawRecord {
                    time: r.time,
                    nutrients: r.nutrients.clone(),
                })
                .collect(),
        }
    }
}

/// A batch of person records with a fixed id ordering.
///
/// Ids and persons are stored in parallel vectors: `person_ids[i]`
/// corresponds to `people[i]`. This ordering is the one distance matrix
/// rows and columns are labelled with.
#[derive(Debug)]
pub struct Cohort {
    /// Person identifiers in input order.
    pub person_ids: Vec<PersonId>,
    /// Raw persons in the same order as `person_ids`.
    pub people: Vec<Person>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_id_as_str_returns_inner() {
        let id = PersonId::new("person_42".to_string());
        assert_eq!(id.as_str(), "person_42");
    }

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("diet-study_01".to_string());
        assert!(name.is_ok());
        assert_eq!(name.unwrap().as_str(), "diet-study_01");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("diet study!".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn raw_person_round_trips_through_person() {
        let raw = RawPerson {
            person_id: "p1".to_string(),
            records: vec![RawRecord { time: 8.0, nutrients: vec![250.0, 10.0] }],
        };
        let person: Person = raw.into();
        assert_eq!(person.id, "p1");
        assert_eq!(person.records[0].nutrients, vec![250.0, 10.0]);

        let back = RawPerson::from(&person);
        assert_eq!(back.person_id, "p1");
        assert_eq!(back.records[0].time, 8.0);
    }

    #[test]
    fn raw_person_deserializes_canonical_shape() {
        let json = r#"{"person_id":"person_1","records":[{"time":8.0,"nutrients":[250.0]}]}"#;
        let raw: RawPerson = serde_json::from_str(json).unwrap();
        assert_eq!(raw.person_id, "person_1");
        assert_eq!(raw.records.len(), 1);
    }
}

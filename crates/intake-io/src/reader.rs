//! JSONL person-record reader with full input validation.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::domain::{Cohort, PersonId, RawPerson};
use crate::IoError;

/// Reads person records from a JSONL file.
///
/// Expected format: one JSON object per line in the canonical shape
/// `{"person_id": ..., "records": [{"time": ..., "nutrients": [...]}]}`.
/// Blank lines are skipped. The file is drained line by line in a single
/// iterative pass, so arbitrarily large batches never grow the call stack.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or cannot be opened |
/// | [`IoError::ReadFailed`] | Reading from the open file fails mid-stream |
/// | [`IoError::JsonParse`] | A line is not a valid person record |
/// | [`IoError::EmptyPersonId`] | A record's `person_id` is empty |
/// | [`IoError::NonFiniteValue`] | A time or nutrient is NaN or infinite |
/// | [`IoError::DuplicatePersonId`] | The same `person_id` appears twice |
/// | [`IoError::EmptyDataset`] | Zero records in the file |
pub struct PersonReader {
    path: PathBuf,
}

impl PersonReader {
    /// Create a new reader for the given JSONL file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the file, returning a [`Cohort`] in input order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Cohort, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let reader = std::io::BufReader::new(file);

        let mut person_ids = Vec::new();
        let mut people = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let raw: RawPerson =
                serde_json::from_str(&line).map_err(|e| IoError::JsonParse {
                    path: self.path.clone(),
                    line: line_no,
                    source: e,
                })?;

            if raw.person_id.is_empty() {
                return Err(IoError::EmptyPersonId {
                    path: self.path.clone(),
                    line: line_no,
                });
            }

            self.check_finite(&raw, line_no)?;

            if let Some(&first_line) = seen.get(&raw.person_id) {
                return Err(IoError::DuplicatePersonId {
                    path: self.path.clone(),
                    person_id: raw.person_id,
                    first_line,
                    second_line: line_no,
                });
            }
            seen.insert(raw.person_id.clone(), line_no);

            debug!(person_id = %raw.person_id, n_records = raw.records.len(), "read person");
            person_ids.push(PersonId::new(raw.person_id.clone()));
            people.push(raw.into());
        }

        if person_ids.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_people = person_ids.len(), "cohort loaded");
        Ok(Cohort { person_ids, people })
    }

    fn check_finite(&self, raw: &RawPerson, line: usize) -> Result<(), IoError> {
        for record in &raw.records {
            if !record.time.is_finite() {
                return Err(IoError::NonFiniteValue {
                    path: self.path.clone(),
                    line,
                    person_id: raw.person_id.clone(),
                    field: "time",
                });
            }
            if record.nutrients.iter().any(|v| !v.is_finite()) {
                return Err(IoError::NonFiniteValue {
                    path: self.path.clone(),
                    line,
                    person_id: raw.person_id.clone(),
                    field: "nutrient",
                });
            }
        }
        Ok(())
    }
}

//! I/O error types for intake-io.

use std::path::PathBuf;

/// Errors from person-record files, synthetic generation, and result writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading from an already-open input file fails
    /// mid-stream.
    #[error("failed reading {path}")]
    ReadFailed {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a line of the JSONL input fails to parse as a person
    /// record.
    #[error("malformed person record in {path} at line {line}")]
    JsonParse {
        /// Path to the JSONL file.
        path: PathBuf,
        /// One-based line number of the offending record.
        line: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the input contains zero person records.
    #[error("empty dataset (no person records) in {path}")]
    EmptyDataset {
        /// Path to the JSONL file.
        path: PathBuf,
    },

    /// Returned when a record's time or a nutrient value is NaN or infinite.
    #[error("non-finite {field} in {path} at line {line} (person {person_id})")]
    NonFiniteValue {
        /// Path to the JSONL file.
        path: PathBuf,
        /// One-based line number of the offending record.
        line: usize,
        /// Person ID of the offending record.
        person_id: String,
        /// Which field was non-finite ("time" or "nutrient").
        field: &'static str,
    },

    /// Returned when a person record has an empty id.
    #[error("empty person_id in {path} at line {line}")]
    EmptyPersonId {
        /// Path to the JSONL file.
        path: PathBuf,
        /// One-based line number of the offending record.
        line: usize,
    },

    /// Returned when the same person id appears more than once.
    #[error("duplicate person_id \"{person_id}\" in {path}: first at line {first_line}, again at line {second_line}")]
    DuplicatePersonId {
        /// Path to the JSONL file.
        path: PathBuf,
        /// The duplicated person id.
        person_id: String,
        /// One-based line number of the first occurrence.
        first_line: usize,
        /// One-based line number of the second occurrence.
        second_line: usize,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result or data file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when generation parameters are inconsistent, e.g. a meal
    /// count range that is empty or exceeds the 24 distinct hours of a day.
    #[error("invalid generation config: {reason}")]
    InvalidGenerateConfig {
        /// Human-readable description of the inconsistency.
        reason: String,
    },
}

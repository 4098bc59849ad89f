//! Person-record I/O for the intake mDTW engine.
//!
//! JSONL readers and result writers for the canonical person-record shape,
//! plus seeded synthetic cohort generation. All distance math lives in
//! `intake-mdtw`; this crate only moves validated data in and out.

mod domain;
mod error;
mod generate;
mod reader;
mod writer;

pub use domain::{Cohort, ExperimentName, PersonId, RawPerson, RawRecord};
pub use error::IoError;
pub use generate::{GenerateConfig, generate_jsonl};
pub use reader::PersonReader;
pub use writer::ResultWriter;

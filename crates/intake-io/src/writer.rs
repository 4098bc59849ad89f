//! JSON and CSV result writers for distance matrices and person profiles.

use std::fs;
use std::path::{Path, PathBuf};

use intake_mdtw::{Alignment, CostParams, DistanceMatrix, NormalizedPerson};
use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::{ExperimentName, PersonId};
use crate::IoError;

/// Writes distance matrices and normalized profiles to result files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_matrix.json`,
/// `{experiment}_matrix.csv`, and `{experiment}_profiles.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

#[derive(Serialize)]
struct MatrixArtifact<'a> {
    experiment: &'a str,
    n_people: usize,
    alignment: &'a str,
    traditional: bool,
    delta: f64,
    beta: f64,
    alpha: f64,
    person_ids: Vec<&'a str>,
    /// Row-major square matrix; rows and columns follow `person_ids` order.
    matrix: Vec<Vec<f64>>,
}

#[derive(Serialize)]
struct ProfileArtifact<'a> {
    experiment: &'a str,
    profiles: Vec<ProfileEntry<'a>>,
}

#[derive(Serialize)]
struct ProfileEntry<'a> {
    person_id: &'a str,
    events: Vec<ProfileEvent>,
}

#[derive(Serialize)]
struct ProfileEvent {
    time: f64,
    nutrients: Vec<f64>,
}

fn alignment_label(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Warped => "warped",
        Alignment::PositionPaired => "paired",
    }
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write the distance matrix as a JSON artifact.
    ///
    /// The artifact carries the person id ordering alongside the row-major
    /// matrix so downstream labels always line up with cell indices.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if serialization or writing fails.
    #[instrument(skip_all, fields(n = ids.len()))]
    pub fn write_matrix(
        &self,
        ids: &[PersonId],
        matrix: &DistanceMatrix,
        params: &CostParams,
        alignment: Alignment,
    ) -> Result<PathBuf, IoError> {
        let artifact = MatrixArtifact {
            experiment: self.experiment.as_str(),
            n_people: ids.len(),
            alignment: alignment_label(alignment),
            traditional: params.traditional,
            delta: params.delta,
            beta: params.beta,
            alpha: params.alpha,
            person_ids: ids.iter().map(PersonId::as_str).collect(),
            matrix: matrix.to_rows(),
        };
        let path = self.output_path("matrix", "json");
        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "matrix artifact written");
        Ok(path)
    }

    /// Write the distance matrix as an id-labelled CSV.
    ///
    /// First column and header row carry person ids; the body is the
    /// row-major matrix.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if writing fails.
    #[instrument(skip_all, fields(n = ids.len()))]
    pub fn write_matrix_csv(
        &self,
        ids: &[PersonId],
        matrix: &DistanceMatrix,
    ) -> Result<PathBuf, IoError> {
        let path = self.output_path("matrix", "csv");
        let mut wtr = csv::Writer::from_path(&path).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;

        let mut header = vec!["person_id".to_string()];
        header.extend(ids.iter().map(|id| id.as_str().to_string()));
        wtr.write_record(&header).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;

        for (id, row) in ids.iter().zip(matrix.to_rows()) {
            let mut record = vec![id.as_str().to_string()];
            record.extend(row.iter().map(|v| v.to_string()));
            wtr.write_record(&record).map_err(|e| IoError::WriteFile {
                path: path.clone(),
                source: std::io::Error::other(e),
            })?;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "matrix CSV written");
        Ok(path)
    }

    /// Write normalized person profiles for time-series rendering.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if serialization or writing fails.
    #[instrument(skip_all, fields(n = ids.len()))]
    pub fn write_profiles(
        &self,
        ids: &[PersonId],
        people: &[NormalizedPerson],
    ) -> Result<PathBuf, IoError> {
        let artifact = ProfileArtifact {
            experiment: self.experiment.as_str(),
            profiles: ids
                .iter()
                .zip(people)
                .map(|(id, person)| ProfileEntry {
                    person_id: id.as_str(),
                    events: person
                        .iter()
                        .map(|(time, nutrients)| ProfileEvent {
                            time,
                            nutrients: nutrients.to_vec(),
                        })
                        .collect(),
                })
                .collect(),
        };
        let path = self.output_path("profiles", "json");
        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "profiles artifact written");
        Ok(path)
    }

    fn output_path(&self, kind: &str, ext: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.{ext}", self.experiment.as_str()))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

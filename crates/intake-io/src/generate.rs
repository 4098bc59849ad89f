//! Seeded synthetic cohort generation and JSONL export.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

use crate::domain::{RawPerson, RawRecord};
use crate::IoError;

/// Bounded capacity of the generation-to-writer channel.
const CHANNEL_CAPACITY: usize = 25;

/// Parameters for synthetic cohort generation.
///
/// Each generated person eats at distinct whole hours drawn from a single
/// day, with a uniform calorie draw per meal. The same seed always yields
/// the same cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Number of persons to generate.
    pub num_people: usize,
    /// Minimum meals per person (inclusive).
    pub min_meals: usize,
    /// Maximum meals per person (inclusive).
    pub max_meals: usize,
    /// Minimum calories per meal (inclusive).
    pub min_calories: u32,
    /// Maximum calories per meal (exclusive).
    pub max_calories: u32,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            num_people: 5,
            min_meals: 1,
            max_meals: 5,
            min_calories: 200,
            max_calories: 800,
        }
    }
}

impl GenerateConfig {
    fn validate(&self) -> Result<(), IoError> {
        if self.min_meals == 0 || self.min_meals > self.max_meals {
            return Err(IoError::InvalidGenerateConfig {
                reason: format!(
                    "meal count range {}..={} is empty or starts at zero",
                    self.min_meals, self.max_meals
                ),
            });
        }
        if self.max_meals > 24 {
            return Err(IoError::InvalidGenerateConfig {
                reason: format!("max_meals {} exceeds the 24 distinct hours of a day", self.max_meals),
            });
        }
        if self.min_calories >= self.max_calories {
            return Err(IoError::InvalidGenerateConfig {
                reason: format!(
                    "calorie range {}..{} is empty",
                    self.min_calories, self.max_calories
                ),
            });
        }
        Ok(())
    }

    /// Generate a full cohort in memory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidGenerateConfig`] for an empty meal-count
    /// or calorie range, or a meal count above 24.
    #[instrument(skip(self), fields(n = self.num_people))]
    pub fn generate(&self, seed: u64) -> Result<Vec<RawPerson>, IoError> {
        self.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let people = (1..=self.num_people)
            .map(|person_id| self.generate_person(person_id, &mut rng))
            .collect();
        Ok(people)
    }

    fn generate_person(&self, person_id: usize, rng: &mut ChaCha8Rng) -> RawPerson {
        let num_meals = rng.gen_range(self.min_meals..=self.max_meals);

        // Distinct hours, sorted ascending.
        let mut meal_times = rand::seq::index::sample(rng, 24, num_meals).into_vec();
        meal_times.sort_unstable();

        let records = meal_times
            .into_iter()
            .map(|hour| RawRecord {
                time: hour as f64,
                nutrients: vec![f64::from(rng.gen_range(self.min_calories..self.max_calories))],
            })
            .collect();

        RawPerson {
            person_id: format!("person_{person_id}"),
            records,
        }
    }

    /// Generate a cohort and stream it to a JSONL file.
    ///
    /// Generation runs on its own thread, feeding records through a
    /// bounded channel drained by the writing side; the channel closing
    /// marks completion and its capacity bounds how far generation can run
    /// ahead of the writer. Returns the number of persons written.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidGenerateConfig`] on bad parameters, or
    /// [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip(self), fields(n = self.num_people, path = %path.display()))]
    pub fn write_jsonl(&self, path: &Path, seed: u64) -> Result<usize, IoError> {
        self.validate()?;

        let file = std::fs::File::create(path).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut out = std::io::BufWriter::new(file);

        let (tx, rx) = mpsc::sync_channel::<RawPerson>(CHANNEL_CAPACITY);
        let config = *self;
        let producer = thread::spawn(move || {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for person_id in 1..=config.num_people {
                let person = config.generate_person(person_id, &mut rng);
                if tx.send(person).is_err() {
                    break;
                }
            }
        });

        let mut written = 0usize;
        let write_result = (|| -> Result<(), IoError> {
            for person in rx {
                let line = serde_json::to_string(&person).map_err(|e| IoError::WriteFile {
                    path: path.to_path_buf(),
                    source: std::io::Error::other(e),
                })?;
                writeln!(out, "{line}").map_err(|e| IoError::WriteFile {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                written += 1;
            }
            out.flush().map_err(|e| IoError::WriteFile {
                path: path.to_path_buf(),
                source: e,
            })
        })();

        // The closure consumed the receiver, so even after a failed write
        // the producer's next send errors out instead of blocking.
        let _ = producer.join();
        write_result?;

        info!(written, "cohort written");
        Ok(written)
    }
}

/// Convenience wrapper returning the output path after a successful write.
///
/// # Errors
///
/// Same as [`GenerateConfig::write_jsonl`].
pub fn generate_jsonl(config: &GenerateConfig, path: &Path, seed: u64) -> Result<PathBuf, IoError> {
    config.write_jsonl(path, seed)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::PersonReader;
    use tempfile::TempDir;

    #[test]
    fn same_seed_same_cohort() {
        let config = GenerateConfig::default();
        let a = config.generate(42).unwrap();
        let b = config.generate(42).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.person_id, y.person_id);
            assert_eq!(x.records.len(), y.records.len());
            for (rx, ry) in x.records.iter().zip(&y.records) {
                assert_eq!(rx.time, ry.time);
                assert_eq!(rx.nutrients, ry.nutrients);
            }
        }
    }

    #[test]
    fn different_seeds_differ() {
        let config = GenerateConfig {
            num_people: 10,
            ..GenerateConfig::default()
        };
        let a = config.generate(1).unwrap();
        let b = config.generate(2).unwrap();
        let same = a.iter().zip(&b).all(|(x, y)| {
            x.records.len() == y.records.len()
                && x.records.iter().zip(&y.records).all(|(rx, ry)| rx.time == ry.time)
        });
        assert!(!same, "seeds 1 and 2 produced identical cohorts");
    }

    #[test]
    fn meal_times_distinct_and_sorted() {
        let config = GenerateConfig {
            num_people: 20,
            min_meals: 3,
            max_meals: 8,
            ..GenerateConfig::default()
        };
        for person in config.generate(7).unwrap() {
            let times: Vec<f64> = person.records.iter().map(|r| r.time).collect();
            for pair in times.windows(2) {
                assert!(pair[0] < pair[1], "times not strictly ascending: {times:?}");
            }
            for t in times {
                assert!((0.0..24.0).contains(&t));
            }
        }
    }

    #[test]
    fn calories_within_range() {
        let config = GenerateConfig::default();
        for person in config.generate(3).unwrap() {
            for record in &person.records {
                let cal = record.nutrients[0];
                assert!((200.0..800.0).contains(&cal), "calories {cal} out of range");
            }
        }
    }

    #[test]
    fn meal_counts_within_range() {
        let config = GenerateConfig {
            num_people: 30,
            min_meals: 2,
            max_meals: 4,
            ..GenerateConfig::default()
        };
        for person in config.generate(11).unwrap() {
            assert!((2..=4).contains(&person.records.len()));
        }
    }

    #[test]
    fn rejects_empty_meal_range() {
        let config = GenerateConfig {
            min_meals: 5,
            max_meals: 2,
            ..GenerateConfig::default()
        };
        assert!(matches!(
            config.generate(1),
            Err(IoError::InvalidGenerateConfig { .. })
        ));
    }

    #[test]
    fn rejects_more_meals_than_hours() {
        let config = GenerateConfig {
            min_meals: 1,
            max_meals: 25,
            ..GenerateConfig::default()
        };
        assert!(matches!(
            config.generate(1),
            Err(IoError::InvalidGenerateConfig { .. })
        ));
    }

    #[test]
    fn rejects_empty_calorie_range() {
        let config = GenerateConfig {
            min_calories: 800,
            max_calories: 800,
            ..GenerateConfig::default()
        };
        assert!(matches!(
            config.generate(1),
            Err(IoError::InvalidGenerateConfig { .. })
        ));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn write_failure_surfaces_without_hanging() {
        // /dev/full accepts the open but fails every write, so the error
        // hits mid-stream while the producer thread is still sending.
        let config = GenerateConfig {
            num_people: 10_000,
            ..GenerateConfig::default()
        };
        let result = config.write_jsonl(Path::new("/dev/full"), 42);
        assert!(matches!(result, Err(IoError::WriteFile { .. })));
    }

    #[test]
    fn jsonl_round_trip_matches_in_memory_generation() {
        let config = GenerateConfig {
            num_people: 8,
            ..GenerateConfig::default()
        };
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cohort.jsonl");

        let written = config.write_jsonl(&path, 42).unwrap();
        assert_eq!(written, 8);

        let cohort = PersonReader::new(&path).read().unwrap();
        let direct = config.generate(42).unwrap();
        assert_eq!(cohort.people.len(), direct.len());
        for (read, generated) in cohort.people.iter().zip(&direct) {
            assert_eq!(read.id, generated.person_id);
            assert_eq!(read.records.len(), generated.records.len());
        }
    }
}

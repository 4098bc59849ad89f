use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use intake_io::{ExperimentName, GenerateConfig, PersonReader, ResultWriter};
use intake_mdtw::{
    Alignment, CostParams, DpKernel, Mdtw, NormalizedPerson, largest_event, prepare_person,
};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Eating-pattern similarity via modified dynamic time warping")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for pairwise computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Local-cost parameters shared by distance-computing subcommands.
#[derive(Args, Debug, Clone)]
struct CostArgs {
    /// Time-offset normalizer (hours)
    #[arg(long, default_value_t = 23.0)]
    delta: f64,

    /// Weight of the time-coupling term
    #[arg(long, default_value_t = 1.0)]
    beta: f64,

    /// Exponent of the normalized time offset
    #[arg(long, default_value_t = 2.0)]
    alpha: f64,

    /// Drop the time penalty and use the pure value-difference cost
    #[arg(long, default_value_t = false)]
    traditional: bool,
}

impl CostArgs {
    fn to_params(&self) -> CostParams {
        CostParams {
            delta: self.delta,
            beta: self.beta,
            alpha: self.alpha,
            traditional: self.traditional,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Generate a synthetic cohort as a JSONL file
    Generate {
        /// Output JSONL path
        #[arg(long)]
        out: PathBuf,

        /// Number of persons to generate
        #[arg(long, default_value_t = 5)]
        num_people: usize,

        /// Minimum meals per person (inclusive)
        #[arg(long, default_value_t = 1)]
        min_meals: usize,

        /// Maximum meals per person (inclusive)
        #[arg(long, default_value_t = 5)]
        max_meals: usize,

        /// Minimum calories per meal (inclusive)
        #[arg(long, default_value_t = 200)]
        min_calories: u32,

        /// Maximum calories per meal (exclusive)
        #[arg(long, default_value_t = 800)]
        max_calories: u32,
    },

    /// Compute the pairwise mDTW distance matrix for a cohort
    Matrix {
        /// Path to the input JSONL file of person records
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Alignment policy: "warped" or "paired"
        #[arg(long, default_value = "warped")]
        alignment: String,

        /// DP kernel: "two-row" or "full"
        #[arg(long, default_value = "two-row")]
        kernel: String,

        /// Also write the matrix as an id-labelled CSV
        #[arg(long, default_value_t = false)]
        csv: bool,

        /// Also write normalized person profiles for plotting
        #[arg(long, default_value_t = false)]
        profiles: bool,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Report each person's largest eating event
    Largest {
        /// Path to the input JSONL file of person records
        #[arg(long)]
        data: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct GenerateOutput {
    out: PathBuf,
    n_people: usize,
    seed: u64,
}

#[derive(Serialize)]
struct MatrixOutput {
    experiment: String,
    n_people: usize,
    alignment: String,
    kernel: String,
    traditional: bool,
    max_distance: f64,
    mean_distance: f64,
}

#[derive(Serialize)]
struct LargestOutput {
    n_people: usize,
    events: Vec<LargestEntry>,
}

#[derive(Serialize)]
struct LargestEntry {
    person_id: String,
    time: f64,
    fraction: f64,
}

fn parse_alignment(s: &str) -> Result<Alignment> {
    match s {
        "warped" => Ok(Alignment::Warped),
        "paired" => Ok(Alignment::PositionPaired),
        other => anyhow::bail!("unknown alignment: {other} (expected warped or paired)"),
    }
}

fn parse_kernel(s: &str) -> Result<DpKernel> {
    match s {
        "two-row" => Ok(DpKernel::TwoRow),
        "full" => Ok(DpKernel::FullMatrix),
        other => anyhow::bail!("unknown kernel: {other} (expected two-row or full)"),
    }
}

/// Prepare every person in the cohort, naming the person on failure so a
/// single malformed record points at its source.
fn prepare_cohort(people: &[intake_mdtw::Person]) -> Result<Vec<NormalizedPerson>> {
    people
        .iter()
        .map(|p| {
            prepare_person(p).with_context(|| format!("failed to prepare person {}", p.id))
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Generate {
            out,
            num_people,
            min_meals,
            max_meals,
            min_calories,
            max_calories,
        } => {
            let config = GenerateConfig {
                num_people,
                min_meals,
                max_meals,
                min_calories,
                max_calories,
            };
            let written = config
                .write_jsonl(&out, cli.seed)
                .context("failed to generate cohort")?;
            info!(n_people = written, "cohort generated");

            let output = GenerateOutput {
                out,
                n_people: written,
                seed: cli.seed,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Matrix {
            data,
            experiment,
            output_dir,
            alignment,
            kernel,
            csv,
            profiles,
            cost,
        } => {
            let alignment_policy = parse_alignment(&alignment)?;
            let dp_kernel = parse_kernel(&kernel)?;
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let params = cost.to_params();

            let cohort = PersonReader::new(&data)
                .read()
                .context("failed to read person records")?;
            info!(n_people = cohort.people.len(), "cohort loaded");

            let prepared = prepare_cohort(&cohort.people)?;

            let mdtw = Mdtw::new(params).with_kernel(dp_kernel);
            let matrix = mdtw
                .pairwise(&prepared, alignment_policy)
                .context("distance matrix computation failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            writer.write_matrix(&cohort.person_ids, &matrix, &params, alignment_policy)?;
            if csv {
                writer.write_matrix_csv(&cohort.person_ids, &matrix)?;
            }
            if profiles {
                writer.write_profiles(&cohort.person_ids, &prepared)?;
            }

            let off_diagonal: Vec<f64> = matrix.iter().map(|(_, _, d)| d.value()).collect();
            let max_distance = off_diagonal.iter().copied().fold(0.0, f64::max);
            let mean_distance = if off_diagonal.is_empty() {
                0.0
            } else {
                off_diagonal.iter().sum::<f64>() / off_diagonal.len() as f64
            };

            let output = MatrixOutput {
                experiment,
                n_people: matrix.len(),
                alignment,
                kernel,
                traditional: params.traditional,
                max_distance,
                mean_distance,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Largest { data } => {
            let cohort = PersonReader::new(&data)
                .read()
                .context("failed to read person records")?;
            let prepared = prepare_cohort(&cohort.people)?;

            let events: Vec<LargestEntry> = cohort
                .person_ids
                .iter()
                .zip(&prepared)
                .filter_map(|(id, person)| {
                    largest_event(person).map(|event| LargestEntry {
                        person_id: id.as_str().to_string(),
                        time: event.time,
                        fraction: event.fraction,
                    })
                })
                .collect();

            let output = LargestOutput {
                n_people: events.len(),
                events,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

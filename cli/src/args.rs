//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dcim_measure::Measure;

#[derive(Debug, Parser)]
#[command(name = "dcim")]
#[command(about = "Inconsistency measures for relational data under denial constraints")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect violations and compute the measures once
    Measure {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        measures: MeasureArgs,

        /// Print the measurements as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Inject one constraint violation per iteration and measure after each
    Simulate {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        measures: MeasureArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Number of injections
        #[arg(long)]
        iterations: Option<usize>,

        /// Passes over a constraint's predicates before an injection fails
        #[arg(long)]
        attempts: Option<usize>,
    },

    /// Rewrite random cells of constraint columns and measure periodically
    Noise {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        measures: MeasureArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Fraction of all cells to rewrite
        #[arg(long)]
        error_rate: Option<f64>,

        /// Zipf exponent for domain replacement (0 is uniform)
        #[arg(long)]
        skew: Option<f64>,

        /// Probability that a rewrite is a typo
        #[arg(long)]
        typo_prob: Option<f64>,

        /// Measure after every N rewrites
        #[arg(long)]
        measure_every: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Dataset file: header row, then comma-separated rows
    pub dataset: PathBuf,

    /// Constraint file: one `not(...)` per line, `#` comments allowed
    pub constraints: PathBuf,

    /// JSON run configuration; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MeasureArgs {
    /// Measures to compute, comma-separated (I_D,I_MI,I_P,I_R,I_lin_R,I_MC)
    #[arg(long, value_delimiter = ',', value_parser = parse_measure)]
    pub measures: Vec<Measure>,

    /// Compute all six measures, I_MC included
    #[arg(long, default_value_t = false, conflicts_with = "measures")]
    pub all_measures: bool,

    /// Time limit in milliseconds for each of I_R and I_lin_R
    #[arg(long)]
    pub solver_timeout_ms: Option<u64>,

    /// External maximal-clique program for I_MC
    #[arg(long)]
    pub analyzer: Option<PathBuf>,

    /// Argument passed to the external analyzer before the handoff file
    #[arg(long = "analyzer-arg", allow_hyphen_values = true)]
    pub analyzer_args: Vec<String>,

    /// Time limit in milliseconds for I_MC
    #[arg(long)]
    pub analyzer_timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory that receives a timestamped results folder
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
}

fn parse_measure(text: &str) -> Result<Measure, String> {
    text.parse::<Measure>().map_err(|e| e.to_string())
}

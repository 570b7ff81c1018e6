//! Command execution.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dcim_measure::{Measure, MeasureSelection};
use dcim_session::{AnalyzerConfig, NoiseConfig, Simulation, SimulationConfig, SimulationMode};
use tracing::info;

use crate::args::{Cli, Command, InputArgs, MeasureArgs, RunArgs};
use crate::format::{format_measurements, format_summary};

/// Execute one parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli.command)?;
    let input = match &cli.command {
        Command::Measure { input, .. } | Command::Simulate { input, .. } | Command::Noise { input, .. } => input,
    };
    let mut simulation = load(input, config)?;

    match &cli.command {
        Command::Measure { json, .. } => {
            let point = simulation.measure(0)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&point.measurements)?);
            } else {
                println!("violating pairs: {}", point.violations);
                print!("{}", format_measurements(&point.measurements));
            }
        }
        Command::Simulate { .. } | Command::Noise { .. } => {
            let series = simulation.run()?;
            print!("{}", format_summary(&series, &simulation.config().measures));
        }
    }
    Ok(())
}

/// The run configuration for a command: the `--config` file (or defaults)
/// with command-line flags applied on top.
pub fn build_config(command: &Command) -> Result<SimulationConfig> {
    let (input, measures) = match command {
        Command::Measure { input, measures, .. }
        | Command::Simulate { input, measures, .. }
        | Command::Noise { input, measures, .. } => (input, measures),
    };

    let mut config = match &input.config {
        Some(path) => SimulationConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    apply_measure_args(&mut config, measures);

    match command {
        Command::Measure { .. } => {}
        Command::Simulate {
            run,
            iterations,
            attempts,
            ..
        } => {
            apply_run_args(&mut config, run);
            config.mode = SimulationMode::Injection;
            if let Some(iterations) = iterations {
                config.iterations = *iterations;
            }
            if let Some(attempts) = attempts {
                config.injection_attempts = *attempts;
            }
        }
        Command::Noise {
            run,
            error_rate,
            skew,
            typo_prob,
            measure_every,
            ..
        } => {
            apply_run_args(&mut config, run);
            let mut noise = match config.mode {
                SimulationMode::RandomNoise(noise) => noise,
                SimulationMode::Injection => NoiseConfig::default(),
            };
            noise.error_rate = error_rate.unwrap_or(noise.error_rate);
            noise.skew = skew.unwrap_or(noise.skew);
            noise.typo_prob = typo_prob.unwrap_or(noise.typo_prob);
            noise.measure_every = measure_every.unwrap_or(noise.measure_every);
            config.mode = SimulationMode::RandomNoise(noise);
        }
    }

    config.validate()?;
    Ok(config)
}

fn apply_measure_args(config: &mut SimulationConfig, args: &MeasureArgs) {
    if args.all_measures {
        config.measures = MeasureSelection::all();
    } else if !args.measures.is_empty() {
        config.measures = MeasureSelection::only(args.measures.iter().copied());
    }
    if args.solver_timeout_ms.is_some() {
        config.solver_timeout_ms = args.solver_timeout_ms;
    }
    if let Some(program) = &args.analyzer {
        config.analyzer = AnalyzerConfig::External {
            program: program.clone(),
            args: args.analyzer_args.clone(),
        };
    }
    if args.analyzer_timeout_ms.is_some() {
        config.analyzer_timeout_ms = args.analyzer_timeout_ms;
    }
}

fn apply_run_args(config: &mut SimulationConfig, args: &RunArgs) {
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.results_dir.is_some() {
        config.results_dir = args.results_dir.clone();
    }
}

fn load(input: &InputArgs, config: SimulationConfig) -> Result<Simulation> {
    let dataset = read(&input.dataset)?;
    let constraints = read(&input.constraints)?;
    let simulation = Simulation::from_sources(&dataset, &constraints, config)?;
    info!(
        dataset = %input.dataset.display(),
        tuples = simulation.dataset().len(),
        constraints = simulation.constraints().len(),
        measures = ?simulation.config().measures.enabled().iter().map(Measure::name).collect::<Vec<_>>(),
        "input loaded"
    );
    Ok(simulation)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

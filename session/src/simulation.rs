//! Simulation driver.
//!
//! Detection, measurement and perturbation run strictly in sequence on one
//! dataset. Every snapshot detects from scratch and builds a fresh conflict
//! graph; nothing is carried over from the previous round.

use std::time::Instant;

use dcim_constraint::{bind_constraints, BoundConstraint, ViolationDetector};
use dcim_core::{parse_dataset, Dataset, TupleId};
use dcim_measure::MeasureComputer;
use dcim_mutation::{RandomNoise, ViolationInjector};
use dcim_parser::{parse_constraints, ConstraintSet};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{NoiseConfig, SimulationConfig, SimulationMode};
use crate::error::{SessionError, SessionResult};
use crate::report::ResultSink;
use crate::series::{MeasurementSeries, SeriesPoint};

/// One measurement run over one dataset.
pub struct Simulation {
    config: SimulationConfig,
    dataset: Dataset,
    constraints: Vec<BoundConstraint>,
    detector: ViolationDetector,
    computer: MeasureComputer,
    injector: ViolationInjector,
    rng: StdRng,
}

impl Simulation {
    /// Bind `constraints` to the dataset's schema. Constraints naming
    /// unknown attributes are dropped with a warning.
    pub fn new(dataset: Dataset, constraints: &ConstraintSet, config: SimulationConfig) -> SessionResult<Self> {
        config.validate()?;

        let bound = bind_constraints(constraints, dataset.schema());
        for error in &bound.errors {
            warn!(error = %error, "constraint dropped");
        }
        if bound.constraints.is_empty() {
            return Err(SessionError::NoConstraints);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            computer: config.build_computer(),
            injector: config.build_injector(),
            detector: ViolationDetector::new(),
            constraints: bound.constraints,
            dataset,
            config,
            rng,
        })
    }

    /// Load from dataset text and constraint text. Unparseable constraint
    /// lines are dropped with a warning.
    pub fn from_sources(dataset: &str, constraints: &str, config: SimulationConfig) -> SessionResult<Self> {
        let dataset = parse_dataset(dataset)?;
        let parsed = parse_constraints(constraints);
        for error in &parsed.errors.0 {
            warn!(error = %error, "constraint skipped");
        }
        if parsed.constraints.is_empty() && !parsed.errors.is_empty() {
            return Err(parsed.errors.into());
        }
        Self::new(dataset, &parsed.constraints, config)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn constraints(&self) -> &[BoundConstraint] {
        &self.constraints
    }

    /// Detect and measure the current dataset.
    pub fn measure(&self, step: usize) -> SessionResult<SeriesPoint> {
        let start = Instant::now();
        let detection = self.detector.detect(&self.dataset, &self.constraints);
        let detection_elapsed = start.elapsed();
        let measurements = self.computer.compute(&detection)?;
        debug!(step, violations = detection.len(), "snapshot measured");
        Ok(SeriesPoint {
            step,
            violations: detection.len(),
            detection_elapsed,
            measurements,
        })
    }

    /// Run the configured mode and, when a results directory is set, write
    /// the result files into a fresh subdirectory of it.
    pub fn run(&mut self) -> SessionResult<MeasurementSeries> {
        let start = Instant::now();
        let series = match self.config.mode.clone() {
            SimulationMode::Injection => self.run_injection()?,
            SimulationMode::RandomNoise(noise) => self.run_noise(&noise)?,
        };
        let total = start.elapsed();
        info!(
            snapshots = series.len(),
            failed_injections = series.failed_injections,
            total_ms = total.as_millis() as u64,
            "simulation finished"
        );

        if let Some(root) = &self.config.results_dir {
            ResultSink::timestamped(root).write(&series, &self.config.measures, total)?;
        }
        Ok(series)
    }

    fn run_injection(&mut self) -> SessionResult<MeasurementSeries> {
        if self.dataset.len() < 2 {
            return Err(SessionError::too_few_tuples(self.dataset.len()));
        }
        info!(
            tuples = self.dataset.len(),
            constraints = self.constraints.len(),
            iterations = self.config.iterations,
            "injection simulation started"
        );

        let mut series = MeasurementSeries::new();
        series.push(self.measure(0)?);

        for step in 1..=self.config.iterations {
            let constraint = &self.constraints[self.rng.gen_range(0..self.constraints.len())];
            let pair = index::sample(&mut self.rng, self.dataset.len(), 2);
            let (t1, t2) = (TupleId::new(pair.index(0)), TupleId::new(pair.index(1)));

            match self
                .injector
                .inject(&mut self.dataset, constraint, t1, t2, &mut self.rng)
            {
                Ok(_) => series.push(self.measure(step)?),
                Err(e) => {
                    warn!(step, constraint = %constraint.source, error = %e, "iteration skipped");
                    series.failed_injections += 1;
                }
            }
        }
        Ok(series)
    }

    fn run_noise(&mut self, params: &NoiseConfig) -> SessionResult<MeasurementSeries> {
        let columns = RandomNoise::columns_of(&self.constraints);
        let noise = RandomNoise::new(&self.dataset, columns, params.skew, params.typo_prob)?;
        let changes = RandomNoise::change_count(&self.dataset, params.error_rate);
        info!(
            tuples = self.dataset.len(),
            columns = noise.columns().count(),
            changes,
            "random-noise simulation started"
        );

        let mut series = MeasurementSeries::new();
        series.push(self.measure(0)?);

        for step in 1..=changes {
            noise.apply_one(&mut self.dataset, &mut self.rng)?;
            if step % params.measure_every == 0 {
                series.push(self.measure(step)?);
            }
        }
        Ok(series)
    }
}

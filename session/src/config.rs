//! Run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dcim_measure::{ExternalCliqueAnalyzer, MeasureComputer, MeasureSelection};
use dcim_mutation::{ViolationInjector, DEFAULT_ATTEMPTS};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// How the dataset is perturbed between measurements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationMode {
    /// One constraint-guided violation per iteration, then a measurement.
    #[default]
    Injection,
    /// Random cell rewrites in constraint columns.
    RandomNoise(NoiseConfig),
}

/// Parameters of a random-noise run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Fraction of all cells to rewrite over the run.
    pub error_rate: f64,
    /// Zipf exponent over each column's active domain.
    pub skew: f64,
    /// Probability that a rewrite is a typo rather than a domain value.
    pub typo_prob: f64,
    /// Measure after every this many rewrites.
    pub measure_every: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            error_rate: 0.01,
            skew: 0.0,
            typo_prob: 0.5,
            measure_every: 10,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> SessionResult<()> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(SessionError::config(format!("error_rate {} is outside [0, 1]", self.error_rate)));
        }
        if !(0.0..=1.0).contains(&self.typo_prob) {
            return Err(SessionError::config(format!("typo_prob {} is outside [0, 1]", self.typo_prob)));
        }
        if !self.skew.is_finite() || self.skew < 0.0 {
            return Err(SessionError::config(format!(
                "skew {} must be a finite non-negative number",
                self.skew
            )));
        }
        if self.measure_every == 0 {
            return Err(SessionError::config("measure_every must be at least 1"));
        }
        Ok(())
    }
}

/// Which maximal-clique analyzer computes I_MC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyzerConfig {
    #[default]
    InProcess,
    External {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// Configuration for a measurement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Injection iterations (injection mode only).
    pub iterations: usize,
    pub measures: MeasureSelection,
    /// RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub mode: SimulationMode,
    /// Limit for each of I_R and I_lin_R, in milliseconds.
    pub solver_timeout_ms: Option<u64>,
    pub analyzer: AnalyzerConfig,
    /// Limit for I_MC, in milliseconds.
    pub analyzer_timeout_ms: Option<u64>,
    /// Passes the injector makes before reporting failure.
    pub injection_attempts: usize,
    /// Where result files go; nothing is written when absent.
    pub results_dir: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            measures: MeasureSelection::default(),
            seed: None,
            mode: SimulationMode::Injection,
            solver_timeout_ms: None,
            analyzer: AnalyzerConfig::InProcess,
            analyzer_timeout_ms: None,
            injection_attempts: DEFAULT_ATTEMPTS,
            results_dir: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_measures(mut self, measures: MeasureSelection) -> Self {
        self.measures = measures;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_solver_timeout(mut self, timeout: Duration) -> Self {
        self.solver_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_analyzer_timeout(mut self, timeout: Duration) -> Self {
        self.analyzer_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_injection_attempts(mut self, attempts: usize) -> Self {
        self.injection_attempts = attempts;
        self
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = Some(dir.into());
        self
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(text: &str) -> SessionResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SessionResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.injection_attempts == 0 {
            return Err(SessionError::config("injection_attempts must be at least 1"));
        }
        match &self.mode {
            SimulationMode::Injection => Ok(()),
            SimulationMode::RandomNoise(noise) => noise.validate(),
        }
    }

    pub fn solver_timeout(&self) -> Option<Duration> {
        self.solver_timeout_ms.map(Duration::from_millis)
    }

    pub fn analyzer_timeout(&self) -> Option<Duration> {
        self.analyzer_timeout_ms.map(Duration::from_millis)
    }

    /// A measure computer wired to the configured analyzer and timeouts.
    pub fn build_computer(&self) -> MeasureComputer {
        let computer = MeasureComputer::new(self.measures)
            .with_solver_timeout(self.solver_timeout())
            .with_analyzer_timeout(self.analyzer_timeout());
        match &self.analyzer {
            AnalyzerConfig::InProcess => computer,
            AnalyzerConfig::External { program, args } => {
                computer.with_analyzer(Box::new(ExternalCliqueAnalyzer::new(program).with_args(args.iter().cloned())))
            }
        }
    }

    pub fn build_injector(&self) -> ViolationInjector {
        ViolationInjector::new().with_attempts(self.injection_attempts)
    }
}

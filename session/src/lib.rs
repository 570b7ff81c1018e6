//! DCIM Session
//!
//! Drives measurement runs over one dataset.
//!
//! Responsibilities:
//! - Load a dataset and a constraint file into a ready-to-measure run
//! - Alternate detection, measurement and perturbation (guided injection
//!   or random noise)
//! - Collect the measurement series and write the result files
//!
//! # Module Structure
//!
//! - `simulation` - the driver
//! - `config` - run configuration (JSON, builder methods)
//! - `series` - snapshots collected over a run
//! - `report` - `Running_Time.txt`, `All_results.txt` and the JSON dump
//! - `error` - error types

mod config;
mod error;
mod report;
mod series;
mod simulation;

pub use config::{AnalyzerConfig, NoiseConfig, SimulationConfig, SimulationMode};
pub use error::{SessionError, SessionResult};
pub use report::{
    format_all_results, format_running_times, ResultSink, ALL_RESULTS_FILE, RUNNING_TIME_FILE, SERIES_FILE,
};
pub use series::{MeasurementSeries, SeriesPoint};
pub use simulation::Simulation;

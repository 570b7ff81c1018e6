//! Result files.
//!
//! A run appends to two text files in its results directory and writes the
//! full series as JSON:
//!
//! - `Running_Time.txt`: `AVG for <measure>: <seconds>` per measure, then
//!   `total time <seconds>` and a `---` separator
//! - `All_results.txt`: `<measure> results: [v0, v1, ...]` per measure, then
//!   a `---` separator
//! - `series.json`: the [`MeasurementSeries`]

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use dcim_measure::MeasureSelection;
use tracing::info;

use crate::error::SessionResult;
use crate::series::MeasurementSeries;

pub const RUNNING_TIME_FILE: &str = "Running_Time.txt";
pub const ALL_RESULTS_FILE: &str = "All_results.txt";
pub const SERIES_FILE: &str = "series.json";

const SEPARATOR: &str = "---";

/// Writes result files into one directory.
#[derive(Debug, Clone)]
pub struct ResultSink {
    dir: PathBuf,
}

impl ResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A fresh `<unix-millis>_results` directory under `root`.
    pub fn timestamped(root: &Path) -> Self {
        Self::new(root.join(format!("{}_results", Utc::now().timestamp_millis())))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, series: &MeasurementSeries, selection: &MeasureSelection, total: Duration) -> SessionResult<()> {
        fs::create_dir_all(&self.dir)?;
        append(&self.dir.join(RUNNING_TIME_FILE), &format_running_times(series, selection, total))?;
        append(&self.dir.join(ALL_RESULTS_FILE), &format_all_results(series, selection))?;
        fs::write(self.dir.join(SERIES_FILE), serde_json::to_string_pretty(series)?)?;
        info!(dir = %self.dir.display(), "results written");
        Ok(())
    }
}

fn append(path: &Path, text: &str) -> SessionResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

pub fn format_running_times(series: &MeasurementSeries, selection: &MeasureSelection, total: Duration) -> String {
    let mut out = String::new();
    for measure in selection.enabled() {
        if let Some(average) = series.average_cost(measure) {
            out.push_str(&format!("AVG for {}: {}\n", measure, average.as_secs_f64()));
        }
    }
    out.push_str(&format!("total time {}\n{}\n", total.as_secs_f64(), SEPARATOR));
    out
}

pub fn format_all_results(series: &MeasurementSeries, selection: &MeasureSelection) -> String {
    let mut out = String::new();
    for measure in selection.enabled() {
        let values: Vec<String> = series.values(measure).iter().map(ToString::to_string).collect();
        out.push_str(&format!("{} results: [{}]\n", measure, values.join(", ")));
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

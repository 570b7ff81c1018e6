//! Measurement series collected over a run.

use std::time::Duration;

use dcim_measure::{Measure, MeasureValue, Measurements};
use serde::{Deserialize, Serialize};

/// One measurement snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Number of dataset changes applied before this snapshot (0 = input).
    pub step: usize,
    /// Distinct violating pairs found by detection.
    pub violations: usize,
    pub detection_elapsed: Duration,
    pub measurements: Measurements,
}

impl SeriesPoint {
    /// Wall-clock cost attributed to one measure: its own computation plus
    /// detection, plus graph construction for graph measures.
    pub fn cost(&self, measure: Measure) -> Option<Duration> {
        let measurement = self.measurements.get(measure)?;
        let mut total = measurement.elapsed + self.detection_elapsed;
        if measure.needs_graph() {
            total += self.measurements.graph_elapsed;
        }
        Some(total)
    }
}

/// Snapshots in step order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSeries {
    points: Vec<SeriesPoint>,
    /// Iterations skipped because an injection failed.
    pub failed_injections: usize,
}

impl MeasurementSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn steps(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.step).collect()
    }

    /// Values of one measure across the series, skipping snapshots where it
    /// was not computed.
    pub fn values(&self, measure: Measure) -> Vec<MeasureValue> {
        self.points
            .iter()
            .filter_map(|p| p.measurements.value(measure))
            .collect()
    }

    /// Mean cost of a measure over the snapshots that computed it.
    pub fn average_cost(&self, measure: Measure) -> Option<Duration> {
        let costs: Vec<Duration> = self.points.iter().filter_map(|p| p.cost(measure)).collect();
        if costs.is_empty() {
            return None;
        }
        Some(costs.iter().sum::<Duration>() / costs.len() as u32)
    }
}

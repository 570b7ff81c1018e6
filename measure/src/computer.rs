//! The measure computer.

use std::time::{Duration, Instant};

use dcim_constraint::Detection;
use dcim_graph::{ConflictGraph, ConflictGraphBuilder};
use tracing::{debug, error};

use crate::analyzer::{BronKerboschAnalyzer, GraphAnalyzer};
use crate::cover::{CombinatorialCoverSolver, CoverSolver};
use crate::deadline::Deadline;
use crate::error::{MeasureError, MeasureResult};
use crate::measure::{Measure, MeasureSelection, MeasureValue, Measurement, Measurements};

/// Computes the enabled measures for one detection pass.
pub struct MeasureComputer {
    selection: MeasureSelection,
    solver: Box<dyn CoverSolver>,
    analyzer: Box<dyn GraphAnalyzer>,
    solver_timeout: Option<Duration>,
    analyzer_timeout: Option<Duration>,
}

impl Default for MeasureComputer {
    fn default() -> Self {
        Self::new(MeasureSelection::default())
    }
}

impl MeasureComputer {
    /// A computer with the combinatorial cover solver and the in-process
    /// Bron–Kerbosch analyzer.
    pub fn new(selection: MeasureSelection) -> Self {
        Self {
            selection,
            solver: Box::new(CombinatorialCoverSolver::new()),
            analyzer: Box::new(BronKerboschAnalyzer::new()),
            solver_timeout: None,
            analyzer_timeout: None,
        }
    }

    pub fn with_solver(mut self, solver: Box<dyn CoverSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_analyzer(mut self, analyzer: Box<dyn GraphAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Wall-clock limit for each of I_R and I_lin_R.
    pub fn with_solver_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.solver_timeout = timeout;
        self
    }

    /// Wall-clock limit for I_MC.
    pub fn with_analyzer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.analyzer_timeout = timeout;
        self
    }

    pub fn selection(&self) -> &MeasureSelection {
        &self.selection
    }

    /// Compute every enabled measure on one detection result.
    pub fn compute(&self, detection: &Detection) -> MeasureResult<Measurements> {
        let mut measurements = Measurements::new();

        let graph = if self.selection.needs_graph() {
            let start = Instant::now();
            let graph = ConflictGraphBuilder::new().build(detection)?;
            measurements.graph_elapsed = start.elapsed();
            Some(graph)
        } else {
            None
        };

        for measure in self.selection.enabled() {
            let start = Instant::now();
            let value = self.compute_one(measure, detection, graph.as_ref())?;
            let elapsed = start.elapsed();
            debug!(measure = %measure, value = %value, elapsed_ms = elapsed.as_millis() as u64, "measure computed");
            measurements.push(Measurement {
                measure,
                value,
                elapsed,
            });
        }
        Ok(measurements)
    }

    fn compute_one(
        &self,
        measure: Measure,
        detection: &Detection,
        graph: Option<&ConflictGraph>,
    ) -> MeasureResult<MeasureValue> {
        let value = match measure {
            Measure::Drastic => MeasureValue::Count(u64::from(!detection.is_empty())),
            Measure::MinimalInconsistent => MeasureValue::Count(detection.len() as u64),
            Measure::Problematic => MeasureValue::Count(detection.participating().len() as u64),
            Measure::Repair => {
                let graph = require_graph(graph, measure)?;
                if graph.is_conflict_free() {
                    return Ok(MeasureValue::Count(0));
                }
                let deadline = Deadline::from_timeout(self.solver_timeout);
                let cover = self.solver.solve_integer(graph, &deadline).inspect_err(log_failure(measure))?;
                MeasureValue::Count(cover.size() as u64)
            }
            Measure::LinearRepair => {
                let graph = require_graph(graph, measure)?;
                if graph.is_conflict_free() {
                    return Ok(MeasureValue::Real(0.0));
                }
                let deadline = Deadline::from_timeout(self.solver_timeout);
                let cover = self.solver.solve_relaxed(graph, &deadline).inspect_err(log_failure(measure))?;
                MeasureValue::Real(cover.value)
            }
            Measure::MaximalConsistent => {
                let graph = require_graph(graph, measure)?;
                let deadline = Deadline::from_timeout(self.analyzer_timeout);
                let count = self
                    .analyzer
                    .count_maximal_independent_sets(graph, &deadline)
                    .inspect_err(log_failure(measure))?;
                MeasureValue::Count(count)
            }
        };
        Ok(value)
    }
}

fn require_graph(graph: Option<&ConflictGraph>, measure: Measure) -> MeasureResult<&ConflictGraph> {
    graph.ok_or_else(|| MeasureError::solver(format!("{} needs the conflict graph", measure)))
}

fn log_failure(measure: Measure) -> impl Fn(&MeasureError) {
    move |e| error!(measure = %measure, error = %e, "measure computation failed")
}

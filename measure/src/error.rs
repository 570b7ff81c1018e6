//! Measure error types.

use dcim_graph::GraphError;
use std::time::Duration;
use thiserror::Error;

/// Result type for measure operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors that can occur while computing measures.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// The cover model is always feasible, so this signals a solver bug.
    #[error("Solver error: {message}")]
    Solver { message: String },

    #[error("Analyzer contract error: {message}")]
    AnalyzerContract { message: String },

    #[error("{operation} timed out after {limit:?}")]
    Timeout { operation: String, limit: Duration },

    #[error("Count overflow in {what}")]
    Overflow { what: String },

    #[error("Unknown measure: {name}")]
    UnknownMeasure { name: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeasureError {
    pub fn solver(message: impl Into<String>) -> Self {
        Self::Solver {
            message: message.into(),
        }
    }

    pub fn analyzer_contract(message: impl Into<String>) -> Self {
        Self::AnalyzerContract {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, limit: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            limit,
        }
    }

    pub fn overflow(what: impl Into<String>) -> Self {
        Self::Overflow { what: what.into() }
    }

    pub fn unknown_measure(name: impl Into<String>) -> Self {
        Self::UnknownMeasure { name: name.into() }
    }
}

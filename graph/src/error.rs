//! Graph error types.

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or exporting graphs.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node {node} out of range for a graph of {count} nodes")]
    NodeOutOfRange { node: usize, count: usize },

    #[error("Failed to write handoff file: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn node_out_of_range(node: usize, count: usize) -> Self {
        Self::NodeOutOfRange { node, count }
    }
}

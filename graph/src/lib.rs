//! DCIM Graph
//!
//! Conflict graphs derived from a detection pass.
//!
//! Responsibilities:
//! - Build the undirected conflict graph (nodes = all tuples, edges =
//!   violating pairs between distinct tuples)
//! - Track self-conflicting tuples separately from the edge set
//! - Build the complement graph with per-node degrees
//! - Write the complement graph in the analyzer handoff format
//! - Provide word-packed node sets for the solvers

mod complement;
mod error;
mod graph;
mod handoff;
mod nodeset;

pub use complement::ComplementGraph;
pub use error::{GraphError, GraphResult};
pub use graph::{ConflictGraph, ConflictGraphBuilder};
pub use handoff::{write_handoff, write_handoff_file};
pub use nodeset::NodeSet;

//! DCIM Measure
//!
//! Inconsistency measures over a detection pass.
//!
//! Responsibilities:
//! - I_D, I_MI and I_P straight from the violating-pair set
//! - I_R and I_lin_R through a pluggable vertex-cover solver
//! - I_MC through a pluggable maximal-independent-set counter, in process or
//!   as an external program fed a handoff file
//! - Per-measure timing and optional time limits

mod analyzer;
mod computer;
mod cover;
mod deadline;
mod error;
mod external;
mod matching;
mod measure;

pub use analyzer::{BronKerboschAnalyzer, GraphAnalyzer};
pub use computer::MeasureComputer;
pub use cover::{CombinatorialCoverSolver, CoverSolver, IntegerCover, RelaxedCover};
pub use deadline::Deadline;
pub use error::{MeasureError, MeasureResult};
pub use external::{parse_clique_count, ExternalCliqueAnalyzer};
pub use measure::{Measure, MeasureSelection, MeasureValue, Measurement, Measurements};

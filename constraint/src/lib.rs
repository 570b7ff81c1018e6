//! DCIM Constraint
//!
//! Evaluate denial constraints against a dataset.
//!
//! Responsibilities:
//! - Bind parsed constraints to the dataset schema (unknown attributes are
//!   reported per constraint)
//! - Evaluate predicate conjunctions on tuple assignments, ignoring nulls
//! - Detect every violating tuple pair, canonicalized and deduplicated
//! - Report the set of tuples that participate in some violation

mod bound;
mod detector;
mod error;
mod violation;

pub use bound::{bind_constraints, BoundConstraint, BoundConstraints, BoundOperand, BoundPredicate};
pub use detector::ViolationDetector;
pub use error::{ConstraintError, ConstraintResult};
pub use violation::{Detection, ViolatingPair};

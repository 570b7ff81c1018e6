//! DCIM Integration Test Framework
//!
//! Provides a fluent API for writing end-to-end tests against DCIM, plus
//! proptest strategies for property tests over random datasets, constraints
//! and conflict graphs.
//!
//! A scenario loads a dataset and a constraint file, then runs a sequence of
//! steps. Each step may rewrite cells before it detects violations, computes
//! the selected measures and checks its assertion.
//!
//! # Example
//!
//! ```ignore
//! use dcim_tests::prelude::*;
//!
//! pub fn scenario() -> Scenario {
//!     Scenario::new("zip_city")
//!         .dataset("A,B\n1,1\n1,2\n2,5\n")
//!         .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
//!         .step("input", |a| a.violations(1).count(Measure::Repair, 1))
//!         .edit("fix", 1, "B", 1i64, |a| a.consistent())
//! }
//!
//! #[test]
//! fn test() {
//!     scenario().run().unwrap();
//! }
//! ```

mod assertion;
mod error;
mod scenario;

pub mod generators;

pub use assertion::{Assertion, AssertionBuilder};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::Scenario;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::scenario::Scenario;
    pub use dcim_core::Value;
    pub use dcim_measure::{Measure, MeasureSelection, MeasureValue};
}

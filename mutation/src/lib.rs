//! DCIM Mutation
//!
//! Write operations that perturb a dataset in place.
//!
//! Responsibilities:
//! - Force a chosen tuple pair to violate a chosen constraint
//! - Synthesize type-aware replacement values
//! - Apply Zipf-weighted random noise to constraint columns
//! - Roll back touched rows when an injection cannot be completed
//!
//! # Module Structure
//!
//! - `injector` - ViolationInjector, which walks a constraint's predicates
//! - `ops/` - per-operator rewrites (equality family, disequality, ordering)
//! - `perturb` - type-aware value synthesis
//! - `noise` - random-noise mutator
//! - `error` - error types for injection failures
//! - `result` - cell changes and injection outcomes

mod error;
mod injector;
mod noise;
mod ops;
mod perturb;
mod result;

pub use error::{InjectionError, InjectionResult};
pub use injector::{ViolationInjector, DEFAULT_ATTEMPTS};
pub use noise::{zipf_weights, RandomNoise};
pub use perturb::{perturb, step_beyond, Direction, MIN_YEAR};
pub use result::{CellChange, InjectionOutcome};

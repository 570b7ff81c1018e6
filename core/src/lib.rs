//! DCIM Core Types
//!
//! This crate provides the foundational types used throughout DCIM:
//! - Identity types (TupleId, AttrId)
//! - Value types (the Value enum with string, integer, float and date scalars)
//! - Schema and Dataset structures (typed rows with O(1) attribute access)
//! - The delimited-text dataset loader
//! - Common error types

mod dataset;
mod error;
mod id;
mod loader;
mod schema;
mod value;

pub use dataset::*;
pub use error::*;
pub use id::*;
pub use loader::*;
pub use schema::*;
pub use value::*;

//! DCIM Parser
//!
//! This crate parses denial-constraint text:
//! - Lexing of `not(...)`, tuple-qualified attributes, comparison operators
//! - Predicate-list construction with single/two-tuple classification
//! - Batch parsing that collects every error instead of stopping at the first

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::*;
pub use parser::{parse_constraint, parse_constraints, ParsedConstraints, Parser};

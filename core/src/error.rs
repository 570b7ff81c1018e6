//! Common error types for DCIM.

use crate::{AttrId, TupleId};
use thiserror::Error;

/// Errors that can occur while building or accessing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Tuple not found.
    #[error("Tuple not found: {0}")]
    TupleNotFound(TupleId),

    /// Attribute id outside the schema.
    #[error("Attribute not found: {0}")]
    AttrNotFound(AttrId),

    /// Attribute name not in the schema.
    #[error("Unknown attribute: {name}")]
    UnknownAttribute { name: String },

    /// Two columns canonicalize to the same name.
    #[error("Duplicate attribute: {name}")]
    DuplicateAttribute { name: String },

    /// A row does not match the schema width.
    #[error("Arity mismatch: expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Malformed dataset text.
    #[error("Load error at line {line}: {message}")]
    Load { line: usize, message: String },
}

impl DatasetError {
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }

    pub fn duplicate_attribute(name: impl Into<String>) -> Self {
        Self::DuplicateAttribute { name: name.into() }
    }

    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    pub fn load(line: usize, message: impl Into<String>) -> Self {
        Self::Load {
            line,
            message: message.into(),
        }
    }
}

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

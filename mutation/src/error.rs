//! Injection error types.

use dcim_core::{DatasetError, TupleId};
use thiserror::Error;

/// Result type for injection operations.
pub type InjectionResult<T> = Result<T, InjectionError>;

/// Errors that abort one injection. The dataset is left as it was before
/// the injection started.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("Constraint {constraint} needs two distinct tuples, got {tuple} twice")]
    SameTuple { constraint: String, tuple: TupleId },

    #[error("No value for {attr}: {reason}")]
    NoCandidate { attr: String, reason: String },

    #[error("Cannot synthesize a {type_name} value for {attr}")]
    Unsupported { attr: String, type_name: String },

    #[error("Constraint {constraint} still holds on ({t1}, {t2}) after {attempts} attempt(s)")]
    Postcondition {
        constraint: String,
        t1: TupleId,
        t2: TupleId,
        attempts: usize,
    },

    #[error("Cannot write a {found} value into {expected} column {attr}")]
    TypeMismatch {
        attr: String,
        expected: String,
        found: String,
    },

    #[error("No non-null cell in the constraint columns")]
    NoCells,

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

impl InjectionError {
    pub fn same_tuple(constraint: impl Into<String>, tuple: TupleId) -> Self {
        Self::SameTuple {
            constraint: constraint.into(),
            tuple,
        }
    }

    pub fn no_candidate(attr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoCandidate {
            attr: attr.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(attr: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            attr: attr.into(),
            type_name: type_name.into(),
        }
    }

    pub fn type_mismatch(attr: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            attr: attr.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn postcondition(constraint: impl Into<String>, t1: TupleId, t2: TupleId, attempts: usize) -> Self {
        Self::Postcondition {
            constraint: constraint.into(),
            t1,
            t2,
            attempts,
        }
    }
}

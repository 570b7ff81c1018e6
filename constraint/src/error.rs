//! Constraint error types.

use thiserror::Error;

/// Result type for constraint operations.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors that can occur while binding constraints to a dataset.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// A predicate names an attribute the dataset does not have.
    #[error("Schema error in constraint at line {line}: unknown attribute '{attr}'")]
    Schema { line: usize, attr: String },
}

impl ConstraintError {
    pub fn schema(line: usize, attr: impl Into<String>) -> Self {
        Self::Schema {
            line,
            attr: attr.into(),
        }
    }
}

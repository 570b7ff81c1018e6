//! Session error types.

use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Dataset loading or cell access failed.
    #[error("dataset error: {0}")]
    Dataset(#[from] dcim_core::DatasetError),

    /// Every constraint failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] dcim_parser::ParseErrors),

    #[error("measure error: {0}")]
    Measure(#[from] dcim_measure::MeasureError),

    #[error("injection error: {0}")]
    Injection(#[from] dcim_mutation::InjectionError),

    /// Invalid run configuration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// No constraint survived parsing and schema binding.
    #[error("no usable constraints")]
    NoConstraints,

    #[error("dataset has {count} tuple(s), injection needs at least two")]
    TooFewTuples { count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn too_few_tuples(count: usize) -> Self {
        Self::TooFewTuples { count }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

//! Error types for the scenario framework.

use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur when running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario never set a dataset.
    #[error("dataset not specified for scenario '{scenario}'")]
    MissingDataset { scenario: String },

    /// Failed to load the dataset text.
    #[error("failed to load dataset: {0}")]
    Dataset(#[from] dcim_core::DatasetError),

    /// Failed to parse the constraint text.
    #[error("failed to parse constraints: {0}")]
    Parse(#[from] dcim_parser::ParseErrors),

    /// A constraint names an attribute the dataset lacks.
    #[error("failed to bind constraints: {message}")]
    Binding { message: String },

    /// An edit step names an attribute the dataset lacks.
    #[error("step '{step}' edits unknown attribute '{attr}'")]
    UnknownAttribute { step: String, attr: String },

    /// Measure computation failed.
    #[error("step '{step}' failed: {message}")]
    StepExecution { step: String, message: String },

    /// Assertion failed.
    #[error("assertion failed for step '{step}': {message}")]
    AssertionFailed { step: String, message: String },
}

impl ScenarioError {
    pub fn missing_dataset(scenario: impl Into<String>) -> Self {
        Self::MissingDataset {
            scenario: scenario.into(),
        }
    }

    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding {
            message: message.into(),
        }
    }

    pub fn unknown_attribute(step: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            step: step.into(),
            attr: attr.into(),
        }
    }

    pub fn step_execution(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StepExecution {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}

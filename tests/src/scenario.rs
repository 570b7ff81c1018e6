//! Scenario definition and builder.

use dcim_constraint::{bind_constraints, ViolationDetector};
use dcim_core::{parse_dataset, TupleId, Value};
use dcim_measure::{MeasureComputer, MeasureSelection};
use dcim_parser::parse_constraints;

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::{ScenarioError, ScenarioResult};

/// One cell rewrite applied before a step is measured.
#[derive(Debug, Clone)]
pub struct Edit {
    pub tuple: usize,
    pub attr: String,
    pub value: Value,
}

/// A step in a scenario with its assertion.
#[derive(Debug)]
pub struct Step {
    /// Step name (for reporting).
    pub name: String,
    /// Cell rewrites applied before the step is measured.
    pub edits: Vec<Edit>,
    /// Assertion to verify the result.
    pub assertion: Assertion,
}

/// A complete test scenario.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    /// Dataset text, header first.
    dataset: Option<String>,
    /// Constraint file text.
    constraints: String,
    /// Measures computed at every step.
    measures: MeasureSelection,
    /// Detect through the equality index or the full pairwise join.
    use_index: bool,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a new scenario with the given name. Every measure is computed
    /// by default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dataset: None,
            constraints: String::new(),
            measures: MeasureSelection::all(),
            use_index: true,
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the dataset text.
    pub fn dataset(mut self, source: impl Into<String>) -> Self {
        self.dataset = Some(source.into());
        self
    }

    /// Set the constraint file text.
    pub fn constraints(mut self, source: impl Into<String>) -> Self {
        self.constraints = source.into();
        self
    }

    /// Restrict the measures computed at every step.
    pub fn measures(mut self, measures: MeasureSelection) -> Self {
        self.measures = measures;
        self
    }

    /// Detect with the full pairwise join only.
    pub fn without_index(mut self) -> Self {
        self.use_index = false;
        self
    }

    /// Add a step that measures the dataset as it stands.
    pub fn step<F>(mut self, name: impl Into<String>, assertion_fn: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.into(),
            edits: Vec::new(),
            assertion: assertion_fn(AssertionBuilder::new()).build(),
        });
        self
    }

    /// Add a step that rewrites one cell, then measures.
    pub fn edit<F>(
        mut self,
        name: impl Into<String>,
        tuple: usize,
        attr: impl Into<String>,
        value: impl Into<Value>,
        assertion_fn: F,
    ) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.into(),
            edits: vec![Edit {
                tuple,
                attr: attr.into(),
                value: value.into(),
            }],
            assertion: assertion_fn(AssertionBuilder::new()).build(),
        });
        self
    }

    /// Run the scenario and return the first failure.
    pub fn run(&self) -> ScenarioResult<()> {
        let source = self
            .dataset
            .as_deref()
            .ok_or_else(|| ScenarioError::missing_dataset(&self.name))?;
        let mut dataset = parse_dataset(source)?;

        let set = parse_constraints(&self.constraints).into_result()?;
        let bound = bind_constraints(&set, dataset.schema());
        if let Some(error) = bound.errors.first() {
            return Err(ScenarioError::binding(error.to_string()));
        }

        let detector = if self.use_index {
            ViolationDetector::new()
        } else {
            ViolationDetector::new().without_index()
        };
        let computer = MeasureComputer::new(self.measures);

        for step in &self.steps {
            for edit in &step.edits {
                let attr = dataset
                    .schema()
                    .attr_id(&edit.attr)
                    .ok_or_else(|| ScenarioError::unknown_attribute(&step.name, &edit.attr))?;
                dataset
                    .set_value(TupleId::new(edit.tuple), attr, edit.value.clone())
                    .map_err(|e| ScenarioError::step_execution(&step.name, e.to_string()))?;
            }

            let detection = detector.detect(&dataset, &bound.constraints);
            let measurements = computer
                .compute(&detection)
                .map_err(|e| ScenarioError::step_execution(&step.name, e.to_string()))?;

            if let Some(missing) = step.assertion.measures().find(|m| !self.measures.is_enabled(*m)) {
                return Err(ScenarioError::assertion_failed(
                    &step.name,
                    format!("{} is asserted but not selected", missing),
                ));
            }
            step.assertion.check(&step.name, &detection, &measurements)?;
        }
        Ok(())
    }
}

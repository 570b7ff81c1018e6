//! Assertion types and builders for verifying step results.

use dcim_constraint::{Detection, ViolatingPair};
use dcim_core::TupleId;
use dcim_measure::{Measure, MeasureValue, Measurements};

use crate::error::{ScenarioError, ScenarioResult};

/// Allowed distance between an expected and an actual real-valued measure.
pub const REAL_TOLERANCE: f64 = 1e-9;

/// A complete assertion for one step.
#[derive(Default)]
pub struct Assertion {
    // Detection assertions
    pub violations: Option<usize>,
    pub pairs: Option<Vec<ViolatingPair>>,
    pub participating: Option<usize>,

    // Measure assertions
    pub counts: Vec<(Measure, u64)>,
    pub reals: Vec<(Measure, f64)>,

    // Custom assertion function
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&Detection, &Measurements) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("violations", &self.violations)
            .field("pairs", &self.pairs)
            .field("participating", &self.participating)
            .field("counts", &self.counts)
            .field("reals", &self.reals)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Assertion {
    /// Measures this assertion reads.
    pub fn measures(&self) -> impl Iterator<Item = Measure> + '_ {
        self.counts
            .iter()
            .map(|(m, _)| *m)
            .chain(self.reals.iter().map(|(m, _)| *m))
    }

    /// Verify a step's detection and measurements.
    pub fn check(&self, step: &str, detection: &Detection, measurements: &Measurements) -> ScenarioResult<()> {
        let fail = |message: String| Err(ScenarioError::assertion_failed(step, message));

        if let Some(expected) = self.violations {
            if detection.len() != expected {
                return fail(format!("expected {} violating pairs, got {}", expected, detection.len()));
            }
        }

        if let Some(expected) = &self.pairs {
            let actual: Vec<ViolatingPair> = detection.iter().copied().collect();
            if &actual != expected {
                return fail(format!("expected pairs {:?}, got {:?}", expected, actual));
            }
        }

        if let Some(expected) = self.participating {
            let actual = detection.participating().len();
            if actual != expected {
                return fail(format!("expected {} participating tuples, got {}", expected, actual));
            }
        }

        for &(measure, expected) in &self.counts {
            match measurements.value(measure) {
                Some(MeasureValue::Count(actual)) if actual == expected => {}
                Some(actual) => return fail(format!("expected {} = {}, got {}", measure, expected, actual)),
                None => return fail(format!("{} was not computed", measure)),
            }
        }

        for &(measure, expected) in &self.reals {
            match measurements.value(measure) {
                Some(actual) if (actual.as_f64() - expected).abs() <= REAL_TOLERANCE => {}
                Some(actual) => return fail(format!("expected {} = {}, got {}", measure, expected, actual)),
                None => return fail(format!("{} was not computed", measure)),
            }
        }

        if let Some(custom) = &self.custom {
            if !custom(detection, measurements) {
                return fail("custom assertion returned false".to_string());
            }
        }

        Ok(())
    }
}

/// Builder for creating assertions.
#[derive(Default)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert the number of distinct violating pairs.
    pub fn violations(mut self, n: usize) -> Self {
        self.assertion.violations = Some(n);
        self
    }

    /// Assert the exact violating pairs, given by tuple index in either order.
    pub fn pairs(mut self, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut pairs: Vec<ViolatingPair> = pairs
            .into_iter()
            .map(|(a, b)| ViolatingPair::new(TupleId::new(a), TupleId::new(b)))
            .collect();
        pairs.sort();
        pairs.dedup();
        self.assertion.pairs = Some(pairs);
        self
    }

    /// Assert the number of tuples in some violating pair.
    pub fn participating(mut self, n: usize) -> Self {
        self.assertion.participating = Some(n);
        self
    }

    /// Assert an exact count-valued measure.
    pub fn count(mut self, measure: Measure, value: u64) -> Self {
        self.assertion.counts.push((measure, value));
        self
    }

    /// Assert a real-valued measure within [`REAL_TOLERANCE`].
    pub fn real(mut self, measure: Measure, value: f64) -> Self {
        self.assertion.reals.push((measure, value));
        self
    }

    /// Assert no violations and every measure at its consistent value.
    pub fn consistent(self) -> Self {
        self.violations(0)
            .count(Measure::Drastic, 0)
            .count(Measure::MinimalInconsistent, 0)
            .count(Measure::Problematic, 0)
            .count(Measure::Repair, 0)
            .real(Measure::LinearRepair, 0.0)
            .count(Measure::MaximalConsistent, 1)
    }

    /// Custom assertion function.
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&Detection, &Measurements) -> bool + Send + Sync + 'static,
    {
        self.assertion.custom = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }
}

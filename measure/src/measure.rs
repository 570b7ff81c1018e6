//! Measure names, values and selections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::MeasureError;

/// The six inconsistency measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Measure {
    /// 1 if any violation exists, else 0.
    #[serde(rename = "I_D")]
    Drastic,
    /// Number of violating pairs.
    #[serde(rename = "I_MI")]
    MinimalInconsistent,
    /// Number of tuples in some violating pair.
    #[serde(rename = "I_P")]
    Problematic,
    /// Minimum vertex cover of the conflict graph.
    #[serde(rename = "I_R")]
    Repair,
    /// LP relaxation of the minimum vertex cover.
    #[serde(rename = "I_lin_R")]
    LinearRepair,
    /// Number of maximal consistent subsets (repairs).
    #[serde(rename = "I_MC")]
    MaximalConsistent,
}

impl Measure {
    pub const ALL: [Measure; 6] = [
        Measure::Drastic,
        Measure::MinimalInconsistent,
        Measure::Problematic,
        Measure::Repair,
        Measure::LinearRepair,
        Measure::MaximalConsistent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Drastic => "I_D",
            Measure::MinimalInconsistent => "I_MI",
            Measure::Problematic => "I_P",
            Measure::Repair => "I_R",
            Measure::LinearRepair => "I_lin_R",
            Measure::MaximalConsistent => "I_MC",
        }
    }

    /// Whether the measure needs the conflict graph.
    pub fn needs_graph(&self) -> bool {
        matches!(
            self,
            Measure::Repair | Measure::LinearRepair | Measure::MaximalConsistent
        )
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MeasureError::unknown_measure(s))
    }
}

/// A measure's value: an exact count or a real number (I_lin_R).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Count(u64),
    Real(f64),
}

impl MeasureValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            MeasureValue::Count(c) => *c as f64,
            MeasureValue::Real(r) => *r,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            MeasureValue::Count(c) => Some(*c),
            MeasureValue::Real(_) => None,
        }
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Count(c) => write!(f, "{}", c),
            MeasureValue::Real(r) => write!(f, "{}", r),
        }
    }
}

/// One measure's value on one snapshot, with the time it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measure: Measure,
    pub value: MeasureValue,
    pub elapsed: Duration,
}

/// Every enabled measure for one snapshot, in [`Measure::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    values: Vec<Measurement>,
    /// Time spent building the conflict graph, if any measure needed it.
    pub graph_elapsed: Duration,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.values.push(measurement);
    }

    pub fn get(&self, measure: Measure) -> Option<&Measurement> {
        self.values.iter().find(|m| m.measure == measure)
    }

    pub fn value(&self, measure: Measure) -> Option<MeasureValue> {
        self.get(measure).map(|m| m.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Measurements {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Which measures to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureSelection {
    #[serde(rename = "I_D")]
    pub drastic: bool,
    #[serde(rename = "I_MI")]
    pub minimal_inconsistent: bool,
    #[serde(rename = "I_P")]
    pub problematic: bool,
    #[serde(rename = "I_R")]
    pub repair: bool,
    #[serde(rename = "I_lin_R")]
    pub linear_repair: bool,
    #[serde(rename = "I_MC")]
    pub maximal_consistent: bool,
}

impl Default for MeasureSelection {
    /// Everything except I_MC, whose count can grow exponentially.
    fn default() -> Self {
        Self {
            maximal_consistent: false,
            ..Self::all()
        }
    }
}

impl MeasureSelection {
    pub fn all() -> Self {
        Self {
            drastic: true,
            minimal_inconsistent: true,
            problematic: true,
            repair: true,
            linear_repair: true,
            maximal_consistent: true,
        }
    }

    pub fn none() -> Self {
        Self {
            drastic: false,
            minimal_inconsistent: false,
            problematic: false,
            repair: false,
            linear_repair: false,
            maximal_consistent: false,
        }
    }

    /// Exactly the given measures.
    pub fn only(measures: impl IntoIterator<Item = Measure>) -> Self {
        measures
            .into_iter()
            .fold(Self::none(), |selection, m| selection.with(m, true))
    }

    pub fn with(mut self, measure: Measure, enabled: bool) -> Self {
        *self.flag_mut(measure) = enabled;
        self
    }

    pub fn is_enabled(&self, measure: Measure) -> bool {
        match measure {
            Measure::Drastic => self.drastic,
            Measure::MinimalInconsistent => self.minimal_inconsistent,
            Measure::Problematic => self.problematic,
            Measure::Repair => self.repair,
            Measure::LinearRepair => self.linear_repair,
            Measure::MaximalConsistent => self.maximal_consistent,
        }
    }

    fn flag_mut(&mut self, measure: Measure) -> &mut bool {
        match measure {
            Measure::Drastic => &mut self.drastic,
            Measure::MinimalInconsistent => &mut self.minimal_inconsistent,
            Measure::Problematic => &mut self.problematic,
            Measure::Repair => &mut self.repair,
            Measure::LinearRepair => &mut self.linear_repair,
            Measure::MaximalConsistent => &mut self.maximal_consistent,
        }
    }

    /// Enabled measures in [`Measure::ALL`] order.
    pub fn enabled(&self) -> Vec<Measure> {
        Measure::ALL.into_iter().filter(|m| self.is_enabled(*m)).collect()
    }

    pub fn needs_graph(&self) -> bool {
        self.enabled().iter().any(Measure::needs_graph)
    }
}

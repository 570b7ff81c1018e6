//! Violation detection.

use dcim_core::{AttrId, Dataset, TupleId, ValueKey};
use dcim_parser::{Operator, TupleVar};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::bound::BoundConstraint;
use crate::violation::{Detection, ViolatingPair};

/// Evaluates bound constraints over every tuple assignment of a dataset.
///
/// Two-tuple constraints are checked on every ordered pair of distinct
/// tuples, single-tuple constraints on every tuple against itself. When a
/// two-tuple constraint carries an equality between `t1` and `t2`, candidate
/// partners are looked up in a hash index on that column instead of scanning
/// all rows; the resulting pair set is the same.
#[derive(Debug, Clone, Copy)]
pub struct ViolationDetector {
    use_index: bool,
}

impl Default for ViolationDetector {
    fn default() -> Self {
        Self { use_index: true }
    }
}

impl ViolationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable equality-index pruning and always run the full self-join.
    pub fn without_index(mut self) -> Self {
        self.use_index = false;
        self
    }

    /// Detect all violating pairs of all constraints on the current snapshot.
    pub fn detect(&self, dataset: &Dataset, constraints: &[BoundConstraint]) -> Detection {
        let mut detection = Detection::new(dataset.len(), constraints.len());
        for (position, constraint) in constraints.iter().enumerate() {
            let pairs = self.detect_constraint(dataset, constraint);
            let found = pairs.len();
            let added = detection.merge_constraint(position, pairs);
            debug!(
                constraint = %constraint.source,
                pairs = found,
                new_pairs = added,
                "checked constraint"
            );
        }
        debug!(
            tuples = dataset.len(),
            pairs = detection.len(),
            participating = detection.participating().len(),
            "detection finished"
        );
        detection
    }

    /// Canonical violating pairs of one constraint.
    pub fn detect_constraint(&self, dataset: &Dataset, constraint: &BoundConstraint) -> BTreeSet<ViolatingPair> {
        if constraint.is_single_tuple() {
            return dataset
                .ids()
                .filter(|&id| constraint.is_violated_by(dataset, id, id))
                .map(|id| ViolatingPair::new(id, id))
                .collect();
        }

        match self.use_index.then(|| equality_join(constraint)).flatten() {
            Some((left, right)) => indexed_join(dataset, constraint, left, right),
            None => full_join(dataset, constraint),
        }
    }

    /// Whether the unordered pair {a, b} appears among the violations of
    /// `constraint`. A single-tuple constraint only ever matches `a == b`.
    pub fn pair_violates(&self, dataset: &Dataset, constraint: &BoundConstraint, a: TupleId, b: TupleId) -> bool {
        if constraint.is_single_tuple() {
            return a == b && constraint.is_violated_by(dataset, a, a);
        }
        a != b && (constraint.is_violated_by(dataset, a, b) || constraint.is_violated_by(dataset, b, a))
    }
}

/// The columns of the first `t1.X = t2.Y` predicate, as (t1 column, t2 column).
fn equality_join(constraint: &BoundConstraint) -> Option<(AttrId, AttrId)> {
    constraint
        .predicates
        .iter()
        .find(|p| p.op == Operator::Eq && p.is_cross_tuple())
        .map(|p| match p.left.var {
            TupleVar::T1 => (p.left.attr, p.right.attr),
            TupleVar::T2 => (p.right.attr, p.left.attr),
        })
}

fn full_join(dataset: &Dataset, constraint: &BoundConstraint) -> BTreeSet<ViolatingPair> {
    let mut pairs = BTreeSet::new();
    for i in dataset.ids() {
        for j in dataset.ids() {
            if i != j && constraint.is_violated_by(dataset, i, j) {
                pairs.insert(ViolatingPair::new(i, j));
            }
        }
    }
    pairs
}

fn indexed_join(
    dataset: &Dataset,
    constraint: &BoundConstraint,
    t1_attr: AttrId,
    t2_attr: AttrId,
) -> BTreeSet<ViolatingPair> {
    let mut index: HashMap<ValueKey, Vec<TupleId>> = HashMap::new();
    for (position, tuple) in dataset.tuples().iter().enumerate() {
        if let Some(key) = tuple.get(t2_attr).and_then(|v| v.key()) {
            index.entry(key).or_default().push(TupleId::new(position));
        }
    }

    let mut pairs = BTreeSet::new();
    for (position, tuple) in dataset.tuples().iter().enumerate() {
        let i = TupleId::new(position);
        let Some(key) = tuple.get(t1_attr).and_then(|v| v.key()) else {
            continue;
        };
        let Some(partners) = index.get(&key) else {
            continue;
        };
        for &j in partners {
            if i != j && constraint.is_violated_by(dataset, i, j) {
                pairs.insert(ViolatingPair::new(i, j));
            }
        }
    }
    pairs
}

//! Violation types.

use dcim_core::TupleId;
use std::collections::BTreeSet;
use std::fmt;

/// An unordered pair of tuples that jointly violate some constraint, stored
/// with `first <= second`. A single-tuple violation has `first == second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViolatingPair {
    first: TupleId,
    second: TupleId,
}

impl ViolatingPair {
    /// Create a canonical pair from either ordering.
    pub fn new(a: TupleId, b: TupleId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> TupleId {
        self.first
    }

    pub fn second(&self) -> TupleId {
        self.second
    }

    /// True for a tuple that violates a constraint on its own.
    pub fn is_self_conflict(&self) -> bool {
        self.first == self.second
    }

    pub fn contains(&self, id: TupleId) -> bool {
        self.first == id || self.second == id
    }
}

impl fmt::Display for ViolatingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Result of one detection pass over a dataset snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pairs: BTreeSet<ViolatingPair>,
    participating: BTreeSet<TupleId>,
    per_constraint: Vec<usize>,
    tuple_count: usize,
}

impl Detection {
    /// Create an empty detection over `tuple_count` tuples and
    /// `constraint_count` constraints.
    pub fn new(tuple_count: usize, constraint_count: usize) -> Self {
        Self {
            pairs: BTreeSet::new(),
            participating: BTreeSet::new(),
            per_constraint: vec![0; constraint_count],
            tuple_count,
        }
    }

    /// Merge the distinct pairs one constraint produced. Returns how many of
    /// them were new across all constraints.
    pub fn merge_constraint(&mut self, constraint: usize, pairs: BTreeSet<ViolatingPair>) -> usize {
        if let Some(count) = self.per_constraint.get_mut(constraint) {
            *count += pairs.len();
        }
        let mut added = 0;
        for pair in pairs {
            self.participating.insert(pair.first);
            self.participating.insert(pair.second);
            if self.pairs.insert(pair) {
                added += 1;
            }
        }
        added
    }

    /// Check if there are any violations.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of distinct violating pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Violating pairs in ascending order.
    pub fn pairs(&self) -> &BTreeSet<ViolatingPair> {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolatingPair> {
        self.pairs.iter()
    }

    /// Union of the ids in every violating pair.
    pub fn participating(&self) -> &BTreeSet<TupleId> {
        &self.participating
    }

    /// Distinct pairs each constraint produced, indexed like the bound
    /// constraint list. A pair violating two constraints counts for both.
    pub fn per_constraint(&self) -> &[usize] {
        &self.per_constraint
    }

    /// Number of tuples in the snapshot the detection ran on.
    pub fn tuple_count(&self) -> usize {
        self.tuple_count
    }

    /// Tuples that violate a single-tuple constraint on their own.
    pub fn self_conflicting(&self) -> impl Iterator<Item = TupleId> + '_ {
        self.pairs
            .iter()
            .filter(|p| p.is_self_conflict())
            .map(|p| p.first)
    }

    pub fn contains(&self, a: TupleId, b: TupleId) -> bool {
        self.pairs.contains(&ViolatingPair::new(a, b))
    }
}

impl<'a> IntoIterator for &'a Detection {
    type Item = &'a ViolatingPair;
    type IntoIter = std::collections::btree_set::Iter<'a, ViolatingPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

//! Identity types for DCIM entities.
//!
//! Tuple ids are dense row positions (`0..n`) and stay stable for the whole
//! run: no tuple is ever added or removed once a dataset is loaded.

use std::fmt;

/// Position of a tuple in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleId(pub usize);

impl TupleId {
    /// Create a new TupleId from a raw row index.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw row index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl From<usize> for TupleId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// Position of an attribute in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(pub usize);

impl AttrId {
    /// Create a new AttrId from a raw column index.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw column index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

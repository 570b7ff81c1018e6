//! Injection result types.

use dcim_core::{AttrId, TupleId, Value};

/// One overwritten cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub tuple: TupleId,
    pub attr: AttrId,
    pub old: Value,
    pub new: Value,
}

/// Outcome of a successful injection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectionOutcome {
    /// Cells written, in order; a cell may appear more than once.
    pub changes: Vec<CellChange>,
    /// Passes over the predicate list it took to reach the violation.
    pub attempts: usize,
}

impl InjectionOutcome {
    /// True if the pair already violated the constraint.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changed_tuples(&self) -> Vec<TupleId> {
        let mut tuples: Vec<TupleId> = self.changes.iter().map(|c| c.tuple).collect();
        tuples.sort();
        tuples.dedup();
        tuples
    }
}

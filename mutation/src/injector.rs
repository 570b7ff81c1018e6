//! Violation injector - rewrites a tuple pair until it violates a constraint.
//!
//! The injector walks the constraint's predicates left to right and hands
//! each one to the rewrite for its operator in `ops/`:
//! - `ops/equal.rs` - `=`, `<=`, `>=` (propagate the reference value)
//! - `ops/not_equal.rs` - `!=` (domain value or perturbation)
//! - `ops/order.rs` - `<`, `>` (domain value or offset beyond the reference)
//!
//! A later rewrite can undo an earlier one (`t1.A = t2.A & t1.A != t2.B`
//! over shared columns), so random-orientation passes repeat up to the retry
//! budget. If they all fail, the pair is reset and every orientation of the
//! predicates is tried in turn. Predicates that already hold are never
//! rewritten, so under a fixed orientation shared cells settle instead of
//! being rewritten back and forth. Only when no orientation works is the
//! postcondition declared unmet.

use dcim_constraint::{BoundConstraint, BoundPredicate, ViolationDetector};
use dcim_core::{Dataset, DatasetError, Tuple, TupleId};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{InjectionError, InjectionResult};
use crate::ops::{self, Cell};
use crate::result::{CellChange, InjectionOutcome};

/// Random-orientation passes over the predicate list, and passes per fixed
/// orientation afterwards.
pub const DEFAULT_ATTEMPTS: usize = 5;

/// Predicates whose orientation is enumerated; later ones keep the
/// left-hand side as target.
const ORIENTED_PREDICATES: usize = 8;

/// Forces chosen tuple pairs to violate chosen constraints.
#[derive(Debug, Clone)]
pub struct ViolationInjector {
    attempts: usize,
    detector: ViolationDetector,
}

impl Default for ViolationInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl ViolationInjector {
    pub fn new() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            detector: ViolationDetector::new(),
        }
    }

    /// Set the retry budget (at least one pass).
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Mutate `t1` and `t2` in place so that `constraint` is violated by the
    /// pair. A single-tuple constraint only touches `t1`.
    ///
    /// On error both rows are restored to their state before the call.
    pub fn inject<R: Rng + ?Sized>(
        &self,
        dataset: &mut Dataset,
        constraint: &BoundConstraint,
        t1: TupleId,
        t2: TupleId,
        rng: &mut R,
    ) -> InjectionResult<InjectionOutcome> {
        let single = constraint.is_single_tuple();
        if !single && t1 == t2 {
            return Err(InjectionError::same_tuple(constraint.source.to_string(), t1));
        }
        let t2 = if single { t1 } else { t2 };

        let snapshots = [snapshot(dataset, t1)?, snapshot(dataset, t2)?];
        if self.detector.pair_violates(dataset, constraint, t1, t2) {
            debug!(constraint = %constraint.source, %t1, %t2, "pair already violates");
            return Ok(InjectionOutcome::default());
        }

        let mut changes = Vec::new();
        match self.run(dataset, constraint, (t1, t2), &snapshots, rng, &mut changes) {
            Ok(attempts) => {
                debug!(
                    constraint = %constraint.source,
                    %t1,
                    %t2,
                    attempts,
                    cells = changes.len(),
                    "violation injected"
                );
                Ok(InjectionOutcome { changes, attempts })
            }
            Err(e) => {
                warn!(constraint = %constraint.source, %t1, %t2, error = %e, "injection failed, rolling back");
                restore(dataset, (t1, t2), &snapshots)?;
                Err(e)
            }
        }
    }

    /// Returns the number of passes used.
    fn run<R: Rng + ?Sized>(
        &self,
        dataset: &mut Dataset,
        constraint: &BoundConstraint,
        (t1, t2): (TupleId, TupleId),
        snapshots: &[Tuple; 2],
        rng: &mut R,
        changes: &mut Vec<CellChange>,
    ) -> InjectionResult<usize> {
        let mut passes = 0;
        let mut failure = None;

        'random: for _ in 0..self.attempts {
            passes += 1;
            for predicate in &constraint.predicates {
                let forward = rng.gen_bool(0.5);
                if let Err(e) = apply_predicate(dataset, constraint, predicate, (t1, t2), forward, rng, changes) {
                    failure = Some(e);
                    break 'random;
                }
            }
            if self.detector.pair_violates(dataset, constraint, t1, t2) {
                return Ok(passes);
            }
        }

        let oriented = constraint.predicates.len().min(ORIENTED_PREDICATES);
        for mask in 0..1usize << oriented {
            restore(dataset, (t1, t2), snapshots)?;
            changes.clear();
            'passes: for _ in 0..self.attempts {
                passes += 1;
                for (i, predicate) in constraint.predicates.iter().enumerate() {
                    let forward = i >= ORIENTED_PREDICATES || mask & (1 << i) == 0;
                    if let Err(e) = apply_predicate(dataset, constraint, predicate, (t1, t2), forward, rng, changes) {
                        if failure.is_none() {
                            failure = Some(e);
                        }
                        break 'passes;
                    }
                }
                if self.detector.pair_violates(dataset, constraint, t1, t2) {
                    debug!(constraint = %constraint.source, mask, "fixed orientation succeeded");
                    return Ok(passes);
                }
            }
        }

        Err(failure.unwrap_or_else(|| {
            InjectionError::postcondition(constraint.source.to_string(), t1, t2, self.attempts)
        }))
    }
}

fn snapshot(dataset: &Dataset, id: TupleId) -> InjectionResult<Tuple> {
    dataset
        .tuple(id)
        .cloned()
        .ok_or_else(|| DatasetError::TupleNotFound(id).into())
}

fn restore(dataset: &mut Dataset, (t1, t2): (TupleId, TupleId), snapshots: &[Tuple; 2]) -> InjectionResult<()> {
    let [first, second] = snapshots;
    dataset.restore(t1, first.clone())?;
    if t2 != t1 {
        dataset.restore(t2, second.clone())?;
    }
    Ok(())
}

/// Rewrite one predicate's target side: the left operand when `forward`,
/// otherwise the right one. A predicate that already holds on non-null
/// cells is left as it is.
fn apply_predicate<R: Rng + ?Sized>(
    dataset: &mut Dataset,
    constraint: &BoundConstraint,
    predicate: &BoundPredicate,
    (t1, t2): (TupleId, TupleId),
    forward: bool,
    rng: &mut R,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<()> {
    let left = Cell::new(constraint.resolve_var(predicate.left.var, t1, t2), predicate.left.attr);
    let right = Cell::new(constraint.resolve_var(predicate.right.var, t1, t2), predicate.right.attr);

    let (l, r) = (ops::read(dataset, left)?, ops::read(dataset, right)?);
    if !l.is_null() && !r.is_null() && predicate.op.holds(l.compare(&r)) {
        return Ok(());
    }

    let (target, reference, op) = if forward {
        (left, right, predicate.op)
    } else {
        (right, left, predicate.op.flip())
    };
    ops::rewrite(dataset, op, target, reference, rng, changes)
}

//! Per-operator rewrites.
//!
//! Each rewrite receives one predicate already oriented as
//! `target <op> reference` and changes the target cell (and, when the
//! reference is null, the reference cell) until that predicate holds.

mod equal;
mod not_equal;
mod order;

use dcim_core::{AttrId, AttrType, Dataset, TupleId, Value};
use dcim_parser::Operator;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{InjectionError, InjectionResult};
use crate::perturb::Direction;
use crate::result::CellChange;

pub(crate) use equal::propagate;
pub(crate) use not_equal::separate;
pub(crate) use order::order;

/// One addressable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub tuple: TupleId,
    pub attr: AttrId,
}

impl Cell {
    pub fn new(tuple: TupleId, attr: AttrId) -> Self {
        Self { tuple, attr }
    }
}

/// Apply the rewrite for `op` to make `target <op> reference` hold.
pub(crate) fn rewrite<R: Rng + ?Sized>(
    dataset: &mut Dataset,
    op: Operator,
    target: Cell,
    reference: Cell,
    rng: &mut R,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<()> {
    match op {
        Operator::Eq | Operator::Le | Operator::Ge => propagate(dataset, target, reference, rng, changes),
        Operator::Ne => separate(dataset, target, reference, rng, changes),
        Operator::Gt => order(dataset, target, reference, Direction::Above, rng, changes),
        Operator::Lt => order(dataset, target, reference, Direction::Below, rng, changes),
    }
}

pub(crate) fn read(dataset: &Dataset, cell: Cell) -> InjectionResult<Value> {
    Ok(dataset.value(cell.tuple, cell.attr)?.clone())
}

/// Overwrite a cell, recording the change unless the value is unchanged.
/// The value is first fitted to the column type.
pub(crate) fn write(
    dataset: &mut Dataset,
    cell: Cell,
    value: Value,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<()> {
    let value = conform(dataset, cell.attr, value)?;
    let old = dataset.set_value(cell.tuple, cell.attr, value.clone())?;
    if old != value {
        changes.push(CellChange {
            tuple: cell.tuple,
            attr: cell.attr,
            old,
            new: value,
        });
    }
    Ok(())
}

/// Ints widen into float columns and integral floats narrow into int
/// columns; any other type mix is rejected.
fn conform(dataset: &Dataset, attr: AttrId, value: Value) -> InjectionResult<Value> {
    let Some(def) = dataset.schema().attr(attr) else {
        return Ok(value);
    };
    match (def.attr_type, value) {
        (_, Value::Null) => Ok(Value::Null),
        (AttrType::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
        (AttrType::Int, Value::Float(f)) if f.is_finite() && f.fract() == 0.0 => Ok(Value::Int(f as i64)),
        (expected, value) if AttrType::of(&value) == Some(expected) => Ok(value),
        (expected, value) => Err(InjectionError::type_mismatch(
            def.name.clone(),
            expected.name(),
            value.type_name(),
        )),
    }
}

pub(crate) fn attr_name(dataset: &Dataset, attr: AttrId) -> String {
    dataset
        .schema()
        .attr(attr)
        .map_or_else(|| attr.to_string(), |def| def.name.clone())
}

/// A random active-domain value of `attr` satisfying `keep`.
pub(crate) fn pick_from_domain<R: Rng + ?Sized>(
    dataset: &Dataset,
    attr: AttrId,
    keep: impl Fn(&Value) -> bool,
    rng: &mut R,
) -> InjectionResult<Option<Value>> {
    let candidates: Vec<Value> = dataset.active_domain(attr)?.into_iter().filter(|v| keep(v)).collect();
    Ok(candidates.choose(rng).cloned())
}

/// The reference value, filled from its own column's domain first when
/// the cell is null.
pub(crate) fn settle_reference<R: Rng + ?Sized>(
    dataset: &mut Dataset,
    reference: Cell,
    rng: &mut R,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<Value> {
    let value = read(dataset, reference)?;
    if !value.is_null() {
        return Ok(value);
    }
    let filled = pick_from_domain(dataset, reference.attr, |_| true, rng)?
        .ok_or_else(|| InjectionError::no_candidate(attr_name(dataset, reference.attr), "column has no values"))?;
    write(dataset, reference, filled.clone(), changes)?;
    Ok(filled)
}

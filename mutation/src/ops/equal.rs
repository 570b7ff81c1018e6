//! Equality family (`=`, `<=`, `>=`): copy the reference onto the target.

use dcim_core::Dataset;
use rand::Rng;

use super::{settle_reference, write, Cell};
use crate::error::InjectionResult;
use crate::result::CellChange;

pub(crate) fn propagate<R: Rng + ?Sized>(
    dataset: &mut Dataset,
    target: Cell,
    reference: Cell,
    rng: &mut R,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<()> {
    let value = settle_reference(dataset, reference, rng, changes)?;
    write(dataset, target, value, changes)
}

//! Disequality (`!=`): move the target off the reference value.

use std::cmp::Ordering;

use dcim_core::{Dataset, Value};
use rand::Rng;

use super::{attr_name, pick_from_domain, read, settle_reference, write, Cell};
use crate::error::{InjectionError, InjectionResult};
use crate::perturb::perturb;
use crate::result::CellChange;

/// Perturbation draws before giving up on a value that keeps colliding
/// with the reference (only dates can collide).
const PERTURB_TRIES: usize = 16;

pub(crate) fn separate<R: Rng + ?Sized>(
    dataset: &mut Dataset,
    target: Cell,
    reference: Cell,
    rng: &mut R,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<()> {
    let pinned = settle_reference(dataset, reference, rng, changes)?;
    let current = read(dataset, target)?;
    let differs = |v: &Value| v.compare(&pinned).is_some_and(Ordering::is_ne);
    if differs(&current) {
        return Ok(());
    }

    let candidate = match pick_from_domain(dataset, target.attr, differs, rng)? {
        Some(value) => value,
        None => (0..PERTURB_TRIES)
            .find_map(|_| perturb(&pinned, rng).filter(differs))
            .ok_or_else(|| InjectionError::unsupported(attr_name(dataset, target.attr), pinned.type_name()))?,
    };
    write(dataset, target, candidate, changes)
}

//! Strict ordering (`<`, `>`): move the target to the required side.

use std::cmp::Ordering;

use dcim_core::Dataset;
use rand::Rng;

use super::{attr_name, pick_from_domain, read, settle_reference, write, Cell};
use crate::error::{InjectionError, InjectionResult};
use crate::perturb::{step_beyond, Direction};
use crate::result::CellChange;

pub(crate) fn order<R: Rng + ?Sized>(
    dataset: &mut Dataset,
    target: Cell,
    reference: Cell,
    direction: Direction,
    rng: &mut R,
    changes: &mut Vec<CellChange>,
) -> InjectionResult<()> {
    let wanted = match direction {
        Direction::Above => Ordering::Greater,
        Direction::Below => Ordering::Less,
    };

    let pinned = settle_reference(dataset, reference, rng, changes)?;
    if read(dataset, target)?.compare(&pinned) == Some(wanted) {
        return Ok(());
    }

    let candidate = match pick_from_domain(dataset, target.attr, |v| v.compare(&pinned) == Some(wanted), rng)? {
        Some(value) => value,
        None => step_beyond(&pinned, direction, rng).ok_or_else(|| {
            let side = match direction {
                Direction::Above => "above",
                Direction::Below => "below",
            };
            InjectionError::no_candidate(attr_name(dataset, target.attr), format!("nothing {} {}", side, pinned))
        })?,
    };
    write(dataset, target, candidate, changes)
}

//! Random-noise mutator.
//!
//! Each step picks a random non-null cell of a constraint column and either
//! perturbs it in place (a typo) or replaces it with a value of the same
//! column drawn under Zipf weights over the column's active domain.

use dcim_constraint::BoundConstraint;
use dcim_core::{AttrId, Dataset, TupleId, Value};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{InjectionError, InjectionResult};
use crate::ops::attr_name;
use crate::perturb::perturb;
use crate::result::CellChange;

/// Zipf weights `1 / i^skew` for ranks `1..=n`. A skew of 0 is uniform.
pub fn zipf_weights(n: usize, skew: f64) -> Vec<f64> {
    (1..=n).map(|rank| 1.0 / (rank as f64).powf(skew)).collect()
}

struct Column {
    attr: AttrId,
    domain: Vec<Value>,
    weights: Option<WeightedIndex<f64>>,
}

/// Random cell rewrites restricted to the columns constraints mention.
pub struct RandomNoise {
    columns: Vec<Column>,
    typo_prob: f64,
}

impl RandomNoise {
    /// Capture the active domain and Zipf weights of every column once;
    /// later draws use this snapshot.
    pub fn new(
        dataset: &Dataset,
        columns: impl IntoIterator<Item = AttrId>,
        skew: f64,
        typo_prob: f64,
    ) -> InjectionResult<Self> {
        let mut attrs: Vec<AttrId> = columns.into_iter().collect();
        attrs.sort();
        attrs.dedup();

        let columns = attrs
            .into_iter()
            .map(|attr| {
                let domain = dataset.active_domain(attr)?;
                let weights = WeightedIndex::new(zipf_weights(domain.len(), skew)).ok();
                Ok(Column { attr, domain, weights })
            })
            .collect::<InjectionResult<Vec<_>>>()?;

        Ok(Self {
            columns,
            typo_prob: typo_prob.clamp(0.0, 1.0),
        })
    }

    /// Every column referenced by at least one constraint.
    pub fn columns_of(constraints: &[BoundConstraint]) -> Vec<AttrId> {
        let mut attrs: Vec<AttrId> = constraints
            .iter()
            .flat_map(|c| c.referenced().iter().map(|operand| operand.attr))
            .collect();
        attrs.sort();
        attrs.dedup();
        attrs
    }

    pub fn columns(&self) -> impl Iterator<Item = AttrId> + '_ {
        self.columns.iter().map(|c| c.attr)
    }

    /// Number of rewrites for a target error rate over all cells.
    pub fn change_count(dataset: &Dataset, error_rate: f64) -> usize {
        (error_rate.max(0.0) * dataset.cell_count() as f64) as usize
    }

    /// Rewrite one random cell.
    pub fn apply_one<R: Rng + ?Sized>(&self, dataset: &mut Dataset, rng: &mut R) -> InjectionResult<CellChange> {
        let cells: Vec<(TupleId, usize)> = dataset
            .ids()
            .flat_map(|id| (0..self.columns.len()).map(move |c| (id, c)))
            .filter(|&(id, c)| dataset.value(id, self.columns[c].attr).is_ok_and(|v| !v.is_null()))
            .collect();
        let &(tuple, index) = cells.choose(rng).ok_or(InjectionError::NoCells)?;
        let column = &self.columns[index];

        let current = dataset.value(tuple, column.attr)?.clone();
        let replacement = match &column.weights {
            Some(weights) if !rng.gen_bool(self.typo_prob) => column.domain[weights.sample(rng)].clone(),
            _ => perturb(&current, rng)
                .ok_or_else(|| InjectionError::unsupported(attr_name(dataset, column.attr), current.type_name()))?,
        };

        let old = dataset.set_value(tuple, column.attr, replacement.clone())?;
        Ok(CellChange {
            tuple,
            attr: column.attr,
            old,
            new: replacement,
        })
    }
}

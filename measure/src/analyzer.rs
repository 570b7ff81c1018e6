//! Counting maximal independent sets of a conflict graph (I_MC).

use dcim_graph::{ComplementGraph, ConflictGraph, NodeSet};
use tracing::debug;

use crate::deadline::Deadline;
use crate::error::{MeasureError, MeasureResult};

/// Counts maximal independent sets of a conflict graph, i.e. maximal
/// cliques of its complement. Self-conflicting tuples belong to no
/// independent set.
pub trait GraphAnalyzer {
    fn count_maximal_independent_sets(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<u64>;
}

/// In-process Bron–Kerbosch enumeration with Tomita pivoting over the
/// complement graph, run separately on every connected component of the
/// conflict graph. A maximal independent set of the whole graph is a choice
/// of one per component, so the per-component counts multiply.
#[derive(Debug, Default, Clone, Copy)]
pub struct BronKerboschAnalyzer;

impl BronKerboschAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl GraphAnalyzer for BronKerboschAnalyzer {
    fn count_maximal_independent_sets(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<u64> {
        let eligible = NodeSet::full(graph.node_count()).difference(graph.self_conflicting());

        let mut total: u64 = 1;
        for component in graph.components(&eligible) {
            if component.len() == 1 {
                continue;
            }
            // relabeled 0..k so the complement rows are k bits wide
            let complement = graph.induced(&component).complement();
            let mut search = CliqueCount {
                complement: &complement,
                deadline,
                count: 0,
                steps: 0,
            };
            search.expand(NodeSet::full(component.len()), NodeSet::new(component.len()))?;
            debug!(
                size = component.len(),
                nodes = search.steps,
                maximal = search.count,
                "component enumerated"
            );
            total = total
                .checked_mul(search.count)
                .ok_or_else(|| MeasureError::overflow("maximal independent set count"))?;
        }
        Ok(total)
    }
}

struct CliqueCount<'a> {
    complement: &'a ComplementGraph,
    deadline: &'a Deadline,
    count: u64,
    steps: u64,
}

impl CliqueCount<'_> {
    fn neighbors(&self, node: usize, within: &NodeSet) -> NodeSet {
        match self.complement.neighbors(node) {
            Some(row) => row.intersection(within),
            None => NodeSet::new(within.capacity()),
        }
    }

    /// Count maximal cliques extending the current one by nodes of
    /// `candidates`, none of which may be extended by a node of `excluded`.
    fn expand(&mut self, mut candidates: NodeSet, mut excluded: NodeSet) -> MeasureResult<()> {
        self.steps += 1;
        if self.steps % 1024 == 0 {
            self.deadline.check("I_MC")?;
        }

        if candidates.is_empty() {
            if excluded.is_empty() {
                self.count = self
                    .count
                    .checked_add(1)
                    .ok_or_else(|| MeasureError::overflow("maximal clique count"))?;
            }
            return Ok(());
        }

        let pool = candidates.union(&excluded);
        let pivot = pool
            .iter()
            .max_by_key(|&u| self.complement.neighbors(u).map_or(0, |row| row.intersection_len(&candidates)));
        let branch = match pivot.and_then(|u| self.complement.neighbors(u)) {
            Some(row) => candidates.difference(row),
            None => candidates.clone(),
        };

        for v in branch.iter() {
            let next_candidates = self.neighbors(v, &candidates);
            let next_excluded = self.neighbors(v, &excluded);
            self.expand(next_candidates, next_excluded)?;
            candidates.remove(v);
            excluded.insert(v);
        }
        Ok(())
    }
}

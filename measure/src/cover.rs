//! Minimum vertex cover solvers for I_R and its LP relaxation I_lin_R.
//!
//! Both models have one variable per tuple and a constraint `x_u + x_v >= 1`
//! per violating pair. A self-conflicting tuple is the pair `(u, u)`, i.e.
//! `2·x_u >= 1`: the integer model puts it in every cover, the relaxation
//! only needs `x_u >= 1/2`.

use dcim_graph::{ConflictGraph, NodeSet};
use tracing::{debug, error};

use crate::deadline::Deadline;
use crate::error::{MeasureError, MeasureResult};
use crate::matching::Bipartite;

/// Optimal integral cover.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerCover {
    pub cover: NodeSet,
}

impl IntegerCover {
    pub fn size(&self) -> usize {
        self.cover.len()
    }
}

/// Optimal fractional cover: one value in `[0, 1]` per node.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxedCover {
    pub value: f64,
    pub assignment: Vec<f64>,
}

/// Pluggable vertex-cover optimizer. Both operations must return a global
/// optimum or an error.
pub trait CoverSolver {
    fn solve_integer(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<IntegerCover>;

    fn solve_relaxed(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<RelaxedCover>;
}

/// Exact combinatorial solver.
///
/// The LP optimum of vertex cover is half-integral and equals half the
/// maximum matching of the bipartite double cover, so `solve_relaxed` runs
/// Hopcroft–Karp and reads the assignment off a König cover. `solve_integer`
/// is a branch-and-bound over connected components with degree-0/1
/// reductions and a matching lower bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct CombinatorialCoverSolver;

impl CombinatorialCoverSolver {
    pub fn new() -> Self {
        Self
    }
}

impl CoverSolver for CombinatorialCoverSolver {
    fn solve_integer(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<IntegerCover> {
        let forced = graph.self_conflicting().clone();
        let active = graph.touched().difference(&forced);

        let mut cover = forced;
        for component in graph.components(&active) {
            let rows = graph.induced(&component).adjacency_sets();
            let mut search = CoverSearch::new(&rows, deadline);
            search.run(NodeSet::full(component.len()))?;
            debug!(
                size = component.len(),
                cover = search.best.len(),
                nodes = search.steps,
                "component cover"
            );
            for local in search.best {
                cover.insert(component[local]);
            }
        }

        verify_integral(graph, &cover)?;
        Ok(IntegerCover { cover })
    }

    fn solve_relaxed(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<RelaxedCover> {
        let n = graph.node_count();

        // (u, u) in the double cover is the edge L_u-R_u, which reads l_u + r_u >= 1
        let left: Vec<Vec<usize>> = (0..n)
            .map(|u| {
                let mut row = graph.neighbors(u).to_vec();
                if graph.is_self_conflicting(u) {
                    row.push(u);
                }
                row
            })
            .collect();
        let result = Bipartite::new(left, n).max_matching_cover(deadline)?;

        let assignment: Vec<f64> = (0..n)
            .map(|v| {
                let halves = usize::from(result.left_cover[v]) + usize::from(result.right_cover[v]);
                halves as f64 / 2.0
            })
            .collect();
        let value = result.size as f64 / 2.0;

        verify_relaxed(graph, &assignment, value)?;
        Ok(RelaxedCover { value, assignment })
    }
}

fn verify_integral(graph: &ConflictGraph, cover: &NodeSet) -> MeasureResult<()> {
    if let Some(&(u, v)) = graph
        .edges()
        .iter()
        .find(|(u, v)| !cover.contains(*u) && !cover.contains(*v))
    {
        error!(u, v, "integer cover leaves an edge uncovered");
        return Err(MeasureError::solver(format!("edge ({}, {}) is not covered", u, v)));
    }
    if !graph.self_conflicting().iter().all(|v| cover.contains(v)) {
        error!("integer cover misses a self-conflicting tuple");
        return Err(MeasureError::solver("self-conflicting tuple not covered"));
    }
    Ok(())
}

fn verify_relaxed(graph: &ConflictGraph, assignment: &[f64], value: f64) -> MeasureResult<()> {
    if let Some(&(u, v)) = graph
        .edges()
        .iter()
        .find(|&&(u, v)| assignment[u] + assignment[v] < 1.0)
    {
        error!(u, v, "relaxed cover violates an edge constraint");
        return Err(MeasureError::solver(format!("edge ({}, {}) is not covered", u, v)));
    }
    if let Some(v) = graph.self_conflicting().iter().find(|&v| 2.0 * assignment[v] < 1.0) {
        error!(v, "relaxed cover leaves a self-conflicting tuple below 1/2");
        return Err(MeasureError::solver(format!("self-conflicting tuple {} is not covered", v)));
    }
    let total: f64 = assignment.iter().sum();
    if (total - value).abs() > 1e-9 {
        error!(total, value, "relaxed cover objective mismatch");
        return Err(MeasureError::solver(format!(
            "assignment sums to {} but objective is {}",
            total, value
        )));
    }
    Ok(())
}

/// Depth-first branch-and-bound for one connected component, over its
/// relabeled adjacency rows.
struct CoverSearch<'g> {
    rows: &'g [NodeSet],
    deadline: &'g Deadline,
    best: Vec<usize>,
    steps: u64,
}

impl<'g> CoverSearch<'g> {
    fn new(rows: &'g [NodeSet], deadline: &'g Deadline) -> Self {
        Self {
            rows,
            deadline,
            best: greedy_cover(rows, &NodeSet::full(rows.len())),
            steps: 0,
        }
    }

    fn run(&mut self, component: NodeSet) -> MeasureResult<()> {
        let mut chosen = Vec::new();
        self.branch(component, &mut chosen)
    }

    fn live_neighbors(&self, node: usize, active: &NodeSet) -> NodeSet {
        self.rows[node].intersection(active)
    }

    fn branch(&mut self, mut active: NodeSet, chosen: &mut Vec<usize>) -> MeasureResult<()> {
        self.steps += 1;
        if self.steps % 1024 == 0 {
            self.deadline.check("I_R")?;
        }

        let mark = chosen.len();
        self.reduce(&mut active, chosen);

        if chosen.len() >= self.best.len() {
            chosen.truncate(mark);
            return Ok(());
        }

        let pivot = active
            .iter()
            .map(|v| (self.rows[v].intersection_len(&active), v))
            .max();
        let Some((_, v)) = pivot else {
            // reductions consumed every edge: a strictly better cover
            self.best = chosen.clone();
            chosen.truncate(mark);
            return Ok(());
        };

        if chosen.len() + greedy_matching(self.rows, &active) >= self.best.len() {
            chosen.truncate(mark);
            return Ok(());
        }

        // take v
        let mut without_v = active.clone();
        without_v.remove(v);
        chosen.push(v);
        self.branch(without_v, chosen)?;
        chosen.pop();

        // leave v out: every live neighbor must be taken
        let neighbors = self.live_neighbors(v, &active);
        chosen.extend(neighbors.iter());
        let mut rest = active.difference(&neighbors);
        rest.remove(v);
        self.branch(rest, chosen)?;

        chosen.truncate(mark);
        Ok(())
    }

    /// Drop isolated nodes; for a degree-1 node take its neighbor.
    fn reduce(&self, active: &mut NodeSet, chosen: &mut Vec<usize>) {
        loop {
            let mut changed = false;
            for v in active.clone().iter() {
                if !active.contains(v) {
                    continue;
                }
                let neighbors = self.live_neighbors(v, active);
                match neighbors.len() {
                    0 => {
                        active.remove(v);
                        changed = true;
                    }
                    1 => {
                        if let Some(u) = neighbors.first() {
                            chosen.push(u);
                            active.remove(u);
                            active.remove(v);
                            changed = true;
                        }
                    }
                    _ => {}
                }
            }
            if !changed {
                break;
            }
        }
    }
}

/// Size of a greedy maximal matching on the live subgraph; a lower bound on
/// any cover of it.
fn greedy_matching(rows: &[NodeSet], active: &NodeSet) -> usize {
    let mut free = active.clone();
    let mut size = 0;
    for u in active.iter() {
        if !free.contains(u) {
            continue;
        }
        if let Some(v) = rows[u].intersection(&free).first() {
            free.remove(u);
            free.remove(v);
            size += 1;
        }
    }
    size
}

/// Repeatedly take a maximum-degree node; an initial upper bound.
fn greedy_cover(rows: &[NodeSet], component: &NodeSet) -> Vec<usize> {
    let mut active = component.clone();
    let mut cover = Vec::new();
    loop {
        let pick = active
            .iter()
            .map(|v| (rows[v].intersection_len(&active), v))
            .max();
        match pick {
            Some((degree, v)) if degree > 0 => {
                cover.push(v);
                active.remove(v);
            }
            _ => break,
        }
    }
    cover
}

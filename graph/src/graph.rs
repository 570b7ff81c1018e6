//! Conflict graph storage.

use dcim_constraint::Detection;

use crate::complement::ComplementGraph;
use crate::error::{GraphError, GraphResult};
use crate::nodeset::NodeSet;

/// Undirected graph over tuple ids `0..n` whose edges are the violating
/// pairs of distinct tuples.
///
/// Adjacency is stored as sorted neighbor lists, so memory grows with the
/// number of conflicts rather than with `n²`. Solvers that want bitset rows
/// take them per component through [`ConflictGraph::induced`] and
/// [`ConflictGraph::adjacency_sets`].
///
/// A tuple that violates a single-tuple constraint is recorded as
/// self-conflicting instead of as a self-loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictGraph {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    self_conflicting: NodeSet,
}

impl ConflictGraph {
    /// Build a graph from an edge list. `(u, u)` marks `u` as self-conflicting;
    /// duplicate edges in either direction collapse into one.
    pub fn from_edges(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> GraphResult<Self> {
        let mut self_conflicting = NodeSet::new(node_count);
        let mut list = Vec::new();

        for (u, v) in edges {
            for node in [u, v] {
                if node >= node_count {
                    return Err(GraphError::node_out_of_range(node, node_count));
                }
            }
            if u == v {
                self_conflicting.insert(u);
            } else {
                list.push((u.min(v), u.max(v)));
            }
        }
        list.sort_unstable();
        list.dedup();

        Ok(Self {
            adjacency: neighbor_lists(node_count, &list),
            edges: list,
            self_conflicting,
        })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges between distinct tuples.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges as `(u, v)` with `u < v`, ascending.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Neighbors of `node` in ascending order; empty for unknown nodes.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map_or(&[][..], Vec::as_slice)
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    pub fn self_conflicting(&self) -> &NodeSet {
        &self.self_conflicting
    }

    pub fn is_self_conflicting(&self, node: usize) -> bool {
        self.self_conflicting.contains(node)
    }

    /// True when no tuple conflicts with anything, itself included.
    pub fn is_conflict_free(&self) -> bool {
        self.edges.is_empty() && self.self_conflicting.is_empty()
    }

    /// Nodes incident to at least one edge.
    pub fn touched(&self) -> NodeSet {
        let mut set = NodeSet::new(self.node_count());
        for &(u, v) in &self.edges {
            set.insert(u);
            set.insert(v);
        }
        set
    }

    /// Connected components restricted to `within`, each as an ascending
    /// node list, in order of their smallest node.
    pub fn components(&self, within: &NodeSet) -> Vec<Vec<usize>> {
        let mut seen = NodeSet::new(self.node_count());
        let mut components = Vec::new();
        for start in within.iter() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut frontier = vec![start];
            while let Some(node) = frontier.pop() {
                for &next in self.neighbors(node) {
                    if within.contains(next) && seen.insert(next) {
                        component.push(next);
                        frontier.push(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Subgraph induced by the ascending node list `keep`, relabeled
    /// `0..keep.len()` so that new id `i` is `keep[i]`. Self-conflict marks
    /// of kept nodes survive.
    pub fn induced(&self, keep: &[usize]) -> ConflictGraph {
        let relabel = |old: usize| keep.binary_search(&old).ok();

        let m = keep.len();
        let mut edges = Vec::new();
        for (a, &old) in keep.iter().enumerate() {
            for b in self.neighbors(old).iter().filter_map(|&v| relabel(v)) {
                if a < b {
                    edges.push((a, b));
                }
            }
        }
        edges.sort_unstable();

        let self_conflicting = NodeSet::from_nodes(
            m,
            keep.iter()
                .enumerate()
                .filter(|&(_, &old)| self.self_conflicting.contains(old))
                .map(|(new, _)| new),
        );

        ConflictGraph {
            adjacency: neighbor_lists(m, &edges),
            edges,
            self_conflicting,
        }
    }

    /// One bitset row per node. Quadratic in the node count, so callers
    /// build it on the small graphs returned by [`ConflictGraph::induced`].
    pub fn adjacency_sets(&self) -> Vec<NodeSet> {
        let n = self.node_count();
        self.adjacency
            .iter()
            .map(|row| NodeSet::from_nodes(n, row.iter().copied()))
            .collect()
    }

    /// The complement over distinct node pairs.
    pub fn complement(&self) -> ComplementGraph {
        ComplementGraph::of(self)
    }
}

/// Ascending neighbor lists from an ascending, duplicate-free edge list.
fn neighbor_lists(node_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); node_count];
    for &(u, v) in edges {
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    adjacency
}

/// Derives conflict graphs from detection output. Every round builds a fresh
/// graph; nothing carries over from a previous snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConflictGraphBuilder;

impl ConflictGraphBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, detection: &Detection) -> GraphResult<ConflictGraph> {
        ConflictGraph::from_edges(
            detection.tuple_count(),
            detection.iter().map(|p| (p.first().index(), p.second().index())),
        )
    }
}

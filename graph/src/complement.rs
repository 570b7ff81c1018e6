//! Complement of a conflict graph.

use crate::graph::ConflictGraph;
use crate::nodeset::NodeSet;

/// Graph with an edge between two distinct tuples iff they do not conflict.
///
/// A maximal clique here is a maximal set of mutually non-conflicting tuples.
/// Rows are dense bitsets, so build this on one component at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementGraph {
    adjacency: Vec<NodeSet>,
    degrees: Vec<usize>,
}

impl ComplementGraph {
    pub fn of(graph: &ConflictGraph) -> Self {
        let n = graph.node_count();
        let mut adjacency = Vec::with_capacity(n);
        let mut degrees = Vec::with_capacity(n);
        for node in 0..n {
            let mut row = NodeSet::full(n);
            for &conflict in graph.neighbors(node) {
                row.remove(conflict);
            }
            row.remove(node);
            // n - 1 - conflict degree
            degrees.push(row.len());
            adjacency.push(row);
        }
        Self { adjacency, degrees }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.degrees.get(node).copied().unwrap_or(0)
    }

    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    pub fn neighbors(&self, node: usize) -> Option<&NodeSet> {
        self.adjacency.get(node)
    }

    pub fn edge_count(&self) -> usize {
        self.degrees.iter().sum::<usize>() / 2
    }

    /// Every undirected edge exactly once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, row)| row.iter().filter(move |&v| v > u).map(move |v| (u, v)))
    }
}

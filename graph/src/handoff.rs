//! Handoff file for external clique enumerators.
//!
//! Format: the node count on the first line, then one `<node> <degree>` line
//! per node, then one `<u> <v>` line per undirected edge of the complement
//! graph (each edge once, `u < v`). Nodes are numbered `0..n` as in the
//! conflict graph passed in.
//!
//! The complement is streamed from the conflict graph's neighbor lists and
//! never materialized.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::GraphResult;
use crate::graph::ConflictGraph;

pub fn write_handoff<W: Write>(graph: &ConflictGraph, mut out: W) -> GraphResult<()> {
    let n = graph.node_count();
    writeln!(out, "{}", n)?;
    for node in 0..n {
        writeln!(out, "{} {}", node, n - 1 - graph.degree(node))?;
    }
    for u in 0..n {
        let mut conflicts = graph.neighbors(u).iter().copied().filter(|&v| v > u).peekable();
        for v in u + 1..n {
            if conflicts.next_if_eq(&v).is_some() {
                continue;
            }
            writeln!(out, "{} {}", u, v)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write the handoff file at `path`, replacing any previous contents.
pub fn write_handoff_file(graph: &ConflictGraph, path: &Path) -> GraphResult<()> {
    let file = File::create(path)?;
    write_handoff(graph, BufWriter::new(file))
}

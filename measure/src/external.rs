//! External maximal-clique enumerator driven through a handoff file.
//!
//! The program is run as `<program> <args...> <handoff-file>` and must print
//! either a `maximal_cliques=<n>` (or `maximal_cliques: <n>`) line, or a
//! single integer and nothing else. Any other output, a non-zero exit or a
//! missing count is a contract error.
//!
//! Self-conflicting tuples belong to no maximal consistent subset, so they
//! are left out of the handoff. The remaining tuples are renumbered
//! `0..k` in ascending order of their tuple ids, keeping the node ids of the
//! file contiguous; the clique count does not depend on the numbering.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use dcim_graph::{write_handoff_file, ConflictGraph};
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::analyzer::GraphAnalyzer;
use crate::deadline::Deadline;
use crate::error::{MeasureError, MeasureResult};

static HANDOFF_SEQ: AtomicU64 = AtomicU64::new(0);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct ExternalCliqueAnalyzer {
    program: PathBuf,
    args: Vec<String>,
    handoff_dir: PathBuf,
    keep_handoff: bool,
}

impl ExternalCliqueAnalyzer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            handoff_dir: std::env::temp_dir(),
            keep_handoff: false,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_handoff_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.handoff_dir = dir.into();
        self
    }

    /// Leave handoff files on disk after the run.
    pub fn keep_handoff(mut self, keep: bool) -> Self {
        self.keep_handoff = keep;
        self
    }

    fn handoff_path(&self) -> PathBuf {
        let seq = HANDOFF_SEQ.fetch_add(1, Ordering::Relaxed);
        self.handoff_dir
            .join(format!("dcim-complement-{}-{}.txt", std::process::id(), seq))
    }

    fn run(&self, path: &Path, deadline: &Deadline) -> MeasureResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MeasureError::analyzer_contract(format!("failed to start {}: {}", self.program.display(), e))
            })?;

        // Drain both pipes on their own threads so a chatty child never blocks.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status: ExitStatus = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if deadline.is_expired() {
                if let Err(e) = child.kill() {
                    warn!(error = %e, "failed to kill clique analyzer");
                }
                let _ = child.wait();
                return Err(MeasureError::timeout(
                    format!("clique analyzer {}", self.program.display()),
                    deadline.budget().unwrap_or_default(),
                ));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout.map(join).unwrap_or_default();
        let stderr = stderr.map(join).unwrap_or_default();
        if !status.success() {
            return Err(MeasureError::analyzer_contract(format!(
                "{} exited with {}: {}",
                self.program.display(),
                status,
                stderr.trim()
            )));
        }
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join(handle: thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

impl GraphAnalyzer for ExternalCliqueAnalyzer {
    fn count_maximal_independent_sets(&self, graph: &ConflictGraph, deadline: &Deadline) -> MeasureResult<u64> {
        let eligible: Vec<usize> = (0..graph.node_count())
            .filter(|&v| !graph.is_self_conflicting(v))
            .collect();
        if eligible.is_empty() {
            return Ok(1);
        }
        let renumbered;
        let target = if graph.self_conflicting().is_empty() {
            graph
        } else {
            renumbered = graph.induced(&eligible);
            &renumbered
        };

        let path = self.handoff_path();
        write_handoff_file(target, &path)?;
        debug!(
            path = %path.display(),
            nodes = target.node_count(),
            conflicts = target.edge_count(),
            "wrote handoff file"
        );

        let result = self.run(&path, deadline).and_then(|stdout| parse_clique_count(&stdout));

        if !self.keep_handoff {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "failed to remove handoff file");
            }
        }
        result
    }
}

/// Read the maximal-clique count from an analyzer's standard output.
pub fn parse_clique_count(stdout: &str) -> MeasureResult<u64> {
    let re = Regex::new(r"(?m)^\s*maximal_cliques\s*[:=]\s*(\d+)\s*$")
        .map_err(|e| MeasureError::analyzer_contract(e.to_string()))?;

    let counts: Vec<&str> = re
        .captures_iter(stdout)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let token = match counts.as_slice() {
        [one] => *one,
        [] => {
            let trimmed = stdout.trim();
            if trimmed.is_empty() {
                return Err(MeasureError::analyzer_contract("analyzer printed nothing"));
            }
            trimmed
        }
        _ => {
            return Err(MeasureError::analyzer_contract(format!(
                "analyzer reported {} maximal_cliques lines",
                counts.len()
            )))
        }
    };

    token.parse::<u64>().map_err(|_| {
        MeasureError::analyzer_contract(format!("expected a maximal-clique count, got '{}'", truncate(token)))
    })
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 80;
    match text.char_indices().nth(LIMIT) {
        Some((i, _)) => format!("{}...", &text[..i]),
        None => text.to_string(),
    }
}

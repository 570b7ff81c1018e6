//! Maximum bipartite matching (Hopcroft–Karp) and König vertex covers.

use std::collections::VecDeque;

use crate::deadline::Deadline;
use crate::error::MeasureResult;

const FREE: usize = usize::MAX;

/// Bipartite graph with `left.len()` left vertices; `left[u]` lists the
/// right vertices adjacent to `u`.
#[derive(Debug)]
pub(crate) struct Bipartite {
    left: Vec<Vec<usize>>,
    right_count: usize,
}

/// A maximum matching together with a minimum vertex cover of equal size.
#[derive(Debug)]
pub(crate) struct MatchingCover {
    pub size: usize,
    pub left_cover: Vec<bool>,
    pub right_cover: Vec<bool>,
}

impl Bipartite {
    pub fn new(left: Vec<Vec<usize>>, right_count: usize) -> Self {
        Self { left, right_count }
    }

    /// Maximum matching and, by König's theorem, a minimum vertex cover.
    pub fn max_matching_cover(&self, deadline: &Deadline) -> MeasureResult<MatchingCover> {
        let n = self.left.len();
        let mut match_left = vec![FREE; n];
        let mut match_right = vec![FREE; self.right_count];
        let mut dist = vec![0usize; n];
        let mut size = 0;

        while self.layer(&match_left, &match_right, &mut dist) {
            deadline.check("I_lin_R")?;
            for u in 0..n {
                if match_left[u] == FREE && self.augment(u, &mut match_left, &mut match_right, &mut dist) {
                    size += 1;
                }
            }
        }

        let (left_cover, right_cover) = self.konig(&match_left, &match_right);
        Ok(MatchingCover {
            size,
            left_cover,
            right_cover,
        })
    }

    /// BFS from free left vertices; true if some augmenting path exists.
    fn layer(&self, match_left: &[usize], match_right: &[usize], dist: &mut [usize]) -> bool {
        let mut queue = VecDeque::new();
        for (u, d) in dist.iter_mut().enumerate() {
            if match_left[u] == FREE {
                *d = 0;
                queue.push_back(u);
            } else {
                *d = usize::MAX;
            }
        }

        let mut found = false;
        while let Some(u) = queue.pop_front() {
            for &v in &self.left[u] {
                match match_right[v] {
                    FREE => found = true,
                    w if dist[w] == usize::MAX => {
                        dist[w] = dist[u] + 1;
                        queue.push_back(w);
                    }
                    _ => {}
                }
            }
        }
        found
    }

    /// Iterative DFS along the BFS layers.
    fn augment(&self, root: usize, match_left: &mut [usize], match_right: &mut [usize], dist: &mut [usize]) -> bool {
        // (left vertex, next edge index to try)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        let mut path: Vec<(usize, usize)> = Vec::new();

        while let Some(top) = stack.last_mut() {
            let u = top.0;
            if top.1 >= self.left[u].len() {
                dist[u] = usize::MAX;
                stack.pop();
                path.pop();
                continue;
            }
            let v = self.left[u][top.1];
            top.1 += 1;

            let w = match_right[v];
            if w == FREE {
                path.push((u, v));
                for &(pu, pv) in &path {
                    match_left[pu] = pv;
                    match_right[pv] = pu;
                }
                return true;
            }
            if dist[w] != usize::MAX && dist[w] == dist[u] + 1 {
                path.push((u, v));
                stack.push((w, 0));
            }
        }
        false
    }

    /// Alternating reachability from free left vertices: cover is
    /// (left not reached) ∪ (right reached).
    fn konig(&self, match_left: &[usize], match_right: &[usize]) -> (Vec<bool>, Vec<bool>) {
        let mut seen_left = vec![false; self.left.len()];
        let mut seen_right = vec![false; self.right_count];
        let mut queue: VecDeque<usize> = (0..self.left.len()).filter(|&u| match_left[u] == FREE).collect();
        for &u in &queue {
            seen_left[u] = true;
        }

        while let Some(u) = queue.pop_front() {
            for &v in &self.left[u] {
                if seen_right[v] || match_left[u] == v {
                    continue;
                }
                seen_right[v] = true;
                let w = match_right[v];
                if w != FREE && !seen_left[w] {
                    seen_left[w] = true;
                    queue.push_back(w);
                }
            }
        }

        (seen_left.into_iter().map(|s| !s).collect(), seen_right)
    }
}

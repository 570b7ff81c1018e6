//! Fixed-capacity node bitsets.

use std::fmt;

const WORD_BITS: usize = 64;

/// A set of node indices in `0..capacity`, packed 64 per word.
///
/// All binary operations assume both operands share the same capacity.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeSet {
    words: Vec<u64>,
    capacity: usize,
}

impl NodeSet {
    /// An empty set able to hold nodes `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// The set `{0, 1, ..., capacity - 1}`.
    pub fn full(capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        for word in &mut set.words {
            *word = u64::MAX;
        }
        set.clear_tail();
        set
    }

    pub fn from_nodes(capacity: usize, nodes: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(capacity);
        for node in nodes {
            set.insert(node);
        }
        set
    }

    fn clear_tail(&mut self) {
        let rem = self.capacity % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a node; returns false if it was already present. Nodes outside
    /// the capacity are ignored.
    pub fn insert(&mut self, node: usize) -> bool {
        if node >= self.capacity {
            return false;
        }
        let (w, b) = (node / WORD_BITS, node % WORD_BITS);
        let had = self.words[w] & (1 << b) != 0;
        self.words[w] |= 1 << b;
        !had
    }

    pub fn remove(&mut self, node: usize) -> bool {
        if node >= self.capacity {
            return false;
        }
        let (w, b) = (node / WORD_BITS, node % WORD_BITS);
        let had = self.words[w] & (1 << b) != 0;
        self.words[w] &= !(1 << b);
        had
    }

    pub fn contains(&self, node: usize) -> bool {
        node < self.capacity && self.words[node / WORD_BITS] & (1 << (node % WORD_BITS)) != 0
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Smallest member.
    pub fn first(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, &w)| w != 0)
            .map(|(i, w)| i * WORD_BITS + w.trailing_zeros() as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }

    pub fn intersection(&self, other: &NodeSet) -> NodeSet {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn union(&self, other: &NodeSet) -> NodeSet {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn difference(&self, other: &NodeSet) -> NodeSet {
        self.zip_with(other, |a, b| a & !b)
    }

    /// `|self ∩ other|` without allocating.
    pub fn intersection_len(&self, other: &NodeSet) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    fn zip_with(&self, other: &NodeSet, f: impl Fn(u64, u64) -> u64) -> NodeSet {
        NodeSet {
            words: self.words.iter().zip(&other.words).map(|(&a, &b)| f(a, b)).collect(),
            capacity: self.capacity,
        }
    }
}

impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

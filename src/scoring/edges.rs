//! Labeled brackets and multisets of them.

use std::collections::HashMap;

// =#========================================================================#=
// EDGE
// =#========================================================================$=
/// A labeled bracket: a constituent label over the terminal span `[left, right)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    label: String,
    left: usize,
    right: usize,
}

impl Edge {
    /// Creates a new edge.
    ///
    /// # Panics
    /// Panics if the span is empty or reversed.
    pub fn new<S: Into<String>>(label: S, left: usize, right: usize) -> Self {
        assert!(left < right, "edge span must not be empty");
        Edge {
            label: label.into(),
            left,
            right,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }
}

// =#========================================================================#=
// EDGE SET
// =#========================================================================$=
/// Multiset of [Edge]s of one tree.
///
/// A tree can contain the same labeled bracket more than once (unary chains
/// like `(NP (NP ...))`), so each edge carries a count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    counts: HashMap<Edge, usize>,
    nedges: usize,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `edge`.
    pub fn insert(&mut self, edge: Edge) {
        *self.counts.entry(edge).or_insert(0) += 1;
        self.nedges += 1;
    }

    /// Total number of edges, counting repetitions.
    pub fn nedges(&self) -> usize {
        self.nedges
    }

    pub fn is_empty(&self) -> bool {
        self.nedges == 0
    }

    /// Number of occurrences of `edge`.
    pub fn count(&self, edge: &Edge) -> usize {
        self.counts.get(edge).copied().unwrap_or(0)
    }

    /// Size of the multiset intersection with `other`.
    pub fn common(&self, other: &EdgeSet) -> usize {
        let (smaller, larger) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .counts
            .iter()
            .map(|(edge, &count)| count.min(larger.count(edge)))
            .sum()
    }

    /// Distinct edges with their counts, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Edge, usize)> {
        self.counts.iter().map(|(edge, &count)| (edge, count))
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut set = EdgeSet::new();
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

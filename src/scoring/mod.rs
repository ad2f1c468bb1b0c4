//! Labeled bracket (PARSEVAL) scoring of candidate trees against a gold tree.
//!
//! The gold tree's [EdgeSet] is computed once per sentence with
//! [BracketScorer::edges]; every candidate is then compared against it with
//! [BracketScorer::compare]. [ParsevalScorer] is the default scorer.

pub mod edges;
pub mod parseval;
pub mod precrec;

pub use edges::{Edge, EdgeSet};
pub use parseval::ParsevalScorer;
pub use precrec::PrecRec;

use crate::model::Tree;

/// Edge counts of one candidate tree compared against gold edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeCounts {
    /// Edges in the candidate
    pub candidate: usize,
    /// Edges in both candidate and gold
    pub common: usize,
}

/// Counts matching labeled brackets between trees.
pub trait BracketScorer {
    /// Labeled brackets of `tree`.
    fn edges(&self, tree: &Tree) -> EdgeSet;

    /// Compares `candidate` against precomputed gold edges.
    fn compare(&self, gold: &EdgeSet, candidate: &Tree) -> EdgeCounts {
        let test = self.edges(candidate);
        EdgeCounts {
            candidate: test.nedges(),
            common: gold.common(&test),
        }
    }
}

/// F-score `2 * common / (candidate + gold)`, defined as 0 if both counts are 0.
///
/// # Example
/// ```
/// use rerank_data::scoring::f_score;
///
/// assert!((f_score(6, 8, 10) - 0.6667).abs() < 1e-4);
/// assert_eq!(f_score(0, 0, 0), 0.0);
/// ```
pub fn f_score(common: usize, candidate: usize, gold: usize) -> f32 {
    let total = candidate + gold;
    if total == 0 {
        0.0
    } else {
        (2.0 * common as f64 / total as f64) as f32
    }
}

//! Precision/recall bookkeeping over labeled brackets.

use crate::scoring::EdgeCounts;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Bracket counts summed over any number of trees.
///
/// # Example
/// ```
/// use rerank_data::scoring::PrecRec;
///
/// let mut total = PrecRec::new(10, 8, 6);
/// total += PrecRec::new(5, 5, 5);
/// assert_eq!(total, PrecRec::new(15, 13, 11));
/// assert!((total.f_score() - 22.0 / 28.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecRec {
    /// Edges in the gold trees
    pub gold: usize,
    /// Edges in the candidate trees
    pub test: usize,
    /// Edges in both
    pub common: usize,
}

impl PrecRec {
    pub fn new(gold: usize, test: usize, common: usize) -> Self {
        PrecRec { gold, test, common }
    }

    /// Counts of one candidate compared against a gold tree with `gold` edges.
    pub fn from_counts(gold: usize, counts: EdgeCounts) -> Self {
        PrecRec {
            gold,
            test: counts.candidate,
            common: counts.common,
        }
    }

    /// `common / test`, 0 without candidate edges.
    pub fn precision(&self) -> f64 {
        if self.test == 0 {
            0.0
        } else {
            self.common as f64 / self.test as f64
        }
    }

    /// `common / gold`, 0 without gold edges.
    pub fn recall(&self) -> f64 {
        if self.gold == 0 {
            0.0
        } else {
            self.common as f64 / self.gold as f64
        }
    }

    /// `2 * common / (gold + test)`, 0 without any edges.
    pub fn f_score(&self) -> f64 {
        let total = self.gold + self.test;
        if total == 0 {
            0.0
        } else {
            2.0 * self.common as f64 / total as f64
        }
    }
}

impl AddAssign for PrecRec {
    fn add_assign(&mut self, other: PrecRec) {
        self.gold += other.gold;
        self.test += other.test;
        self.common += other.common;
    }
}

impl Add for PrecRec {
    type Output = PrecRec;

    fn add(mut self, other: PrecRec) -> PrecRec {
        self += other;
        self
    }
}

impl fmt::Display for PrecRec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "precision {:.4}, recall {:.4}, f-score {:.4}",
            self.precision(),
            self.recall(),
            self.f_score()
        )
    }
}

//! A sentence: gold tree plus its n-best candidate parses.

use crate::model::Tree;
use crate::nbest::ReadOptions;
use crate::nbest::parse::{ParseRecord, read_tree_line};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::scoring::{BracketScorer, EdgeSet, ParsevalScorer, PrecRec};
use thiserror::Error;

/// Upper bound on parses reserved up front, whatever the header claims
const MAX_PREALLOCATED_PARSES: usize = 1024;

// =#========================================================================#=
// SENTENCE ERROR
// =#========================================================================$=
/// Failure while reading one sentence. The sentence is discarded as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentenceError {
    #[error("could not read number of parses: {0}")]
    Header(#[source] ParsingError),

    #[error("reading gold tree failed: {0}")]
    GoldTree(#[source] ParsingError),

    #[error("reading parse tree {index} failed: {source}")]
    Parse {
        index: usize,
        #[source]
        source: ParsingError,
    },
}

impl SentenceError {
    /// The low-level error behind this failure.
    pub fn parsing_error(&self) -> &ParsingError {
        match self {
            SentenceError::Header(err) | SentenceError::GoldTree(err) => err,
            SentenceError::Parse { source, .. } => source,
        }
    }
}

// =#========================================================================#=
// SENTENCE
// =#========================================================================$=
/// Gold tree of a sentence together with its ranked candidate parses.
///
/// Reading a sentence scores every parse against the gold tree, whose
/// labeled brackets are extracted only once. The sentence owns all trees;
/// cloning it clones them.
///
/// # Invariants
/// - `max_fscore` is the maximum f-score over all parses, 0 without parses
/// - `gold_edge_count` is the number of labeled brackets of the gold tree,
///   0 if trees were ignored
///
/// # Format
/// `<nparses> <gold tree>` followed by `nparses` lines `<logprob> <tree>`.
/// The gold tree may also start on the line after the count.
///
/// # Example
/// ```
/// use rerank_data::nbest::{ReadOptions, Sentence};
/// use rerank_data::parser::ByteParser;
///
/// let data = "2 (S1 (S (NP (NN Dogs)) (VP (VBP bark))))\n\
///             -10.5 (S1 (S (NP (NN Dogs)) (VP (VBP bark))))\n\
///             -12.0 (S1 (NP (NN Dogs) (NN bark)))\n";
/// let mut parser = ByteParser::for_str(data);
/// let sentence = Sentence::read(&mut parser, &ReadOptions::new())?;
///
/// assert_eq!(sentence.nparses(), 2);
/// assert_eq!(sentence.gold_edge_count(), 3);
/// assert_eq!(sentence.f_score(0), 1.0);
/// assert_eq!(sentence.max_fscore(), 1.0);
/// # Ok::<(), rerank_data::nbest::SentenceError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentence {
    gold: Option<Tree>,
    gold_edge_count: usize,
    max_fscore: f32,
    parses: Vec<ParseRecord>,
}

// ============================================================================
// Reading (pub)
// ============================================================================
impl Sentence {
    /// Reads a sentence, scoring its parses with the [ParsevalScorer].
    ///
    /// # Errors
    /// [SentenceError] naming the part that failed; nothing of the sentence is kept.
    pub fn read<B: ByteSource>(
        parser: &mut ByteParser<B>,
        options: &ReadOptions,
    ) -> Result<Self, SentenceError> {
        Self::read_with(parser, options, &ParsevalScorer::default())
    }

    /// Reads a sentence, scoring its parses with the given scorer.
    ///
    /// # Errors
    /// [SentenceError] naming the part that failed; nothing of the sentence is kept.
    pub fn read_with<B, S>(
        parser: &mut ByteParser<B>,
        options: &ReadOptions,
        scorer: &S,
    ) -> Result<Self, SentenceError>
    where
        B: ByteSource,
        S: BracketScorer + ?Sized,
    {
        let nparses = parser.read_uint().map_err(SentenceError::Header)?;
        parser.skip_whitespace();

        let gold = read_tree_line(parser, options).map_err(SentenceError::GoldTree)?;
        let gold_edges = gold.as_ref().map(|tree| scorer.edges(tree));
        let gold_edge_count = gold_edges.as_ref().map_or(0, EdgeSet::nedges);

        let mut sentence = Sentence {
            gold,
            gold_edge_count,
            max_fscore: 0.0,
            parses: Vec::with_capacity(nparses.min(MAX_PREALLOCATED_PARSES)),
        };

        for index in 0..nparses {
            let mut parse = ParseRecord::read(parser, options).map_err(|source| {
                tracing::warn!(parse = index, error = %source, "reading parse tree failed");
                SentenceError::Parse { index, source }
            })?;

            let counts = match (&gold_edges, parse.tree()) {
                (Some(edges), Some(tree)) => Some(scorer.compare(edges, tree)),
                _ => None,
            };
            if let Some(counts) = counts {
                parse.set_score(gold_edge_count, counts);
            }

            sentence.max_fscore = sentence.max_fscore.max(parse.f_score());
            sentence.parses.push(parse);
        }

        Ok(sentence)
    }
}

// ============================================================================
// Accessors (pub)
// ============================================================================
impl Sentence {
    /// The gold tree, `None` if trees were ignored while reading.
    pub fn gold(&self) -> Option<&Tree> {
        self.gold.as_ref()
    }

    /// Number of labeled brackets in the gold tree.
    pub fn gold_edge_count(&self) -> usize {
        self.gold_edge_count
    }

    /// Highest f-score among the parses, 0 if there are none.
    pub fn max_fscore(&self) -> f32 {
        self.max_fscore
    }

    pub fn nparses(&self) -> usize {
        self.parses.len()
    }

    /// Parses in the order given in the data (usually by decreasing probability).
    pub fn parses(&self) -> &[ParseRecord] {
        &self.parses
    }

    /// Returns parse `i`.
    ///
    /// # Panics
    /// Panics if `i >= nparses()`.
    pub fn parse(&self, i: usize) -> &ParseRecord {
        &self.parses[i]
    }

    /// F-score of parse `i`.
    ///
    /// # Panics
    /// Panics if `i >= nparses()`.
    pub fn f_score(&self, i: usize) -> f32 {
        self.parses[i].f_score()
    }

    /// Index of the first parse reaching the maximal f-score.
    pub fn best_parse_index(&self) -> Option<usize> {
        self.parses
            .iter()
            .position(|parse| parse.f_score() == self.max_fscore)
    }

    /// Bracket counts of parse `i` as stored while reading.
    ///
    /// # Panics
    /// Panics if `i >= nparses()`.
    pub fn counts(&self, i: usize) -> PrecRec {
        let parse = &self.parses[i];
        PrecRec::new(self.gold_edge_count, parse.edge_count(), parse.correct_edge_count())
    }

    /// Recomputes precision/recall counts of parse `i` from the trees.
    ///
    /// Returns `None` if `i` is out of range or trees were ignored.
    pub fn precrec(&self, i: usize) -> Option<PrecRec> {
        self.precrec_with(i, &ParsevalScorer::default())
    }

    /// Recomputes precision/recall counts of parse `i` with the given scorer.
    ///
    /// Returns `None` if `i` is out of range or trees were ignored.
    pub fn precrec_with<S: BracketScorer + ?Sized>(&self, i: usize, scorer: &S) -> Option<PrecRec> {
        let gold = self.gold.as_ref()?;
        let tree = self.parses.get(i)?.tree()?;
        let gold_edges = scorer.edges(gold);
        Some(PrecRec::from_counts(
            gold_edges.nedges(),
            scorer.compare(&gold_edges, tree),
        ))
    }

    /// Consumes the sentence and returns its parses.
    pub fn into_parses(self) -> Vec<ParseRecord> {
        self.parses
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;
    use crate::scoring::EdgeCounts;

    /// Scorer reporting fixed counts for candidates, keyed by their first word.
    struct FixedScorer {
        gold_edges: usize,
        counts: Vec<(&'static str, EdgeCounts)>,
    }

    impl BracketScorer for FixedScorer {
        fn edges(&self, _tree: &Tree) -> EdgeSet {
            (0..self.gold_edges)
                .map(|i| crate::scoring::Edge::new("X", i, i + 1))
                .collect()
        }

        fn compare(&self, _gold: &EdgeSet, candidate: &Tree) -> EdgeCounts {
            let word = candidate.words()[0];
            self.counts
                .iter()
                .find(|(w, _)| *w == word)
                .map(|(_, counts)| *counts)
                .unwrap_or_default()
        }
    }

    #[test]
    fn test_max_fscore_over_any_order() {
        let scorer = FixedScorer {
            gold_edges: 10,
            counts: vec![
                ("a", EdgeCounts { candidate: 10, common: 2 }),
                ("b", EdgeCounts { candidate: 10, common: 9 }),
                ("c", EdgeCounts { candidate: 10, common: 5 }),
            ],
        };
        for order in [["a", "b", "c"], ["c", "a", "b"], ["b", "c", "a"]] {
            let mut data = String::from("3 (S1 (X g))\n");
            for word in order {
                data.push_str(&format!("-1 (S1 (X {word}))\n"));
            }
            let mut parser = ByteParser::for_str(&data);
            let sentence = Sentence::read_with(&mut parser, &ReadOptions::new(), &scorer).unwrap();
            assert!((sentence.max_fscore() - 0.9).abs() < 1e-6);
            assert_eq!(sentence.f_score(sentence.best_parse_index().unwrap()), sentence.max_fscore());
        }
    }

    #[test]
    fn test_fscore_from_counts() {
        let scorer = FixedScorer {
            gold_edges: 10,
            counts: vec![("a", EdgeCounts { candidate: 8, common: 6 })],
        };
        let mut parser = ByteParser::for_str("1 (S1 (X g))\n-1 (S1 (X a))\n");
        let sentence = Sentence::read_with(&mut parser, &ReadOptions::new(), &scorer).unwrap();
        assert_eq!(sentence.gold_edge_count(), 10);
        assert_eq!(sentence.parse(0).edge_count(), 8);
        assert_eq!(sentence.parse(0).correct_edge_count(), 6);
        assert!((sentence.f_score(0) - 0.6667).abs() < 1e-4);
        assert_eq!(sentence.counts(0), PrecRec::new(10, 8, 6));
    }

    #[test]
    fn test_zero_edges_give_zero_fscore() {
        let scorer = FixedScorer {
            gold_edges: 0,
            counts: vec![],
        };
        let mut parser = ByteParser::for_str("1 (S1 (X g))\n-1 (S1 (X a))\n");
        let sentence = Sentence::read_with(&mut parser, &ReadOptions::new(), &scorer).unwrap();
        assert_eq!(sentence.f_score(0), 0.0);
        assert_eq!(sentence.max_fscore(), 0.0);
    }

    #[test]
    fn test_no_parses() {
        let mut parser = ByteParser::for_str("0 (S1 (S (NP (NN x)) (VP (VB y))))\n");
        let sentence = Sentence::read(&mut parser, &ReadOptions::new()).unwrap();
        assert_eq!(sentence.nparses(), 0);
        assert_eq!(sentence.max_fscore(), 0.0);
        assert_eq!(sentence.gold_edge_count(), 3);
        assert_eq!(sentence.best_parse_index(), None);
    }

    #[test]
    fn test_gold_on_next_line() {
        let mut parser = ByteParser::for_str("1\n(S1 (NP (NN x)))\n-2 (S1 (NP (NN x)))\n");
        let sentence = Sentence::read(&mut parser, &ReadOptions::new()).unwrap();
        assert_eq!(sentence.gold().unwrap().words(), vec!["x"]);
        assert_eq!(sentence.f_score(0), 1.0);
    }

    #[test]
    fn test_missing_parse_fails_whole_sentence() {
        let mut parser = ByteParser::for_str("2 (S1 (NP (NN x)))\n-2 (S1 (NP (NN x)))\n");
        let err = Sentence::read(&mut parser, &ReadOptions::new()).unwrap_err();
        match &err {
            SentenceError::Parse { index, source } => {
                assert_eq!(*index, 1);
                assert_eq!(source.kind(), &ParsingErrorType::UnexpectedEOF);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.parsing_error().kind(), &ParsingErrorType::UnexpectedEOF);
    }

    #[test]
    fn test_bad_gold_tree() {
        let mut parser = ByteParser::for_str("1 (S1 (NP (NN x))\n-2 (S1 (NP (NN x)))\n");
        let err = Sentence::read(&mut parser, &ReadOptions::new()).unwrap_err();
        assert!(matches!(err, SentenceError::GoldTree(_)));
    }

    #[test]
    fn test_ignore_trees_leaves_scores_zero() {
        let mut parser = ByteParser::for_str("1 (S1 (NP (NN x)))\n-2 (S1 (NP (NN x)))\n");
        let options = ReadOptions::new().with_ignore_trees();
        let sentence = Sentence::read(&mut parser, &options).unwrap();
        assert!(sentence.gold().is_none());
        assert_eq!(sentence.gold_edge_count(), 0);
        assert_eq!(sentence.parse(0).logprob(), -2.0);
        assert_eq!(sentence.f_score(0), 0.0);
        assert_eq!(sentence.precrec(0), None);
    }

    #[test]
    fn test_precrec_recomputed_from_trees() {
        let data = "1 (S1 (S (NP (DT a) (NN b)) (VP (VB c))))\n-1 (S1 (S (NP (DT a)) (VP (NN b) (VB c))))\n";
        let mut parser = ByteParser::for_str(data);
        let sentence = Sentence::read(&mut parser, &ReadOptions::new()).unwrap();
        assert_eq!(sentence.precrec(0), Some(PrecRec::new(3, 3, 1)));
        assert_eq!(sentence.precrec(0), Some(sentence.counts(0)));
        assert_eq!(sentence.precrec(1), None);
    }

    #[test]
    fn test_clone_keeps_gold_after_original_dropped() {
        let mut parser = ByteParser::for_str("1 (S1 (NP (NN x)))\n-2 (S1 (NP (NN y)))\n");
        let original = Sentence::read(&mut parser, &ReadOptions::new()).unwrap();
        let copy = original.clone();
        drop(original);
        assert_eq!(copy.gold().unwrap().to_string(), "(S1 (NP (NN x)))");
        assert_eq!(copy.parse(0).tree().unwrap().words(), vec!["y"]);
    }
}

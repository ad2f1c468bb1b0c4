//! Corpus-wide statistics gathered in a single streaming pass.

use crate::nbest::{Sentence, SentenceVisitor};
use crate::scoring::PrecRec;
use std::fmt;

/// Summary statistics of an n-best corpus.
///
/// Used as a [SentenceVisitor], it accumulates while streaming and keeps no
/// sentence, so arbitrarily large corpora can be summarized.
///
/// * `first_parse` - bracket counts of the parse listed first for each
///   sentence, i.e. the first-stage parser's choice
/// * `oracle` - bracket counts of the best parse for each sentence
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorpusStats {
    nsentences: usize,
    nparses: usize,
    first_parse: PrecRec,
    oracle: PrecRec,
    sum_max_fscore: f64,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sentence.
    pub fn add(&mut self, sentence: &Sentence) {
        self.nsentences += 1;
        self.nparses += sentence.nparses();
        self.sum_max_fscore += f64::from(sentence.max_fscore());

        let gold = sentence.gold_edge_count();
        self.first_parse += if sentence.nparses() > 0 {
            sentence.counts(0)
        } else {
            PrecRec::new(gold, 0, 0)
        };
        self.oracle += match sentence.best_parse_index() {
            Some(best) => sentence.counts(best),
            None => PrecRec::new(gold, 0, 0),
        };
    }

    pub fn nsentences(&self) -> usize {
        self.nsentences
    }

    pub fn nparses(&self) -> usize {
        self.nparses
    }

    /// Average number of parses per sentence, 0 for an empty corpus.
    pub fn mean_parses(&self) -> f64 {
        if self.nsentences == 0 {
            0.0
        } else {
            self.nparses as f64 / self.nsentences as f64
        }
    }

    pub fn first_parse(&self) -> PrecRec {
        self.first_parse
    }

    pub fn oracle(&self) -> PrecRec {
        self.oracle
    }

    /// Average of the per-sentence maximal f-scores, 0 for an empty corpus.
    pub fn mean_max_fscore(&self) -> f64 {
        if self.nsentences == 0 {
            0.0
        } else {
            self.sum_max_fscore / self.nsentences as f64
        }
    }
}

impl SentenceVisitor for CorpusStats {
    fn on_sentence(&mut self, sentence: Sentence) {
        self.add(&sentence);
    }
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} sentences, {} parses ({:.2} per sentence)",
            self.nsentences,
            self.nparses,
            self.mean_parses()
        )?;
        writeln!(f, "first parse: {}", self.first_parse)?;
        write!(f, "oracle: {}", self.oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbest::ReadOptions;
    use crate::parser::ByteParser;

    #[test]
    fn test_stats_over_sentences() {
        let data = "1 (S1 (S (NP (NN a)) (VP (VB b))))\n\
                    -1 (S1 (NP (NN a) (VB b)))\n\
                    0 (S1 (NP (NN c)))\n";
        let mut parser = ByteParser::for_str(data);
        let mut stats = CorpusStats::new();
        for _ in 0..2 {
            stats.on_sentence(Sentence::read(&mut parser, &ReadOptions::new()).unwrap());
        }

        assert_eq!(stats.nsentences(), 2);
        assert_eq!(stats.nparses(), 1);
        assert!((stats.mean_parses() - 0.5).abs() < 1e-12);
        assert_eq!(stats.first_parse(), PrecRec::new(4, 1, 0));
        assert_eq!(stats.oracle(), PrecRec::new(4, 1, 0));
        assert_eq!(stats.mean_max_fscore(), 0.0);
    }

    #[test]
    fn test_oracle_picks_best_parse() {
        let data = "2 (S1 (S (NP (NN a)) (VP (VB b))))\n\
                    -1 (S1 (NP (NN a) (VB b)))\n\
                    -2 (S1 (S (NP (NN a)) (VP (VB b))))\n";
        let sentence = Sentence::read(&mut ByteParser::for_str(data), &ReadOptions::new()).unwrap();
        let mut stats = CorpusStats::new();
        stats.add(&sentence);

        assert_eq!(stats.first_parse(), PrecRec::new(3, 1, 0));
        assert_eq!(stats.oracle(), PrecRec::new(3, 3, 3));
        assert!((stats.mean_max_fscore() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_stats() {
        let stats = CorpusStats::new();
        assert_eq!(stats.mean_parses(), 0.0);
        assert_eq!(stats.mean_max_fscore(), 0.0);
        assert_eq!(
            stats.to_string(),
            "0 sentences, 0 parses (0.00 per sentence)\n\
             first parse: precision 0.0000, recall 0.0000, f-score 0.0000\n\
             oracle: precision 0.0000, recall 0.0000, f-score 0.0000"
        );
    }
}

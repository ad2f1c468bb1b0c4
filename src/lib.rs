//! Rerank-data is a library to read n-best parse re-ranking data and score
//! the candidate parses against their gold trees.
//!
//! The data is produced by a first-stage statistical parser: for each
//! sentence the gold-standard tree and a ranked list of candidate parses,
//! each with its log probability. Core functionality provided:
//! - Streaming reader: the format is read strictly front to back, straight
//!   from a decompressor process for `.bz2` and `.gz` files.
//! - Scoring: every candidate gets its labeled bracket (PARSEVAL) f-score
//!   against the gold tree; the best f-score per sentence is kept.
//! - Two reading modes: eager into a [Corpus], or lazy through a
//!   [SentenceVisitor] that sees one sentence at a time, for corpora of any size.
//! - Corpus statistics in one pass ([CorpusStats]): first-parse and oracle
//!   precision/recall.
//! - Configurability via [ReadOptions]: downcasing words, skipping trees,
//!   limiting line length; custom scorers via [BracketScorer](scoring::BracketScorer).
//!
//! # Usage patterns
//! 1. Quick functions with a file name, see [crate::nbest].
//! 2. [Corpus::read] or [Corpus::for_each_sentence] on your own
//!    [ByteParser](parser::ByteParser), e.g. over standard input.
//!
//! ## Example
//! ```no_run
//! use rerank_data::{read_nbest_file, ReadOptions};
//!
//! let corpus = read_nbest_file("dev.nbest.bz2", &ReadOptions::new().with_downcase())?;
//! for sentence in &corpus {
//!     println!("{} parses, best f-score {:.3}", sentence.nparses(), sentence.max_fscore());
//! }
//! # Ok::<(), rerank_data::nbest::CorpusError>(())
//! ```
//!
//! ## Example Streaming
//! ```no_run
//! use rerank_data::{for_each_nbest_sentence, ReadOptions, Sentence};
//!
//! let mut longest = 0;
//! let n = for_each_nbest_sentence(
//!     "train.nbest.gz",
//!     &mut |sentence: Sentence| longest = longest.max(sentence.nparses()),
//!     &ReadOptions::new().with_ignore_trees(),
//! )?;
//! println!("{n} sentences, at most {longest} parses each");
//! # Ok::<(), rerank_data::nbest::CorpusError>(())
//! ```

pub mod model;
pub mod nbest;
pub mod parser;
pub mod scoring;
pub mod treebank;

pub use crate::model::Tree;
pub use crate::nbest::{
    Corpus, CorpusError, CorpusStats, ParseRecord, ReadOptions, Sentence, SentenceError,
    SentenceVisitor,
};
pub use crate::parser::ParsingError;

use std::path::Path;

// ============================================================================
// Quick API
// ============================================================================
/// Reads a (possibly compressed) n-best file into a [Corpus].
///
/// See [`nbest::read_file`] for full documentation.
pub fn read_nbest_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Corpus, CorpusError> {
    nbest::read_file(path, options)
}

/// Streams a (possibly compressed) n-best file through a [SentenceVisitor],
/// returning the number of sentences.
///
/// See [`nbest::for_each_sentence_in_file`] for full documentation.
pub fn for_each_nbest_sentence<P, V>(path: P, visitor: &mut V, options: &ReadOptions) -> Result<usize, CorpusError>
where
    P: AsRef<Path>,
    V: SentenceVisitor + ?Sized,
{
    nbest::for_each_sentence_in_file(path, visitor, options)
}

/// Parses a single Penn Treebank bracketing.
///
/// See [`treebank::parse_tree`] for full documentation.
pub fn parse_tree<S: AsRef<str>>(text: S, downcase: bool) -> Result<Tree, ParsingError> {
    treebank::parse_tree(text, downcase)
}

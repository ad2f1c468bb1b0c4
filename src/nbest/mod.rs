//! Reader for n-best parse re-ranking data.
//!
//! An n-best file holds, for every sentence, the gold-standard tree and the
//! ranked candidate parses of a first-stage parser with their log
//! probabilities. While reading, each candidate is scored against the gold
//! tree (labeled bracket f-score) and the best f-score per sentence is kept.
//!
//! # Format
//! Whitespace separated ASCII, read strictly front to back:
//! ```text
//! <nsentences>
//! <nparses> <gold tree>            (repeated nsentences times)
//! <logprob> <candidate tree>       (repeated nparses times)
//! ```
//! Trees are Penn Treebank bracketings, each on the rest of its line.
//!
//! # Quick API
//! * [`read_file`] - reads a whole (possibly compressed) file into a [Corpus]
//! * [`for_each_sentence_in_file`] - streams a file through a [SentenceVisitor]
//! * [`stats_of_file`] - streams a file into [CorpusStats]
//!
//! # Full API
//! [Corpus], [Sentence] and [ParseRecord] read from any
//! [ByteParser](crate::parser::ByteParser), configured with [ReadOptions].

pub mod corpus;
pub mod options;
pub mod parse;
pub mod sentence;
pub mod stats;

pub use corpus::{Corpus, CorpusError, SentenceVisitor};
pub use options::ReadOptions;
pub use parse::ParseRecord;
pub use sentence::{Sentence, SentenceError};
pub use stats::CorpusStats;

use std::path::Path;

// ============================================================================
// QUICK READING API (pub)
// ============================================================================
/// Reads a whole n-best file into memory.
///
/// Files ending in `.bz2` or `.gz` are decompressed by `bzip2`/`gzip`
/// processes, everything else is read as is.
///
/// # Errors
/// [CorpusError] if the decompressor cannot be launched or the data is malformed.
///
/// # Example
/// ```no_run
/// use rerank_data::nbest::{read_file, ReadOptions};
///
/// let corpus = read_file("train.nbest.bz2", &ReadOptions::new())?;
/// println!("{} sentences, {} parses", corpus.nsentences(), corpus.nparses());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Corpus, CorpusError> {
    Corpus::from_file(path, options)
}

/// Streams an n-best file, handing each sentence to `visitor`.
///
/// See [Corpus::for_each_sentence_in_file].
///
/// # Errors
/// [CorpusError] if the decompressor cannot be launched or the data is malformed.
pub fn for_each_sentence_in_file<P, V>(
    path: P,
    visitor: &mut V,
    options: &ReadOptions,
) -> Result<usize, CorpusError>
where
    P: AsRef<Path>,
    V: SentenceVisitor + ?Sized,
{
    Corpus::for_each_sentence_in_file(path, visitor, options)
}

/// Computes [CorpusStats] of an n-best file in one pass, without keeping sentences.
///
/// # Errors
/// [CorpusError] if the decompressor cannot be launched or the data is malformed.
///
/// # Example
/// ```no_run
/// use rerank_data::nbest::{stats_of_file, ReadOptions};
///
/// let stats = stats_of_file("dev.nbest.gz", &ReadOptions::new())?;
/// println!("oracle f-score {:.4}", stats.oracle().f_score());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn stats_of_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<CorpusStats, CorpusError> {
    let mut stats = CorpusStats::new();
    Corpus::for_each_sentence_in_file(path, &mut stats, options)?;
    Ok(stats)
}

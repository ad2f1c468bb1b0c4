//! A corpus of n-best sentences and the streaming loop over it.

use crate::nbest::sentence::{Sentence, SentenceError};
use crate::nbest::{CorpusStats, ReadOptions};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::decompress::{DecompressedParser, ProcessLauncher, SystemLauncher, open_decompressed_with};
use crate::parser::parsing_error::ParsingError;
use crate::scoring::{BracketScorer, ParsevalScorer};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Upper bound on sentences reserved up front, whatever the header claims
const MAX_PREALLOCATED_SENTENCES: usize = 1 << 16;

// =#========================================================================#=
// CORPUS ERROR
// =#========================================================================$=
/// Failure while reading a corpus.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorpusError {
    /// The decompressor for the corpus file could not be launched.
    #[error("could not open corpus: {0}")]
    Open(#[source] ParsingError),

    #[error("failed to read number of sentences at start of corpus: {0}")]
    Header(#[source] ParsingError),

    #[error("reading sentence {index} failed: {source}")]
    Sentence {
        index: usize,
        #[source]
        source: SentenceError,
    },

    /// All sentences were read, but the decompressor failed, e.g. on a
    /// truncated archive.
    #[error("decompressor failed after {sentences_read} sentences: {source}")]
    Close {
        sentences_read: usize,
        #[source]
        source: ParsingError,
    },
}

impl CorpusError {
    /// Number of sentences completely read before the failure.
    pub fn sentences_read(&self) -> usize {
        match self {
            CorpusError::Open(_) | CorpusError::Header(_) => 0,
            CorpusError::Sentence { index, .. } => *index,
            CorpusError::Close { sentences_read, .. } => *sentences_read,
        }
    }
}

// =#========================================================================#=
// SENTENCE VISITOR
// =#========================================================================$=
/// Receives each sentence while streaming over a corpus.
///
/// Implemented for all closures taking a [Sentence].
pub trait SentenceVisitor {
    fn on_sentence(&mut self, sentence: Sentence);
}

impl<F: FnMut(Sentence)> SentenceVisitor for F {
    fn on_sentence(&mut self, sentence: Sentence) {
        self(sentence)
    }
}

// =#========================================================================#=
// CORPUS
// =#========================================================================$=
/// All sentences of an n-best data file, in order.
///
/// # Format
/// `<nsentences>` followed by `nsentences` [Sentence] records.
///
/// # Reading
/// * [`read`](Self::read) - reads everything into memory; on failure the
///   sentences read so far are kept
/// * [`for_each_sentence`](Self::for_each_sentence) - hands each sentence to a
///   [SentenceVisitor] instead of keeping it, for corpora of any size
/// * [`from_file`](Self::from_file) and
///   [`for_each_sentence_in_file`](Self::for_each_sentence_in_file) - the same
///   for (possibly compressed) files
///
/// # Example
/// ```
/// use rerank_data::nbest::{Corpus, ReadOptions};
/// use rerank_data::parser::ByteParser;
///
/// let data = "2\n\
///             1 (S1 (NP (NN a)))\n-1.0 (S1 (NP (NN a)))\n\
///             0 (S1 (NP (NN b)))\n";
/// let mut corpus = Corpus::new();
/// corpus.read(&mut ByteParser::for_str(data), &ReadOptions::new())?;
/// assert_eq!(corpus.nsentences(), 2);
/// assert_eq!(corpus.nparses(), 1);
/// # Ok::<(), rerank_data::nbest::CorpusError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    sentences: Vec<Sentence>,
}

// ============================================================================
// Construction & Reading (pub)
// ============================================================================
impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a corpus from any reader, e.g. standard input.
    ///
    /// # Errors
    /// [CorpusError] if any part of the corpus fails to read.
    pub fn from_reader<R: Read>(reader: R, options: &ReadOptions) -> Result<Self, CorpusError> {
        let mut corpus = Corpus::new();
        corpus.read(&mut ByteParser::from_reader(reader), options)?;
        Ok(corpus)
    }

    /// Reads a corpus file, decompressing `.bz2` and `.gz` files.
    ///
    /// On failure the sentences read so far are dropped; use
    /// [read_file](Self::read_file) to keep them.
    ///
    /// # Errors
    /// [CorpusError] if the decompressor cannot be launched or fails, or any
    /// part of the corpus fails to read.
    pub fn from_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self, CorpusError> {
        let mut corpus = Corpus::new();
        corpus.read_file(path, options)?;
        Ok(corpus)
    }

    /// Replaces the contents with the corpus file at `path`, decompressing
    /// `.bz2` and `.gz` files and scoring parses with the [ParsevalScorer].
    ///
    /// # Errors
    /// [CorpusError] for the first failure. As with [read](Self::read), the
    /// sentences read before it are kept.
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P, options: &ReadOptions) -> Result<(), CorpusError> {
        self.read_file_with(path, options, &SystemLauncher, &ParsevalScorer::default())
    }

    /// Like [read_file](Self::read_file), launching the decompressor with
    /// `launcher` and scoring with `scorer`.
    ///
    /// # Errors
    /// [CorpusError] for the first failure; sentences read before it are kept.
    pub fn read_file_with<P, L, S>(
        &mut self,
        path: P,
        options: &ReadOptions,
        launcher: &L,
        scorer: &S,
    ) -> Result<(), CorpusError>
    where
        P: AsRef<Path>,
        L: ProcessLauncher + ?Sized,
        S: BracketScorer + ?Sized,
    {
        let path = path.as_ref();
        self.sentences.clear();
        let mut parser = open_decompressed_with(path, launcher).map_err(CorpusError::Open)?;
        let result = self.read_with(&mut parser, options, scorer);
        let closed = close_stream(parser, path, result.is_ok());
        result?;
        closed.map_err(|source| CorpusError::Close {
            sentences_read: self.nsentences(),
            source,
        })
    }

    /// Replaces the contents with the corpus read from `parser`, scoring
    /// parses with the [ParsevalScorer].
    ///
    /// # Errors
    /// [CorpusError] for the first failure. Sentences read before it are
    /// kept, so `nsentences()` then tells how far reading got.
    pub fn read<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        options: &ReadOptions,
    ) -> Result<(), CorpusError> {
        self.read_with(parser, options, &ParsevalScorer::default())
    }

    /// Like [read](Self::read), scoring parses with the given scorer.
    ///
    /// # Errors
    /// [CorpusError] for the first failure; sentences read before it are kept.
    pub fn read_with<B, S>(
        &mut self,
        parser: &mut ByteParser<B>,
        options: &ReadOptions,
        scorer: &S,
    ) -> Result<(), CorpusError>
    where
        B: ByteSource,
        S: BracketScorer + ?Sized,
    {
        self.sentences.clear();
        let nsentences = read_sentence_count(parser)?;
        self.sentences.reserve(nsentences.min(MAX_PREALLOCATED_SENTENCES));

        for index in 0..nsentences {
            let sentence = read_sentence(parser, index, options, scorer)?;
            self.sentences.push(sentence);
        }

        Ok(())
    }
}

// ============================================================================
// Streaming (pub)
// ============================================================================
impl Corpus {
    /// Reads sentences one at a time and hands each to `visitor`, scoring
    /// parses with the [ParsevalScorer]. The caller keeps the parser.
    ///
    /// # Returns
    /// Number of sentences processed, i.e. the count from the header
    ///
    /// # Errors
    /// [CorpusError] for the first failure; the visitor has seen all
    /// sentences before it (see [CorpusError::sentences_read]).
    pub fn for_each_sentence<B, V>(
        parser: &mut ByteParser<B>,
        visitor: &mut V,
        options: &ReadOptions,
    ) -> Result<usize, CorpusError>
    where
        B: ByteSource,
        V: SentenceVisitor + ?Sized,
    {
        Self::for_each_sentence_with(parser, visitor, options, &ParsevalScorer::default())
    }

    /// Like [for_each_sentence](Self::for_each_sentence), scoring parses with
    /// the given scorer.
    ///
    /// # Errors
    /// [CorpusError] for the first failure.
    pub fn for_each_sentence_with<B, V, S>(
        parser: &mut ByteParser<B>,
        visitor: &mut V,
        options: &ReadOptions,
        scorer: &S,
    ) -> Result<usize, CorpusError>
    where
        B: ByteSource,
        V: SentenceVisitor + ?Sized,
        S: BracketScorer + ?Sized,
    {
        let nsentences = read_sentence_count(parser)?;
        for index in 0..nsentences {
            let sentence = read_sentence(parser, index, options, scorer)?;
            visitor.on_sentence(sentence);
        }
        Ok(nsentences)
    }

    /// Opens a (possibly compressed) corpus file and hands each sentence to
    /// `visitor`. The decompressor is always shut down before returning; if
    /// everything was read, its failure is reported as [CorpusError::Close].
    ///
    /// # Errors
    /// [CorpusError] if the decompressor cannot be launched or for the first
    /// read failure.
    pub fn for_each_sentence_in_file<P, V>(
        path: P,
        visitor: &mut V,
        options: &ReadOptions,
    ) -> Result<usize, CorpusError>
    where
        P: AsRef<Path>,
        V: SentenceVisitor + ?Sized,
    {
        Self::for_each_sentence_in_file_with(
            path,
            visitor,
            options,
            &SystemLauncher,
            &ParsevalScorer::default(),
        )
    }

    /// Like [for_each_sentence_in_file](Self::for_each_sentence_in_file),
    /// launching the decompressor with `launcher` and scoring with `scorer`.
    ///
    /// # Errors
    /// [CorpusError] if the decompressor cannot be launched or for the first
    /// read failure.
    pub fn for_each_sentence_in_file_with<P, V, L, S>(
        path: P,
        visitor: &mut V,
        options: &ReadOptions,
        launcher: &L,
        scorer: &S,
    ) -> Result<usize, CorpusError>
    where
        P: AsRef<Path>,
        V: SentenceVisitor + ?Sized,
        L: ProcessLauncher + ?Sized,
        S: BracketScorer + ?Sized,
    {
        let path = path.as_ref();
        let mut parser = open_decompressed_with(path, launcher).map_err(CorpusError::Open)?;
        let result = Self::for_each_sentence_with(&mut parser, visitor, options, scorer);
        let closed = close_stream(parser, path, result.is_ok());
        let nsentences = result?;
        closed.map_err(|source| CorpusError::Close {
            sentences_read: nsentences,
            source,
        })?;
        Ok(nsentences)
    }
}

// ============================================================================
// Accessors (pub)
// ============================================================================
impl Corpus {
    pub fn nsentences(&self) -> usize {
        self.sentences.len()
    }

    /// Total number of parses over all sentences.
    pub fn nparses(&self) -> usize {
        self.sentences.iter().map(Sentence::nparses).sum()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Returns sentence `i`.
    ///
    /// # Panics
    /// Panics if `i >= nsentences()`.
    pub fn sentence(&self, i: usize) -> &Sentence {
        &self.sentences[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    /// Summary statistics over all sentences.
    pub fn stats(&self) -> CorpusStats {
        let mut stats = CorpusStats::new();
        for sentence in &self.sentences {
            stats.add(sentence);
        }
        stats
    }

    /// Consumes the corpus and returns its sentences.
    pub fn into_sentences(self) -> Vec<Sentence> {
        self.sentences
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

// ============================================================================
// Helpers
// ============================================================================
fn read_sentence_count<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<usize, CorpusError> {
    let nsentences = parser.read_uint().map_err(|err| {
        tracing::warn!(error = %err, "failed to read number of sentences at start of corpus");
        CorpusError::Header(err)
    })?;
    tracing::debug!(nsentences, "reading corpus");
    Ok(nsentences)
}

fn read_sentence<B, S>(
    parser: &mut ByteParser<B>,
    index: usize,
    options: &ReadOptions,
    scorer: &S,
) -> Result<Sentence, CorpusError>
where
    B: ByteSource,
    S: BracketScorer + ?Sized,
{
    Sentence::read_with(parser, options, scorer).map_err(|source| {
        tracing::warn!(sentence = index, error = %source, "reading sentence failed");
        CorpusError::Sentence { index, source }
    })
}

/// Shuts the decompressor down. After a successful read the rest of the
/// stream is drained first and a failing decompressor is an error; after a
/// failed read it is only logged.
fn close_stream(parser: DecompressedParser, path: &Path, read_ok: bool) -> Result<(), ParsingError> {
    if read_ok {
        parser.finish().map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "decompressor failed");
            ParsingError::from(err)
        })
    } else {
        if let Err(err) = parser.close() {
            tracing::debug!(path = %path.display(), error = %err, "decompressor did not exit cleanly");
        }
        Ok(())
    }
}

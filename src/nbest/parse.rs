//! A single ranked candidate parse.

use crate::model::Tree;
use crate::nbest::ReadOptions;
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::scoring::{EdgeCounts, f_score};
use crate::treebank::parse_tree;

// =#========================================================================#=
// PARSE RECORD
// =#========================================================================$=
/// One candidate parse of a sentence: its log probability under the
/// first-stage parser, its tree, and how it scores against the gold tree.
///
/// The record owns its tree; cloning the record clones the tree.
/// Scores stay 0 until the owning [Sentence](crate::nbest::Sentence) scores
/// the parse, since that needs the gold tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseRecord {
    logprob: f64,
    tree: Option<Tree>,
    edge_count: usize,
    correct_edge_count: usize,
    f_score: f32,
}

impl ParseRecord {
    /// Creates an unscored parse record.
    pub fn new(logprob: f64, tree: Option<Tree>) -> Self {
        ParseRecord {
            logprob,
            tree,
            ..Default::default()
        }
    }

    /// Reads `<logprob> <tree>` from the parser.
    ///
    /// With [ignore_trees](ReadOptions::ignore_trees) the tree text is skipped.
    ///
    /// # Errors
    /// [ParsingError] if the log probability does not scan, the tree line is
    /// missing or too long, or the tree is malformed.
    pub fn read<B: ByteSource>(
        parser: &mut ByteParser<B>,
        options: &ReadOptions,
    ) -> Result<Self, ParsingError> {
        let logprob = parser.read_float()?;
        parser.skip_whitespace();
        let tree = read_tree_line(parser, options)?;
        Ok(Self::new(logprob, tree))
    }

    /// Stores the comparison against a gold tree with `gold_edge_count` edges.
    pub(crate) fn set_score(&mut self, gold_edge_count: usize, counts: EdgeCounts) {
        self.edge_count = counts.candidate;
        self.correct_edge_count = counts.common;
        self.f_score = f_score(counts.common, counts.candidate, gold_edge_count);
    }

    /// Log probability assigned by the first-stage parser.
    pub fn logprob(&self) -> f64 {
        self.logprob
    }

    /// The parse tree, `None` if trees were ignored while reading.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Number of labeled brackets in this parse.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of labeled brackets shared with the gold tree.
    pub fn correct_edge_count(&self) -> usize {
        self.correct_edge_count
    }

    pub fn f_score(&self) -> f32 {
        self.f_score
    }
}

/// Reads the rest of the current line as a tree, or skips it if trees are ignored.
///
/// Errors point into the enclosing stream.
pub(crate) fn read_tree_line<B: ByteSource>(
    parser: &mut ByteParser<B>,
    options: &ReadOptions,
) -> Result<Option<Tree>, ParsingError> {
    if options.ignore_trees() {
        parser.skip_line();
        return Ok(None);
    }

    let start = parser.position();
    let line = parser.read_line(options.max_line_len())?;
    parse_tree(&line, options.downcase())
        .map(Some)
        .map_err(|err| err.offset_by(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;

    #[test]
    fn test_read_parse() {
        let mut parser = ByteParser::for_str("-42.125 (S1 (NP (NN Dog)))\nrest");
        let parse = ParseRecord::read(&mut parser, &ReadOptions::new()).unwrap();
        assert_eq!(parse.logprob(), -42.125);
        assert_eq!(parse.tree().unwrap().words(), vec!["Dog"]);
        assert_eq!(parse.f_score(), 0.0);
        assert_eq!(parse.edge_count(), 0);
        assert_eq!(parser.read_token(), "rest");
    }

    #[test]
    fn test_read_parse_downcased() {
        let mut parser = ByteParser::for_str("-1 (S1 (NP (NN Dog)))\n");
        let parse = ParseRecord::read(&mut parser, &ReadOptions::new().with_downcase()).unwrap();
        assert_eq!(parse.tree().unwrap().words(), vec!["dog"]);
    }

    #[test]
    fn test_read_parse_ignoring_tree() {
        let mut parser = ByteParser::for_str("-3.5 (S1 (NP (NN dog)\n-4 next");
        let parse = ParseRecord::read(&mut parser, &ReadOptions::new().with_ignore_trees()).unwrap();
        assert_eq!(parse.logprob(), -3.5);
        assert!(parse.tree().is_none());
        assert_eq!(parser.read_float().unwrap(), -4.0);
    }

    #[test]
    fn test_bad_logprob() {
        let mut parser = ByteParser::for_str("(S1 (NN x))\n");
        let err = ParseRecord::read(&mut parser, &ReadOptions::new()).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidNumber(_)));
    }

    #[test]
    fn test_tree_error_points_into_stream() {
        let mut parser = ByteParser::for_str("-1 (S1 (NN x)))\n");
        let err = ParseRecord::read(&mut parser, &ReadOptions::new()).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidTree(_)));
        assert_eq!(err.position(), 3 + 11);
    }

    #[test]
    fn test_missing_tree_is_eof() {
        let mut parser = ByteParser::for_str("-1.0");
        let err = ParseRecord::read(&mut parser, &ReadOptions::new()).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
    }

    #[test]
    fn test_set_score() {
        let mut parse = ParseRecord::new(-1.0, None);
        parse.set_score(10, EdgeCounts { candidate: 8, common: 6 });
        assert_eq!(parse.edge_count(), 8);
        assert_eq!(parse.correct_edge_count(), 6);
        assert!((parse.f_score() - 0.6667).abs() < 1e-4);
    }
}

//! Penn Treebank bracketing parser.
//!
//! This module provides [TreebankParser] to parse bracketed constituency
//! trees such as `(S1 (S (NP (PRP I)) (VP (VBD ran)) (. .)))`, the format
//! used for both gold trees and candidate parses in n-best files.
//!
//! # Quick API
//! * [`parse_tree`] - parses a single tree from a string

pub mod parser;

pub use parser::TreebankParser;

use crate::model::Tree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;

/// Parses a single bracketed tree, optionally lower-casing its words.
///
/// # Errors
/// [ParsingError] with kind `InvalidTree` or `UnexpectedEOF` if the text is
/// not a single well-formed bracketing. The error position is relative to
/// the start of `text`.
///
/// # Example
/// ```
/// use rerank_data::treebank::parse_tree;
///
/// let tree = parse_tree("(S1 (FRAG (UH Hello) (. !)))", false)?;
/// assert_eq!(tree.words(), vec!["Hello", "!"]);
/// # Ok::<(), rerank_data::parser::ParsingError>(())
/// ```
pub fn parse_tree<S: AsRef<str>>(text: S, downcase: bool) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(text.as_ref());
    let mut treebank_parser = TreebankParser::new();
    treebank_parser.set_downcase(downcase);
    treebank_parser.parse_tree(&mut byte_parser)
}

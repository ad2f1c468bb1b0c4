//! Error types for the n-best reader and the treebank parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading the token stream.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================€=
/// Error types that can occur while reading n-best data.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    /// The underlying stream failed.
    #[error("IO error - {0}")]
    IoError(String),

    /// The stream ended where more input was required.
    #[error("Unexpected end of file")]
    UnexpectedEOF,

    /// A count or score token did not scan as a number.
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    /// Bracketed tree text is malformed.
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// A line is longer than the configured maximum.
    #[error("Line exceeds maximum length of {limit} bytes")]
    LineTooLong { limit: usize },

    /// The external decompressor could not be started.
    #[error("Could not launch decompressor - {0}")]
    DecompressorUnavailable(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and upcoming bytes).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &mut ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEOF.
    ///
    /// If the source stopped because of an I/O failure rather than a
    /// proper end of stream, that failure is reported instead.
    pub fn unexpected_eof<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        match parser.take_io_error() {
            Some(err) => Self::from_parser(ParsingErrorType::IoError(err.to_string()), parser),
            None => Self::from_parser(ParsingErrorType::UnexpectedEOF, parser),
        }
    }

    /// Convenience constructor for InvalidNumber
    pub fn invalid_number<S: ByteSource>(parser: &mut ByteParser<S>, token: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNumber(token), parser)
    }

    /// Convenience constructor for InvalidTree
    pub fn invalid_tree<S: ByteSource>(parser: &mut ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidTree(msg), parser)
    }

    /// Convenience constructor for LineTooLong
    pub fn line_too_long<S: ByteSource>(parser: &mut ByteParser<S>, limit: usize) -> Self {
        Self::from_parser(ParsingErrorType::LineTooLong { limit }, parser)
    }

    /// Create a ParsingError without parser context (e.g. for process errors)
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the upcoming input captured when the error occurred
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Shifts the position by `offset`.
    ///
    /// Used when a line was parsed on its own and the error should point
    /// into the enclosing stream.
    pub(crate) fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        Self::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}

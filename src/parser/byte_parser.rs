//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for reading text-based data with support
//! for peeking, consuming and reading whitespace-delimited numbers and whole
//! lines. Used as the foundation for both the n-best record reader and the
//! treebank parser.

use crate::parser::byte_source::{BufferedByteSource, ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Longest token scanned as a number; longer ones are invalid without being stored
const MAX_NUMBER_TOKEN_LEN: usize = 512;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for ASCII text with support for peeking, consuming
/// and token reading.
///
/// # Features
/// - Works with any [ByteSource] (in-memory or buffered stream)
/// - Whitespace skipping
/// - Reading unsigned integers and floats as whitespace-delimited tokens
/// - Reading whole lines into a growing buffer, optionally bounded
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use rerank_data::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("2\n-31.5 (S1 (NN x))\n");
/// assert_eq!(parser.read_uint().unwrap(), 2);
/// assert_eq!(parser.read_float().unwrap(), -31.5);
/// parser.skip_whitespace();
/// assert_eq!(parser.read_line(None).unwrap(), "(S1 (NN x))");
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    pub fn from_bytes(input: &[u8]) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.to_vec()))
    }

    /// Creates a new `ByteParser` from a str by copying it into a Vec.
    pub fn for_str(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }
}

impl<R: Read> ByteParser<BufferedByteSource<R>> {
    /// Creates a new `ByteParser` streaming from any reader.
    pub fn from_reader(reader: R) -> Self {
        Self::new(BufferedByteSource::new(reader))
    }
}

impl ByteParser<BufferedByteSource<File>> {
    /// Creates a new `ByteParser` streaming an uncompressed file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file_buffered<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Consumes the parser and returns its byte source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Checks if the current byte is the given byte.
    pub fn peek_is(&mut self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Token reading
    // ------------------------------------------------------------------------

    /// Reads the next whitespace-delimited token, skipping leading whitespace.
    ///
    /// # Returns
    /// The token, which is empty only if EOF was reached first
    pub fn read_token(&mut self) -> String {
        self.read_bounded_token(usize::MAX).0
    }

    /// Reads the next token, keeping at most `limit` bytes of it.
    ///
    /// The whole token is consumed either way; the flag tells whether bytes
    /// were dropped.
    fn read_bounded_token(&mut self, limit: usize) -> (String, bool) {
        self.skip_whitespace();
        let mut token = String::new();
        let mut truncated = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                break;
            }
            if token.len() < limit {
                token.push(b as char);
            } else {
                truncated = true;
            }
            self.next_byte();
        }
        (token, truncated)
    }

    /// Reads a token to be scanned as a number.
    fn read_number_token(&mut self) -> Result<String, ParsingError> {
        let (token, truncated) = self.read_bounded_token(MAX_NUMBER_TOKEN_LEN);
        if token.is_empty() {
            return Err(ParsingError::unexpected_eof(self));
        }
        if truncated {
            return Err(ParsingError::invalid_number(self, format!("{token}...")));
        }
        Ok(token)
    }

    /// Reads an unsigned integer token, skipping leading whitespace.
    ///
    /// # Errors
    /// * `UnexpectedEOF` (or `IoError`) - if no token is left
    /// * `InvalidNumber` - if the token is not an unsigned integer
    pub fn read_uint(&mut self) -> Result<usize, ParsingError> {
        let token = self.read_number_token()?;
        token
            .parse::<usize>()
            .map_err(|_| ParsingError::invalid_number(self, token))
    }

    /// Reads a floating point token, skipping leading whitespace.
    ///
    /// # Errors
    /// * `UnexpectedEOF` (or `IoError`) - if no token is left
    /// * `InvalidNumber` - if the token is not a float
    pub fn read_float(&mut self) -> Result<f64, ParsingError> {
        let token = self.read_number_token()?;
        token
            .parse::<f64>()
            .map_err(|_| ParsingError::invalid_number(self, token))
    }

    /// Reads the rest of the current line.
    ///
    /// The line break is consumed but not returned, a trailing `\r` is dropped.
    /// The buffer grows as needed; if `max_len` is given, a longer line is an
    /// error rather than being cut short.
    ///
    /// # Errors
    /// * `UnexpectedEOF` (or `IoError`) - if the stream is already exhausted
    /// * `LineTooLong` - if the line exceeds `max_len` bytes
    pub fn read_line(&mut self, max_len: Option<usize>) -> Result<String, ParsingError> {
        if self.is_eof() {
            return Err(ParsingError::unexpected_eof(self));
        }

        let mut line = Vec::new();
        while let Some(b) = self.next_byte() {
            if b == b'\n' {
                break;
            }
            // One byte of slack for a `\r` that is dropped below
            match max_len {
                Some(limit) if line.len() > limit => {
                    return Err(ParsingError::line_too_long(self, limit));
                }
                _ => {}
            }
            line.push(b);
        }
        if let Some(err) = self.take_io_error() {
            return Err(err.into());
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }
        match max_len {
            Some(limit) if line.len() > limit => Err(ParsingError::line_too_long(self, limit)),
            _ => Ok(String::from_utf8_lossy(&line).into_owned()),
        }
    }

    /// Skips the rest of the current line including the line break.
    ///
    /// # Returns
    /// `true` if a line break was found, `false` if EOF was reached first
    pub fn skip_line(&mut self) -> bool {
        while let Some(b) = self.next_byte() {
            if b == b'\n' {
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&mut self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Takes the I/O error the source ran into, if any.
    pub fn take_io_error(&mut self) -> Option<std::io::Error> {
        self.source.take_io_error()
    }

    /// Returns up to `k` bytes from the current position for error context.
    pub fn get_context(&mut self, k: usize) -> Vec<u8> {
        self.source.get_context(k)
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&mut self, k: usize) -> String {
        let context_bytes = self.get_context(k);
        String::from_utf8_lossy(&context_bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;

    #[test]
    fn test_read_line_without_limit_grows() {
        let long = "x".repeat(10_000);
        let mut parser = ByteParser::for_str(&format!("{long}\nnext"));
        assert_eq!(parser.read_line(None).unwrap(), long);
        assert_eq!(parser.read_line(None).unwrap(), "next");
        assert_eq!(
            parser.read_line(None).unwrap_err().kind(),
            &ParsingErrorType::UnexpectedEOF
        );
    }

    #[test]
    fn test_read_line_at_limit_is_fine() {
        let mut parser = ByteParser::for_str("abcd\r\nabcd\nabcd");
        assert_eq!(parser.read_line(Some(4)).unwrap(), "abcd");
        assert_eq!(parser.read_line(Some(4)).unwrap(), "abcd");
        assert_eq!(parser.read_line(Some(4)).unwrap(), "abcd");
    }

    #[test]
    fn test_read_line_one_over_limit_fails() {
        let mut parser = ByteParser::for_str("abcde\r\n");
        let err = parser.read_line(Some(4)).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::LineTooLong { limit: 4 });
    }

    #[test]
    fn test_read_line_over_limit_fails() {
        let mut parser = ByteParser::for_str("abcdef\n");
        let err = parser.read_line(Some(4)).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::LineTooLong { limit: 4 });
    }

    #[test]
    fn test_read_token_stops_at_whitespace() {
        let mut parser = ByteParser::for_str("  12\t-3.5e2\n");
        assert_eq!(parser.read_token(), "12");
        assert_eq!(parser.read_token(), "-3.5e2");
        assert_eq!(parser.read_token(), "");
    }

    #[test]
    fn test_skip_line() {
        let mut parser = ByteParser::for_str("skip (me)
7");
        assert!(parser.skip_line());
        assert_eq!(parser.position(), 10);
        assert_eq!(parser.read_uint().unwrap(), 7);
        assert!(!parser.skip_line());
    }

    #[test]
    fn test_overlong_number_token_is_invalid() {
        let digits = "1".repeat(100_000);
        let mut parser = ByteParser::for_str(&format!("{digits} 2.5"));
        match parser.read_float().unwrap_err().kind() {
            ParsingErrorType::InvalidNumber(token) => assert_eq!(token.len(), MAX_NUMBER_TOKEN_LEN + 3),
            other => panic!("unexpected error kind {other:?}"),
        }
        assert_eq!(parser.read_float().unwrap(), 2.5);
    }
}

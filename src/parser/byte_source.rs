//! Byte source abstractions for parser.
//!
//! This module provides the [ByteSource] trait and implementations for different
//! ways of accessing byte data during parser. Supports in-memory sources
//! ([InMemoryByteSource]) and buffered streams ([BufferedByteSource]), e.g.
//! the standard output of a decompressor process.

use std::io::{BufRead, BufReader, Read};

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================#=
/// Trait defining the interface for different byte sources used by ByteParser.
///
/// This trait abstracts over different ways of accessing byte data:
/// - In-memory byte vectors
/// - Buffered reading from any [Read] (files, pipes)
///
/// Sources are forward-only. The n-best format is strictly sequential,
/// so no seeking is offered, which is what allows reading from a pipe.
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF) or the stream failed
    fn peek(&mut self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF) or the stream failed
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns a slice of up to `k` bytes from the current position without consuming.
    ///
    /// Buffered sources may return fewer than `k` bytes even before EOF,
    /// namely when the buffer ends earlier.
    fn peek_slice(&mut self, k: usize) -> &[u8];

    /// Returns up to `k` bytes from the current position for error context.
    fn get_context(&mut self, k: usize) -> Vec<u8> {
        self.peek_slice(k).to_vec()
    }

    /// Returns the current position (bytes consumed so far).
    fn position(&self) -> usize;

    /// Check if at end of data.
    fn is_eof(&mut self) -> bool;

    /// Takes the last I/O error the source ran into, if any.
    ///
    /// Since [peek](Self::peek) and [next_byte](Self::next_byte) report a
    /// failing stream like EOF, callers use this to tell the two apart.
    fn take_io_error(&mut self) -> Option<std::io::Error> {
        None
    }
}

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================$=
/// An in-memory byte source that owns its data.
pub struct InMemoryByteSource {
    /// The owned byte data being parsed
    input: Vec<u8>,
    /// Current position in the byte vector
    pos: usize,
}

impl InMemoryByteSource {
    /// Creates a new in-memory byte source from a Vec of bytes.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            input: bytes,
            pos: 0,
        }
    }
}

impl ByteSource for InMemoryByteSource {
    #[inline(always)]
    fn peek(&mut self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    #[inline(always)]
    fn peek_slice(&mut self, k: usize) -> &[u8] {
        let end = (self.pos + k).min(self.input.len());
        &self.input[self.pos..end]
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    fn is_eof(&mut self) -> bool {
        self.pos >= self.input.len()
    }
}

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================$=
/// A buffered byte source for streaming input of unknown size.
///
/// Wraps the reader in a [BufReader], so it works for files as well as for
/// pipes, which is how decompressed input arrives.
pub struct BufferedByteSource<R: Read> {
    /// Underlying reader, handles getting chunks from the stream
    reader: BufReader<R>,

    /// Current absolute position in the stream
    pos: usize,

    /// Error encountered while filling the buffer, kept until taken
    io_error: Option<std::io::Error>,
}

impl<R: Read> BufferedByteSource<R> {
    /// Default capacity of the read buffer.
    const BUFFER_CAPACITY: usize = 64 * 1024;

    /// Creates a new buffered byte source reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(Self::BUFFER_CAPACITY, reader),
            pos: 0,
            io_error: None,
        }
    }

    /// Consumes the source and returns the underlying reader.
    ///
    /// Any bytes still buffered are lost.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn fill(&mut self) -> &[u8] {
        loop {
            match self.reader.fill_buf() {
                Ok(_) => break,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.io_error = Some(err);
                    return &[];
                }
            }
        }
        self.reader.buffer()
    }
}

impl<R: Read> ByteSource for BufferedByteSource<R> {
    fn peek(&mut self) -> Option<u8> {
        self.fill().first().copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.reader.consume(1);
        self.pos += 1;
        Some(byte)
    }

    fn peek_slice(&mut self, k: usize) -> &[u8] {
        let buf = self.fill();
        &buf[..k.min(buf.len())]
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_eof(&mut self) -> bool {
        self.fill().is_empty()
    }

    fn take_io_error(&mut self) -> Option<std::io::Error> {
        self.io_error.take()
    }
}

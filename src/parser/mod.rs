//! Basic low-level byte parser functionality.
//!
//! Provides the streaming [ByteParser] with its token reader, the byte
//! sources it reads from, decompressed input via external processes, and
//! the [ParsingError] type used throughout the crate.

pub mod byte_parser;
pub mod byte_source;
pub mod decompress;
pub mod parsing_error;

pub use byte_parser::ByteParser;
pub use decompress::{open_decompressed, DecompressedParser, Decompressor};
pub use parsing_error::{ParsingError, ParsingErrorType};

//! Decompressed input streams, delegated to an external process.
//!
//! The decompressor is chosen by file suffix (compared case-insensitively):
//! - `.bz2` → `bzip2 -dc <file>`
//! - `.gz` → `gzip -dc <file>`
//! - anything else → `cat <file>`
//!
//! The process is spawned once by [open_decompressed] and reaped exactly once,
//! either by [ByteParser::close] or, on any early exit, when the stream is dropped.
//! Process creation goes through a [ProcessLauncher], so it can be replaced.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::BufferedByteSource;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Byte parser over the output of a decompressor process.
pub type DecompressedParser = ByteParser<BufferedByteSource<DecompressedStream>>;

// =#========================================================================#=
// DECOMPRESSOR
// =#========================================================================$=
/// External decompressor selected for a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decompressor {
    /// `bzip2 -dc`
    Bzip2,
    /// `gzip -dc`
    Gzip,
    /// `cat`, for uncompressed files
    Passthrough,
}

impl Decompressor {
    /// Selects the decompressor from the (case-insensitive) file suffix.
    ///
    /// # Example
    /// ```
    /// use rerank_data::parser::decompress::Decompressor;
    ///
    /// assert_eq!(Decompressor::for_path("train.nbest.BZ2"), Decompressor::Bzip2);
    /// assert_eq!(Decompressor::for_path("dev.gz"), Decompressor::Gzip);
    /// assert_eq!(Decompressor::for_path("test.txt"), Decompressor::Passthrough);
    /// ```
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Decompressor::Bzip2,
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Decompressor::Gzip,
            _ => Decompressor::Passthrough,
        }
    }

    /// Program to run.
    pub fn program(&self) -> &'static str {
        match self {
            Decompressor::Bzip2 => "bzip2",
            Decompressor::Gzip => "gzip",
            Decompressor::Passthrough => "cat",
        }
    }

    /// Arguments passed before the file name.
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            Decompressor::Bzip2 | Decompressor::Gzip => &["-dc"],
            Decompressor::Passthrough => &[],
        }
    }
}

// =#========================================================================#=
// PROCESS LAUNCHING
// =#========================================================================$=
/// Readable output of a launched process.
pub trait ProcessStream: Read {
    /// Stops reading and waits for the process to exit.
    ///
    /// Called at most once per stream.
    ///
    /// # Errors
    /// If waiting fails or the process reports failure.
    fn close(&mut self) -> io::Result<()>;
}

/// Starts the process producing a decompressed stream.
pub trait ProcessLauncher {
    /// Launches `program` with `args` followed by `path`, returning its output.
    fn launch(
        &self,
        program: &str,
        args: &[&str],
        path: &Path,
    ) -> io::Result<Box<dyn ProcessStream>>;
}

/// Launches real operating system processes with piped standard output.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(
        &self,
        program: &str,
        args: &[&str],
        path: &Path,
    ) -> io::Result<Box<dyn ProcessStream>> {
        let mut child = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()?;

        match child.stdout.take() {
            Some(stdout) => Ok(Box::new(ChildStream {
                program: program.to_string(),
                child,
                stdout: Some(stdout),
            })),
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(io::Error::other(format!("{program} has no standard output")))
            }
        }
    }
}

/// Standard output of a child process; the child is reaped on close.
struct ChildStream {
    program: String,
    child: Child,
    stdout: Option<ChildStdout>,
}

impl Read for ChildStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stdout.as_mut() {
            Some(stdout) => stdout.read(buf),
            None => Ok(0),
        }
    }
}

impl ProcessStream for ChildStream {
    fn close(&mut self) -> io::Result<()> {
        // Closing the pipe first lets a writer that is still busy terminate
        self.stdout = None;
        let status = self.child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {status}", self.program)))
        }
    }
}

// =#========================================================================#=
// DECOMPRESSED STREAM
// =#========================================================================$=
/// Decompressed byte stream of a file; owns the decompressor process.
///
/// Dropping the stream without calling [close](Self::close) still reaps the
/// process, discarding its exit status.
pub struct DecompressedStream {
    decompressor: Decompressor,
    inner: Box<dyn ProcessStream>,
    closed: bool,
}

impl DecompressedStream {
    /// The decompressor producing this stream.
    pub fn decompressor(&self) -> Decompressor {
        self.decompressor
    }

    /// Closes the stream and waits for the decompressor to exit.
    pub fn close(mut self) -> io::Result<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl Read for DecompressedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for DecompressedStream {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(err) = self.inner.close() {
                tracing::debug!(error = %err, "decompressor closed early");
            }
        }
    }
}

impl ByteParser<BufferedByteSource<DecompressedStream>> {
    /// Closes the underlying decompressed stream, reaping its process.
    pub fn close(self) -> io::Result<()> {
        self.into_source().into_inner().close()
    }

    /// Reads the rest of the stream, then closes it.
    ///
    /// Unlike [close](Self::close), the decompressor gets to see the whole
    /// file, so a truncated or corrupt archive shows up as an error even if
    /// the data read so far was complete.
    pub fn finish(self) -> io::Result<()> {
        let mut stream = self.into_source().into_inner();
        io::copy(&mut stream, &mut io::sink())?;
        stream.close()
    }
}

// =#========================================================================#=
// OPENING
// =#========================================================================$=
/// Opens `path` through the decompressor matching its suffix.
///
/// # Errors
/// `DecompressorUnavailable` if the process cannot be launched.
pub fn open_decompressed<P: AsRef<Path>>(path: P) -> Result<DecompressedParser, ParsingError> {
    open_decompressed_with(path, &SystemLauncher)
}

/// Opens `path` through the decompressor matching its suffix, launching it
/// with the given [ProcessLauncher].
///
/// # Errors
/// `DecompressorUnavailable` if the process cannot be launched.
pub fn open_decompressed_with<P, L>(path: P, launcher: &L) -> Result<DecompressedParser, ParsingError>
where
    P: AsRef<Path>,
    L: ProcessLauncher + ?Sized,
{
    let path = path.as_ref();
    let decompressor = Decompressor::for_path(path);
    let program = decompressor.program();
    tracing::debug!(program, path = %path.display(), "launching decompressor");

    let inner = launcher
        .launch(program, decompressor.args(), path)
        .map_err(|err| {
            tracing::error!(program, path = %path.display(), error = %err, "could not launch decompressor");
            ParsingError::without_context(ParsingErrorType::DecompressorUnavailable(format!(
                "{program} for {}: {err}",
                path.display()
            )))
        })?;

    let stream = DecompressedStream {
        decompressor,
        inner,
        closed: false,
    };
    Ok(ByteParser::from_reader(stream))
}

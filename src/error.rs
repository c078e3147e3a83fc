use std::path::PathBuf;

use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can
/// potentially return.
///
/// This enum covers all failure modes of producing a MAT-file: configuration
/// rejected before any I/O happens, the output path refusing to open, the fixed
/// preamble coming out at the wrong size, and stream faults while encoding
/// elements. Each variant carries enough context for the caller to report a
/// useful message and abort the export.
///
/// # Error Categories
///
/// ## Configuration Errors
/// - [`Error::DimensionBits`] - the configured dimension-index width exceeds what
///   the format can address; detected before any file is created
///
/// ## File Errors
/// - [`Error::Create`] - the output path could not be opened for writing
/// - [`Error::Header`] - the fixed 128-byte preamble did not total 128 bytes
/// - [`Error::Io`] - an underlying stream fault during element writes
///
/// # Examples
///
/// ```rust,no_run
/// use matstream::{Error, MatWriter, WriterConfig};
///
/// match MatWriter::create("vectors.mat", &WriterConfig::new(32)) {
///     Ok(_) => println!("writer open"),
///     Err(Error::DimensionBits { bits }) => {
///         eprintln!("{bits} bits of dimension index cannot be represented");
///     }
///     Err(Error::Create { path, source }) => {
///         eprintln!("cannot open {}: {source}", path.display());
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The configured dimension-index width exceeds 31 bits.
    ///
    /// Sparse array dimensions are stored as signed 32-bit integers in the
    /// container, so an index space wider than 31 bits would overflow the sign.
    /// This is rejected before any file is created.
    #[error("the format cannot hold vectors with more than 31 index bits (configured: {bits})")]
    DimensionBits {
        /// The rejected width from the configuration
        bits: u32,
    },

    /// The output file could not be opened for writing.
    ///
    /// Wraps the underlying filesystem error together with the path that was
    /// attempted, so the caller can report which target failed.
    #[error("could not open output file '{}' for writing: {}", path.display(), source)]
    Create {
        /// The path that could not be opened
        path: PathBuf,
        /// The originating filesystem error
        source: std::io::Error,
    },

    /// The fixed file preamble did not come out at exactly 128 bytes.
    ///
    /// The header is 124 bytes of descriptive text followed by a 2-byte version
    /// marker and a 2-byte endianness marker. The byte count is asserted right
    /// after writing it; any other total means the file would be unreadable.
    #[error("could not write header to output file '{}' ({} of 128 bytes)", path.display(), written)]
    Header {
        /// The output path the header was written to
        path: PathBuf,
        /// The number of bytes actually written
        written: usize,
    },

    /// Stream I/O error.
    ///
    /// Wraps standard I/O errors raised while encoding elements. These are not
    /// individually classified; the write in progress is aborted and the output
    /// file must be discarded.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

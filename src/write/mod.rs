//! The streaming write pipeline: session lifecycle and per-record encoders.
//!
//! This module owns the open -> write -> close sequence that turns a stream
//! of [`FeatureVector`] records into a finished container file. Data flows
//! strictly top-down: [`MatWriter::create`] emits the fixed header and the
//! top-level cell-array shell, each [`MatWriter::write`] call appends a label
//! element and a sparse data element per record, and [`MatWriter::close`]
//! patches the two trailer fields whose values are only known at the end.
//!
//! # Key Components
//!
//! - [`MatWriter`] - the session: one open output file, the running byte and
//!   element counters, and the cached dimension width
//! - [`stream::MatStream`] - position-tracked little-endian primitive writes
//! - [`element`] - element framing and the two-phase size-field protocol
//!
//! # Concurrency
//!
//! Strictly single-threaded, synchronous, sequential I/O. The writer owns its
//! stream exclusively for its whole lifetime; there is no cancellation, and an
//! I/O fault mid-write leaves the file truncated and non-conformant - callers
//! must discard it.

pub(crate) mod element;
pub(crate) mod stream;

use std::path::Path;

use widestring::U16String;

use crate::config::WriterConfig;
use crate::error::Error;
use crate::format::{
    self, ArrayFlags, MatClass, MatType, DIM_INDEX_MASK, ENDIAN_MARKER, HEADER_LEN, TEXT_LEN,
    VERSION,
};
use crate::vector::FeatureVector;
use crate::Result;

use self::stream::MatStream;

/// Name of the top-level cell array holding all exported vectors.
const CONTAINER_NAME: &str = "data";
/// Name of each per-record label element.
const LABEL_NAME: &str = "src";
/// Name of each per-record sparse data element.
const DATA_NAME: &str = "fvec";

/// Streaming writer producing one MAT-file level 5 container.
///
/// A `MatWriter` binds an open output file to its running totals: the byte
/// count inside the top-level container, the number of records written, and
/// the configured dimension-index width. The lifecycle is
/// [`create`](MatWriter::create) -> any number of
/// [`write`](MatWriter::write) calls -> [`close`](MatWriter::close). Closing
/// consumes the writer, so use-after-close is rejected at compile time; a
/// writer dropped without `close` leaves the trailer fields unpatched and the
/// file should be discarded.
///
/// # Examples
///
/// ```rust,no_run
/// use matstream::{FeatureVector, MatWriter, WriterConfig};
///
/// let mut writer = MatWriter::create("vectors.mat", &WriterConfig::new(16))?;
///
/// let mut vector = FeatureVector::with_source("doc-1");
/// vector.push(3, 0.5);
/// writer.write(&[vector])?;
///
/// writer.close()?;
/// # Ok::<(), matstream::Error>(())
/// ```
#[derive(Debug)]
pub struct MatWriter {
    stream: MatStream,
    /// Bytes accumulated inside the top-level container.
    bytes: u32,
    /// Records written so far; becomes the cell array's column count.
    elements: u32,
    /// Dimension indices range over `[0, 2^bits)`.
    bits: u32,
    /// Recorded offset of the container's size field, patched at close.
    size_field_pos: u64,
    /// Recorded offset of the container's column count, patched at close.
    count_field_pos: u64,
}

impl MatWriter {
    /// Opens `path` for writing and emits the file header and container shell.
    ///
    /// The configured dimension width is checked first: values above 31 bits
    /// cannot be represented (sparse dimensions are signed 32-bit integers)
    /// and are rejected before any file is created. The fixed preamble -
    /// 124 bytes of descriptive text, the version marker, and the `'M','I'`
    /// endianness marker - must total exactly 128 bytes; the count is
    /// asserted right after writing it.
    ///
    /// The top-level cell array's size field and column count are emitted as
    /// placeholders here; their stream offsets are recorded so
    /// [`close`](MatWriter::close) can patch them without resorting to fixed
    /// magic positions.
    ///
    /// # Arguments
    /// * `path` - the output file; truncated if it exists
    /// * `config` - the writer settings, see [`WriterConfig`]
    ///
    /// # Errors
    /// - [`Error::DimensionBits`] if `config.hash_bits` exceeds 31
    /// - [`Error::Create`] if the path cannot be opened for writing
    /// - [`Error::Header`] if the preamble byte count is not exactly 128
    pub fn create<P: AsRef<Path>>(path: P, config: &WriterConfig) -> Result<Self> {
        let path = path.as_ref();

        if config.hash_bits > format::MAX_DIM_BITS {
            return Err(Error::DimensionBits {
                bits: config.hash_bits,
            });
        }

        let mut stream = MatStream::create(path).map_err(|source| Error::Create {
            path: path.to_path_buf(),
            source,
        })?;

        // Descriptive text, space-padded to exactly 124 bytes.
        let text = format!(
            "MATLAB 5.0 MAT-file, created by matstream {}",
            env!("CARGO_PKG_VERSION")
        );
        let mut preamble = [b' '; TEXT_LEN];
        let n = text.len().min(TEXT_LEN);
        preamble[..n].copy_from_slice(&text.as_bytes()[..n]);

        let mut written = stream.write_bytes(&preamble)?;
        written += stream.write_u16(VERSION)?;
        written += stream.write_u16(ENDIAN_MARKER)?;

        if written != HEADER_LEN {
            return Err(Error::Header {
                path: path.to_path_buf(),
                written,
            });
        }

        // Top-level cell array shell. The tag's size field and the column
        // count are placeholders until close; record where they live.
        stream.write_u32(MatType::Matrix.code())?;
        let size_field_pos = stream.pos();
        stream.write_u32(0)?;

        let mut bytes = stream.write_array_flags(ArrayFlags::empty(), MatClass::Cell, 0)?;
        bytes += stream.write_array_dim(2, 0)?;
        let count_field_pos = stream.pos() - 4;
        bytes += stream.write_array_name(CONTAINER_NAME)?;

        Ok(Self {
            stream,
            bytes,
            elements: 0,
            bits: config.hash_bits,
            size_field_pos,
            count_field_pos,
        })
    }

    /// Appends a block of records to the container.
    ///
    /// Each record becomes two consecutive elements - its label, then its
    /// sparse data - and the running totals are updated accordingly. There is
    /// no partial-failure recovery: if any write fails the error propagates,
    /// the session is unusable, and the output file must be discarded.
    ///
    /// # Errors
    /// [`Error::Io`] on any underlying stream fault.
    pub fn write(&mut self, records: &[FeatureVector]) -> Result<()> {
        for record in records {
            self.bytes += self.write_label(record)?;
            self.bytes += self.write_sparse(record)?;
            self.elements += 1;
        }

        Ok(())
    }

    /// Finalizes the container and releases the file.
    ///
    /// Patches the two fields recorded at [`create`](MatWriter::create) time -
    /// the container's payload byte count and its column count - then flushes
    /// and closes the stream. Consuming `self` makes further writes and
    /// double-closes compile errors.
    ///
    /// # Errors
    /// [`Error::Io`] if patching or flushing fails.
    pub fn close(mut self) -> Result<()> {
        self.stream.patch_u32(self.size_field_pos, self.bytes)?;
        self.stream.patch_u32(self.count_field_pos, self.elements)?;
        self.stream.flush()
    }

    /// Bytes accumulated inside the top-level container so far.
    #[must_use]
    pub fn bytes_written(&self) -> u32 {
        self.bytes
    }

    /// Records written so far.
    #[must_use]
    pub fn records_written(&self) -> u32 {
        self.elements
    }

    /// Encodes a record's label as a `(1, len)` character array element.
    ///
    /// An absent label is encoded as a zero-length one. Characters are
    /// widened to UTF-16 code units; `len` is the unit count, which also
    /// becomes the array's second dimension.
    fn write_label(&mut self, record: &FeatureVector) -> Result<u32> {
        let label = record.source().map(U16String::from_str).unwrap_or_default();
        let len = label.len() as u32;

        let element = self.stream.begin_element(MatType::Matrix)?;
        self.stream
            .write_array_flags(ArrayFlags::empty(), MatClass::Char, 0)?;
        self.stream.write_array_dim(1, len)?;
        self.stream.write_array_name(LABEL_NAME)?;

        self.stream.write_u32(MatType::Uint16.code())?;
        self.stream.write_u32(len * 2)?;
        for &unit in label.as_slice() {
            self.stream.write_u16(unit)?;
        }
        self.stream.pad()?;

        self.stream.end_element(element)
    }

    /// Encodes a record's entries as a `(2^bits, 1)` sparse array element.
    ///
    /// Single-column compressed layout: the row indices, the two column
    /// pointers `[0, len]`, and the values in row-index order. Row indices
    /// are masked to their low 31 bits; indices at or above 2^31 alias into
    /// range rather than erroring, matching what existing consumers of these
    /// files expect.
    fn write_sparse(&mut self, record: &FeatureVector) -> Result<u32> {
        let len = record.len() as u32;

        let element = self.stream.begin_element(MatType::Matrix)?;
        self.stream
            .write_array_flags(ArrayFlags::empty(), MatClass::Sparse, len)?;
        self.stream.write_array_dim(1u32 << self.bits, 1)?;
        self.stream.write_array_name(DATA_NAME)?;

        // Row indices.
        self.stream.write_u32(MatType::Int32.code())?;
        self.stream.write_u32(len * 4)?;
        for &(dim, _) in record.entries() {
            self.stream.write_u32(dim & DIM_INDEX_MASK)?;
        }
        self.stream.pad()?;

        // Column pointers of the single compressed column.
        self.stream.write_u32(MatType::Int32.code())?;
        self.stream.write_u32(8)?;
        self.stream.write_u32(0)?;
        self.stream.write_u32(len)?;

        // Values, in row-index order.
        self.stream.write_u32(MatType::Double.code())?;
        self.stream.write_u32(len * 8)?;
        for &(_, value) in record.entries() {
            self.stream.write_f64(value)?;
        }
        self.stream.pad()?;

        self.stream.end_element(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn container_shell_is_forty_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.mat");

        let writer = MatWriter::create(&path, &WriterConfig::new(8)).unwrap();
        assert_eq!(writer.bytes_written(), 40);
        assert_eq!(writer.records_written(), 0);
        writer.close().unwrap();
    }

    #[test]
    fn counters_track_each_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counters.mat");

        let mut writer = MatWriter::create(&path, &WriterConfig::new(4)).unwrap();

        let mut record = FeatureVector::with_source("ab");
        record.push(1, 1.5);
        record.push(3, 2.5);
        writer.write(std::slice::from_ref(&record)).unwrap();

        // Label: 48-byte fixed part + 4 char bytes + 4 pad, plus the tag.
        // Data: 40-byte fixed part + 16-byte row-index block + 16-byte
        // column-pointer block + 24-byte value block, plus the tag.
        assert_eq!(writer.records_written(), 1);
        assert_eq!(writer.bytes_written(), 40 + 64 + 104);

        writer.write(&[FeatureVector::new()]).unwrap();
        assert_eq!(writer.records_written(), 2);

        writer.close().unwrap();
    }

    #[test]
    fn too_wide_config_creates_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rejected.mat");

        let err = MatWriter::create(&path, &WriterConfig::new(32)).unwrap_err();
        assert!(matches!(err, Error::DimensionBits { bits: 32 }));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_reports_create_error() {
        let err = MatWriter::create(
            "/definitely/not/a/directory/out.mat",
            &WriterConfig::new(8),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Create { .. }));
    }
}

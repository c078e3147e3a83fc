//! Byte-counting little-endian output stream over the target file.
//!
//! [`MatStream`] is the only place in the crate that touches the file handle.
//! It tracks the absolute write position itself so padding and size
//! backfilling never have to ask the operating system where the stream is,
//! and it funnels every multi-byte value through little-endian writes so the
//! produced bytes match the `'M','I'` endianness marker on every platform.
//!
//! # Key Components
//!
//! - Primitive writes: [`MatStream::write_u16`], [`MatStream::write_u32`],
//!   [`MatStream::write_f64`], [`MatStream::write_bytes`] - each returns the
//!   byte count it appended
//! - [`MatStream::pad`] - zero-byte padding to the next 8-byte boundary
//! - [`MatStream::patch_u32`] - the seek-back-overwrite-seek-forward step of
//!   the two-phase element protocol; the only random access in the crate

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::format::ALIGNMENT;
use crate::Result;

/// Buffered output stream with a tracked absolute position.
///
/// All writes append at the tracked position; [`MatStream::patch_u32`] is the
/// sole operation that moves it backward, and it restores the end position
/// before returning. The stream must be file-backed because the size-field
/// protocol requires random-access positioning, not just append.
#[derive(Debug)]
pub(crate) struct MatStream {
    writer: BufWriter<File>,
    pos: u64,
}

impl MatStream {
    /// Opens the target path for writing, truncating any existing file.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            pos: 0,
        })
    }

    /// The current write position, relative to the start of the file.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Appends raw bytes, returning the count written.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(data.len())
    }

    /// Appends a 16-bit integer in little-endian order.
    pub fn write_u16(&mut self, value: u16) -> Result<usize> {
        self.writer.write_u16::<LittleEndian>(value)?;
        self.pos += 2;
        Ok(2)
    }

    /// Appends a 32-bit integer in little-endian order.
    pub fn write_u32(&mut self, value: u32) -> Result<usize> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(4)
    }

    /// Appends a 64-bit float in little-endian order.
    pub fn write_f64(&mut self, value: f64) -> Result<usize> {
        self.writer.write_f64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(8)
    }

    /// Pads the stream to the next 8-byte boundary.
    ///
    /// Writes `8 - (pos % 8)` zero bytes when the position is unaligned,
    /// nothing otherwise. Returns the number of bytes written (0-7). The
    /// container format requires every element's data region to end on such a
    /// boundary; a file missing this padding is unreadable by conforming
    /// readers.
    pub fn pad(&mut self) -> Result<usize> {
        const ZEROS: [u8; ALIGNMENT as usize] = [0; ALIGNMENT as usize];

        let r = (self.pos % ALIGNMENT) as usize;
        if r == 0 {
            return Ok(0);
        }
        self.write_bytes(&ZEROS[..ALIGNMENT as usize - r])
    }

    /// Overwrites a previously written 32-bit size field in place.
    ///
    /// Seeks back to `pos`, writes `value`, and seeks forward again to the
    /// position the stream was at, so callers can keep appending as if the
    /// patch never happened.
    pub fn patch_u32(&mut self, pos: u64, value: u32) -> Result<()> {
        let end = self.pos;
        self.seek(pos)?;
        self.write_u32(value)?;
        self.seek(end)
    }

    /// Flushes buffered bytes through to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        self.pos = self.writer.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # matstream
//!
//! A streaming writer for MATLAB Level 5 MAT-files, built in pure Rust. `matstream`
//! serializes a sequence of labeled sparse vectors into a single `.mat` container
//! readable by MATLAB, Octave, and other conforming numerical tooling. The vectors
//! are stored as a `2 x n` cell array named `data`, where the first row holds the
//! source label of each vector and the second row a sparse array with the vector
//! entries.
//!
//! ## Features
//!
//! - **Single-pass streaming** - vectors are encoded as they arrive; payloads are
//!   never buffered in memory. Element size fields are reserved on the way in and
//!   backfilled once the payload length is known.
//! - **Exact framing** - every element is tagged, length-prefixed, and padded to
//!   the 8-byte boundaries the container format mandates.
//! - **Compile-time lifecycle** - closing the writer consumes it, so writing to a
//!   closed file is a compile error rather than a silent corruption.
//! - **Memory safe** - no `unsafe`, comprehensive error handling via [`Error`].
//!
//! ## Quick Start
//!
//! Add `matstream` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! matstream = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use matstream::prelude::*;
//!
//! let config = WriterConfig::new(16);
//! let mut writer = MatWriter::create("vectors.mat", &config)?;
//!
//! let mut vector = FeatureVector::with_source("doc-1");
//! vector.push(3, 0.5);
//! vector.push(17, 1.25);
//!
//! writer.write(&[vector])?;
//! writer.close()?;
//! # Ok::<(), matstream::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `matstream` is organized into a small set of modules:
//!
//! - [`format`] - wire-level vocabulary of the MAT-file level 5 container: data
//!   type codes, array classes, flag words, and layout constants
//! - [`MatWriter`] - the session binding one output file to its running byte and
//!   element counters; drives the open / write / close lifecycle
//! - [`FeatureVector`] - the input record: an optional source label plus an
//!   ordered list of `(dimension index, value)` entries
//! - [`WriterConfig`] - the settings the writer consumes, chiefly the width of
//!   the dimension-index space
//! - [`Error`] and [`Result`] - comprehensive error handling
//!
//! ## File Layout
//!
//! The produced container starts with a fixed 128-byte header (124 bytes of
//! descriptive text, a version marker, and an endianness marker), followed by a
//! single top-level cell-array element holding the per-vector label and sparse
//! data elements. Two fields of that element - its payload byte count and its
//! column count - are only known once all vectors have been written; the writer
//! records their stream offsets while emitting the header and patches them when
//! [`MatWriter::close`] is called.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result):
//!
//! ```rust,no_run
//! use matstream::{Error, MatWriter, WriterConfig};
//!
//! match MatWriter::create("vectors.mat", &WriterConfig::new(40)) {
//!     Ok(writer) => println!("writer open"),
//!     Err(Error::DimensionBits { bits }) => println!("{bits} index bits is too wide"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

mod config;
mod error;
mod vector;
mod write;

/// Wire-level vocabulary of the MAT-file level 5 container format.
///
/// Data type codes ([`format::MatType`]), array classes ([`format::MatClass`]),
/// the array flag word ([`format::ArrayFlags`]), and the fixed layout constants
/// of the header and element framing.
pub mod format;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use matstream::prelude::*;
///
/// let writer = MatWriter::create("out.mat", &WriterConfig::default())?;
/// writer.close()?;
/// # Ok::<(), matstream::Error>(())
/// ```
pub mod prelude;

/// `matstream` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. Used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `matstream` Error type
///
/// The error type for all operations in this crate. See [`error::Error`] for
/// the individual failure modes.
pub use error::Error;

/// Settings consumed by [`MatWriter`], chiefly the dimension-index width.
pub use config::WriterConfig;

/// A single sparse vector together with its optional source label.
pub use vector::FeatureVector;

/// The streaming MAT-file writer; one instance per output file.
///
/// See [`MatWriter::create`], [`MatWriter::write`], and [`MatWriter::close`]
/// for the session lifecycle.
pub use write::MatWriter;

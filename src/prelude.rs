//! # matstream Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the matstream library. Import this module to get quick access to the
//! essential types for writing MAT-file containers.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all matstream operations
pub use crate::Error;

/// The result type used throughout matstream
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The streaming MAT-file writer
pub use crate::MatWriter;

/// Writer settings, chiefly the dimension-index width
pub use crate::WriterConfig;

/// The input record: an optional source label plus sparse entries
pub use crate::FeatureVector;

// ================================================================================================
// Format Vocabulary
// ================================================================================================

/// Data type codes, array classes, and the array flag word
pub use crate::format::{ArrayFlags, MatClass, MatType};

//! StrataCP test suite
//!
//! Integration tests and criterion benchmarks for the StrataCP crates, plus
//! the shared helpers they use to build source files.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Test data generators and the file sizes that sit on the interesting
/// buffer boundaries.
pub mod test_utils;

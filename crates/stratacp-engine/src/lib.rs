//! Copy engine for StrataCP
//!
//! This crate ties the pieces together: it opens both files, hands them to
//! the strategy named in the [`CopySpec`](stratacp_types::CopySpec), times the
//! transfer and reports a [`CopyResult`](stratacp_types::CopyResult).
//!
//! # Examples
//!
//! ```rust,no_run
//! use stratacp_engine::CopyEngine;
//! use stratacp_types::{CopySpec, StrategyKind};
//!
//! # fn example() -> stratacp_types::Result<()> {
//! let engine = CopyEngine::new();
//! let spec = CopySpec::new("source.bin", "destination.bin", StrategyKind::Vectored);
//! let result = engine.copy(&spec)?;
//! println!("Copied {} bytes in {:?}", result.bytes_copied, result.elapsed());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod job;
pub mod report;

pub use engine::{CopyEngine, EngineBuilder, EngineOptions};
pub use job::{CopyJob, JobId};
pub use report::ComparisonReport;

//! Core type system and error handling for StrataCP
//!
//! This crate provides the foundational types shared by every StrataCP crate:
//!
//! - **Error handling**: the copy failure taxonomy with kinds and severities
//! - **Core types**: copy specifications, results, strategies and job states
//! - **Configuration**: validated buffer sizes and scatter/gather layouts
//!
//! # Features
//!
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use stratacp_types::{BufferSize, CopySpec, StrategyKind};
//!
//! let spec = CopySpec::new("in.bin", "out.bin", StrategyKind::Vectored)
//!     .with_buffer_size(BufferSize::new(4096).unwrap());
//! assert_eq!(spec.buffer_size().get(), 4096);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use config::{BufferSize, VectorLayout};
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use result::Result;
pub use types::*;

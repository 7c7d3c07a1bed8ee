//! Blocking file I/O and copy strategies for StrataCP
//!
//! This crate owns the file handles and the four ways of moving bytes
//! between them:
//!
//! - **Stream**: one fixed buffer, each read written back out verbatim
//! - **Buffered stream**: the same loop behind internal buffers, flushed per write
//! - **Mapped**: source and destination mapped into memory and copied directly
//! - **Vectored**: scatter reads into a segment layout, gather writes out of it
//!
//! Every strategy takes its [`FileReader`] and [`FileWriter`] by value, so the
//! underlying files are closed when the transfer returns on any path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stratacp_io::{strategy_for, FileReader, FileWriter};
//! use stratacp_types::{CopySpec, StrategyKind};
//!
//! # fn example() -> stratacp_types::Result<()> {
//! let spec = CopySpec::new("source.bin", "destination.bin", StrategyKind::Mapped);
//! let reader = FileReader::open(spec.source())?;
//! let writer = FileWriter::create(spec.destination())?;
//! let outcome = strategy_for(&spec).transfer(reader, writer)?;
//! println!("Copied {} bytes", outcome.bytes_copied);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod buffered;
pub mod copy;
pub mod mapped;
pub mod memory_map;
pub mod reader;
pub mod stream;
pub mod vectored;
pub mod writer;

#[cfg(test)]
mod property_tests;

pub use buffer::{CopyBuffer, VectorBuffer};
pub use buffered::BufferedStreamCopy;
pub use copy::{strategy_for, TransferOutcome, TransferStrategy};
pub use mapped::MappedCopy;
pub use memory_map::{MappedDestination, MemoryMappedFile};
pub use reader::FileReader;
pub use stream::StreamCopy;
pub use vectored::VectoredCopy;
pub use writer::FileWriter;

//! Strategy seam shared by all transfer implementations

use crate::{BufferedStreamCopy, FileReader, FileWriter, MappedCopy, StreamCopy, VectoredCopy};
use stratacp_types::{CopySpec, Result, StrategyKind};

/// Counters produced by one transfer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Bytes written to the destination
    pub bytes_copied: u64,
    /// Read calls issued (mapped chunks for the mapped strategy)
    pub read_calls: u64,
    /// Write calls issued (mapped chunks for the mapped strategy)
    pub write_calls: u64,
}

impl TransferOutcome {
    /// Collect the counters left on a pair of handles
    pub fn from_handles<R, W: std::io::Write>(
        reader: &FileReader<R>,
        writer: &FileWriter<W>,
    ) -> Self {
        Self {
            bytes_copied: writer.bytes_written(),
            read_calls: reader.read_calls(),
            write_calls: writer.write_calls(),
        }
    }
}

/// One way of moving every byte of the source into the destination
///
/// Implementations take ownership of both handles, so the files are closed
/// when `transfer` returns, whether it succeeds or fails.
pub trait TransferStrategy: std::fmt::Debug {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Copy the whole source into the freshly truncated destination
    fn transfer(&self, reader: FileReader, writer: FileWriter) -> Result<TransferOutcome>;
}

/// Build the strategy named by `spec`, with its buffer size and layout
pub fn strategy_for(spec: &CopySpec) -> Box<dyn TransferStrategy> {
    match spec.strategy() {
        StrategyKind::Stream => Box::new(StreamCopy::new(spec.buffer_size())),
        StrategyKind::BufferedStream => Box::new(BufferedStreamCopy::new(spec.buffer_size())),
        StrategyKind::Mapped => Box::new(MappedCopy::new()),
        StrategyKind::Vectored => Box::new(VectoredCopy::new(spec.vector_layout().clone())),
    }
}

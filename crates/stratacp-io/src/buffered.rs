//! Stream copy through internal buffering with a flush after every write

use crate::reader::INTERNAL_BUFFER_CAPACITY;
use crate::{CopyBuffer, FileReader, FileWriter, TransferOutcome, TransferStrategy};
use stratacp_types::{BufferSize, Result, StrategyKind};
use tracing::{debug, trace};

/// Same loop as [`StreamCopy`](crate::StreamCopy), but both handles sit behind
/// an internal buffer and every write is flushed through immediately.
///
/// Output is identical to the plain stream copy; only the flush cadence differs.
#[derive(Debug, Clone, Copy)]
pub struct BufferedStreamCopy {
    buffer_size: BufferSize,
    internal_capacity: usize,
}

impl BufferedStreamCopy {
    /// Create a buffered stream copy with the default internal capacity
    pub fn new(buffer_size: BufferSize) -> Self {
        Self {
            buffer_size,
            internal_capacity: INTERNAL_BUFFER_CAPACITY,
        }
    }

    /// Override the internal buffer capacity of both handles
    pub fn with_internal_capacity(mut self, capacity: usize) -> Self {
        self.internal_capacity = capacity.max(1);
        self
    }
}

impl TransferStrategy for BufferedStreamCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BufferedStream
    }

    fn transfer(&self, reader: FileReader, writer: FileWriter) -> Result<TransferOutcome> {
        let mut reader = reader.buffered(self.internal_capacity);
        let mut writer = writer.buffered(self.internal_capacity);
        let mut buffer = CopyBuffer::new(self.buffer_size.get());
        debug!(
            "Buffered stream copy with {} byte buffer, {} byte internal buffers",
            buffer.capacity(),
            self.internal_capacity
        );

        loop {
            let n = reader.read(buffer.unfilled_mut())?;
            if n == 0 {
                break;
            }
            buffer.advance(n);
            writer.write_all(buffer.filled())?;
            writer.flush()?;
            trace!("Copied and flushed chunk of {} bytes", n);
            buffer.clear();
        }

        let outcome = TransferOutcome::from_handles(&reader, &writer);
        writer.into_unbuffered()?;
        Ok(outcome)
    }
}

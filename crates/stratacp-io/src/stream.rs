//! Plain fixed-buffer stream copy

use crate::{CopyBuffer, FileReader, FileWriter, TransferOutcome, TransferStrategy};
use stratacp_types::{BufferSize, Result, StrategyKind};
use tracing::{debug, trace};

/// Read into one buffer, write exactly what was read, repeat until end of input
#[derive(Debug, Clone, Copy)]
pub struct StreamCopy {
    buffer_size: BufferSize,
}

impl StreamCopy {
    /// Create a stream copy with the given buffer size
    pub fn new(buffer_size: BufferSize) -> Self {
        Self { buffer_size }
    }
}

impl TransferStrategy for StreamCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Stream
    }

    fn transfer(&self, mut reader: FileReader, mut writer: FileWriter) -> Result<TransferOutcome> {
        let mut buffer = CopyBuffer::new(self.buffer_size.get());
        debug!("Stream copy with {} byte buffer", buffer.capacity());

        loop {
            let n = reader.read(buffer.unfilled_mut())?;
            if n == 0 {
                break;
            }
            buffer.advance(n);
            writer.write_all(buffer.filled())?;
            trace!("Copied chunk of {} bytes", n);
            buffer.clear();
        }

        Ok(TransferOutcome::from_handles(&reader, &writer))
    }
}

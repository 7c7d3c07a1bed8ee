//! Scatter/gather copy

use crate::{FileReader, FileWriter, TransferOutcome, TransferStrategy, VectorBuffer};
use stratacp_types::{Result, StrategyKind, VectorLayout};
use tracing::{debug, trace};

/// One vectored read fills the segments in order; one vectored write drains
/// the filled portions in the same order; all segments are reset before the
/// next read.
#[derive(Debug, Clone)]
pub struct VectoredCopy {
    layout: VectorLayout,
}

impl VectoredCopy {
    /// Create a vectored copy over `layout`
    pub fn new(layout: VectorLayout) -> Self {
        Self { layout }
    }

    /// Segment layout in use
    pub fn layout(&self) -> &VectorLayout {
        &self.layout
    }
}

impl TransferStrategy for VectoredCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Vectored
    }

    fn transfer(&self, mut reader: FileReader, mut writer: FileWriter) -> Result<TransferOutcome> {
        let mut vector = VectorBuffer::new(&self.layout);
        debug!(
            "Vectored copy over {} segments ({} bytes per vector)",
            vector.segment_count(),
            vector.capacity()
        );

        loop {
            let n = {
                let mut targets = vector.io_slices_mut();
                reader.read_vectored(&mut targets)?
            };
            if n == 0 {
                break;
            }
            vector.set_filled(n);

            let mut sources = vector.filled_slices();
            writer.write_all_vectored(&mut sources)?;
            trace!("Copied vector of {} bytes", n);
            vector.clear();
        }

        Ok(TransferOutcome::from_handles(&reader, &writer))
    }
}

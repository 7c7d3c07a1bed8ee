//! Memory-mapped copy

use crate::{
    FileReader, FileWriter, MappedDestination, MemoryMappedFile, TransferOutcome,
    TransferStrategy,
};
use stratacp_types::{Result, StrategyKind};
use tracing::debug;

/// Map the source read-only and the pre-sized destination read-write, then
/// copy the entire extent between the two mappings chunk by chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappedCopy {
    chunk_size: Option<usize>,
}

impl MappedCopy {
    /// Create a mapped copy that picks its chunk size from the file size
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy between the mappings in chunks of `chunk_size` bytes
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: Some(chunk_size.max(1)),
        }
    }
}

impl TransferStrategy for MappedCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Mapped
    }

    fn transfer(&self, reader: FileReader, mut writer: FileWriter) -> Result<TransferOutcome> {
        let len = reader.file_size();
        if len == 0 {
            writer.presize(0)?;
            debug!("Mapped copy of empty source, nothing to map");
            return Ok(TransferOutcome::default());
        }

        let source = MemoryMappedFile::map(&reader, len)?;
        source.advise_sequential();
        let mut destination = MappedDestination::create(&writer, len)?;

        let chunk_size = self
            .chunk_size
            .unwrap_or_else(|| source.optimal_chunk_size());
        debug!("Mapped copy of {} bytes in {} byte chunks", len, chunk_size);

        let mut chunks = 0u64;
        for (from, to) in source
            .as_slice()
            .chunks(chunk_size)
            .zip(destination.as_mut_slice().chunks_mut(chunk_size))
        {
            to.copy_from_slice(from);
            chunks += 1;
        }

        destination.flush()?;
        drop(destination);
        drop(source);

        writer.record_mapped_write(len, chunks);
        Ok(TransferOutcome {
            bytes_copied: writer.bytes_written(),
            read_calls: chunks,
            write_calls: writer.write_calls(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_copies_beyond_first_kilobyte() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.bin");
        let dest = temp_dir.path().join("dst.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 253) as u8).collect();
        fs::write(&source, &data).unwrap();

        let outcome = MappedCopy::with_chunk_size(1024)
            .transfer(FileReader::open(&source).unwrap(), FileWriter::create(&dest).unwrap())
            .unwrap();

        assert_eq!(fs::read(&dest).unwrap(), data);
        assert_eq!(outcome.bytes_copied, 10_000);
        assert_eq!(outcome.write_calls, 10);
    }

    #[test]
    fn test_shrinks_longer_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.bin");
        let dest = temp_dir.path().join("dst.bin");
        fs::write(&source, b"short").unwrap();
        fs::write(&dest, vec![0xFFu8; 4096]).unwrap();

        MappedCopy::new()
            .transfer(FileReader::open(&source).unwrap(), FileWriter::create(&dest).unwrap())
            .unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"short");
    }

    #[test]
    fn test_empty_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.bin");
        let dest = temp_dir.path().join("dst.bin");
        fs::write(&source, b"").unwrap();

        let outcome = MappedCopy::new()
            .transfer(FileReader::open(&source).unwrap(), FileWriter::create(&dest).unwrap())
            .unwrap();

        assert_eq!(outcome, TransferOutcome::default());
        assert_eq!(fs::metadata(&dest).unwrap().len(), 0);
    }
}

//! Memory-mapped views of the copy source and destination

use crate::{FileReader, FileWriter};
use memmap2::{Mmap, MmapMut, MmapOptions};
use stratacp_types::{Error, Result};
use tracing::debug;

/// Read-only mapping of a whole source file
#[derive(Debug)]
pub struct MemoryMappedFile {
    mmap: Mmap,
}

impl MemoryMappedFile {
    /// Map `[0, len)` of the reader's file
    ///
    /// Empty files cannot be mapped; callers handle `len == 0` before mapping.
    pub fn map(reader: &FileReader, len: u64) -> Result<Self> {
        if len == 0 {
            return Err(Error::io(
                format!("map '{}'", reader.path().display()),
                &std::io::Error::new(std::io::ErrorKind::InvalidInput, "cannot map an empty file"),
            ));
        }
        let len = mappable_len(len, reader.path())?;

        // SAFETY: the mapping is read-only and lives no longer than the copy
        // that holds the file open. Concurrent truncation of the source by
        // another process is outside the engine's contract.
        let mmap = unsafe {
            MmapOptions::new()
                .len(len)
                .map(reader.file())
                .map_err(|e| Error::io(format!("map '{}'", reader.path().display()), &e))?
        };

        debug!(
            "Created read-only mapping for '{}': {} bytes",
            reader.path().display(),
            mmap.len()
        );
        Ok(Self { mmap })
    }

    /// Get the mapped data as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Tell the kernel the mapping will be read front to back (Unix only)
    #[cfg(unix)]
    pub fn advise_sequential(&self) {
        if let Err(e) = self.mmap.advise(memmap2::Advice::Sequential) {
            debug!("Sequential advice ignored: {}", e);
        }
    }

    /// Tell the kernel the mapping will be read front to back (no-op off Unix)
    #[cfg(not(unix))]
    pub fn advise_sequential(&self) {}

    /// Chunk size used when draining the mapping
    pub fn optimal_chunk_size(&self) -> usize {
        const PAGE_SIZE: usize = 4096;

        let chunk = if self.len() < 1024 * 1024 {
            64 * 1024
        } else if self.len() < 100 * 1024 * 1024 {
            1024 * 1024
        } else {
            4 * 1024 * 1024
        };
        chunk.max(PAGE_SIZE)
    }
}

/// Writable mapping of a destination that has already been sized
#[derive(Debug)]
pub struct MappedDestination {
    mmap: MmapMut,
}

impl MappedDestination {
    /// Size the destination to `len` bytes, then map `[0, len)` read-write
    ///
    /// The file is extended explicitly with `set_len`; the mapping call is
    /// never relied on to grow it.
    pub fn create(writer: &FileWriter, len: u64) -> Result<Self> {
        writer.presize(len)?;
        let map_len = mappable_len(len, writer.path())?;

        // SAFETY: the destination was opened and truncated by this copy, its
        // length was just set to `map_len`, and the mapping is dropped before
        // the writer releases the file.
        let mmap = unsafe {
            MmapOptions::new()
                .len(map_len)
                .map_mut(writer.file())
                .map_err(|e| Error::io(format!("map '{}'", writer.path().display()), &e))?
        };

        debug!(
            "Created writable mapping for '{}': {} bytes",
            writer.path().display(),
            mmap.len()
        );
        Ok(Self { mmap })
    }

    /// Get the mapped data as a mutable byte slice
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Write dirty pages back to the file
    pub fn flush(&self) -> Result<()> {
        self.mmap
            .flush()
            .map_err(|e| Error::io("flush writable mapping", &e))
    }
}

fn mappable_len(len: u64, path: &std::path::Path) -> Result<usize> {
    usize::try_from(len).map_err(|_| {
        Error::io(
            format!("map '{}'", path.display()),
            &std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file is larger than the address space",
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_memory_mapped_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let test_data = b"Hello, World! This is a test file for memory mapping.";
        temp_file.write_all(test_data).unwrap();
        temp_file.flush().unwrap();

        let reader = FileReader::open(temp_file.path()).unwrap();
        let mmap_file = MemoryMappedFile::map(&reader, reader.file_size()).unwrap();

        assert_eq!(mmap_file.len(), test_data.len());
        assert_eq!(mmap_file.as_slice(), test_data);
        assert!(!mmap_file.is_empty());
        mmap_file.advise_sequential();
    }

    #[test]
    fn test_empty_file_is_not_mapped() {
        let temp_file = NamedTempFile::new().unwrap();
        let reader = FileReader::open(temp_file.path()).unwrap();
        assert!(MemoryMappedFile::map(&reader, 0).is_err());
    }

    #[test]
    fn test_mapped_destination_extends_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dest.bin");
        let writer = FileWriter::create(&path).unwrap();

        let mut dest = MappedDestination::create(&writer, 3000).unwrap();
        assert_eq!(dest.len(), 3000);
        dest.as_mut_slice()[2999] = 0xAB;
        dest.flush().unwrap();
        drop(dest);
        drop(writer);

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), 3000);
        assert_eq!(written[2999], 0xAB);
    }

    #[test]
    fn test_optimal_chunk_size() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&vec![7u8; 2 * 1024 * 1024]).unwrap();
        temp_file.flush().unwrap();

        let reader = FileReader::open(temp_file.path()).unwrap();
        let mmap_file = MemoryMappedFile::map(&reader, reader.file_size()).unwrap();

        assert_eq!(mmap_file.optimal_chunk_size(), 1024 * 1024);
    }
}

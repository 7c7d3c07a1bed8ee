//! Source file handle

use std::fs::File;
use std::io::{BufReader, ErrorKind, IoSliceMut, Read};
use std::path::{Path, PathBuf};
use stratacp_types::{Error, Result};
use tracing::debug;

/// Capacity of the internal buffer added by [`FileReader::buffered`]
pub const INTERNAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Read handle on a copy source
///
/// Owns the underlying file; dropping the reader closes it.
#[derive(Debug)]
pub struct FileReader<R = File> {
    reader: R,
    path: PathBuf,
    file_size: u64,
    bytes_read: u64,
    read_calls: u64,
}

impl FileReader<File> {
    /// Open a regular file for reading
    ///
    /// Any failure here is reported as [`Error::SourceNotFound`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::source_not_found(path, e.to_string()))?;

        let metadata = file.metadata().map_err(|e| {
            Error::source_not_found(path, format!("failed to read metadata: {}", e))
        })?;
        if !metadata.is_file() {
            return Err(Error::source_not_found(path, "not a regular file"));
        }

        let file_size = metadata.len();
        debug!("Opened source: {} ({} bytes)", path.display(), file_size);

        Ok(Self {
            reader: file,
            path: path.to_path_buf(),
            file_size,
            bytes_read: 0,
            read_calls: 0,
        })
    }

    /// Wrap the file in an internal read buffer
    pub fn buffered(self, capacity: usize) -> FileReader<BufReader<File>> {
        FileReader {
            reader: BufReader::with_capacity(capacity, self.reader),
            path: self.path,
            file_size: self.file_size,
            bytes_read: self.bytes_read,
            read_calls: self.read_calls,
        }
    }

    /// Underlying file, for memory mapping
    pub fn file(&self) -> &File {
        &self.reader
    }
}

impl<R: Read> FileReader<R> {
    /// Read up to `buf.len()` bytes; `Ok(0)` marks end of input
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.reader.read(buf) {
                Ok(n) => {
                    self.record(n);
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(self.read_error(&e)),
            }
        }
    }

    /// Scatter-read into `bufs` in order; `Ok(0)` marks end of input
    pub fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> Result<usize> {
        loop {
            match self.reader.read_vectored(bufs) {
                Ok(n) => {
                    self.record(n);
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(self.read_error(&e)),
            }
        }
    }

    fn record(&mut self, n: usize) {
        self.read_calls += 1;
        self.bytes_read += n as u64;
    }

    fn read_error(&self, error: &std::io::Error) -> Error {
        Error::io(format!("read from '{}'", self.path.display()), error)
    }
}

impl<R> FileReader<R> {
    /// Source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source length observed at open time
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read calls issued so far, including the final end-of-input call
    pub fn read_calls(&self) -> u64 {
        self.read_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use stratacp_types::ErrorKind as CopyErrorKind;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_file_reader_reads_to_eof() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let test_data = b"Hello, World! This is a test file.";
        temp_file.write_all(test_data).unwrap();
        temp_file.flush().unwrap();

        let mut reader = FileReader::open(temp_file.path()).unwrap();
        assert_eq!(reader.file_size(), test_data.len() as u64);

        let mut buffer = vec![0u8; 64];
        let n = reader.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], test_data);
        assert_eq!(reader.read(&mut buffer).unwrap(), 0);
        assert_eq!(reader.bytes_read(), test_data.len() as u64);
        assert_eq!(reader.read_calls(), 2);
    }

    #[test]
    fn test_buffered_reader_keeps_counters() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"abcdef").unwrap();
        temp_file.flush().unwrap();

        let mut reader = FileReader::open(temp_file.path()).unwrap();
        let mut first = [0u8; 2];
        reader.read(&mut first).unwrap();

        let mut reader = reader.buffered(INTERNAL_BUFFER_CAPACITY);
        let mut rest = [0u8; 16];
        let n = reader.read(&mut rest).unwrap();

        assert_eq!(&first, b"ab");
        assert_eq!(&rest[..n], b"cdef");
        assert_eq!(reader.bytes_read(), 6);
        assert_eq!(reader.read_calls(), 2);
    }

    #[test]
    fn test_vectored_read_fills_in_order() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"0123456789").unwrap();
        temp_file.flush().unwrap();

        let mut reader = FileReader::open(temp_file.path()).unwrap();
        let mut head = [0u8; 3];
        let mut body = [0u8; 16];
        let n = {
            let mut slices = [IoSliceMut::new(&mut head), IoSliceMut::new(&mut body)];
            reader.read_vectored(&mut slices).unwrap()
        };

        assert_eq!(n, 10);
        assert_eq!(&head, b"012");
        assert_eq!(&body[..7], b"3456789");
    }

    #[test]
    fn test_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let error = FileReader::open(temp_dir.path().join("missing.bin")).unwrap_err();
        assert_eq!(error.kind(), CopyErrorKind::SourceNotFound);
    }

    #[test]
    fn test_directory_is_not_a_source() {
        let temp_dir = TempDir::new().unwrap();
        let error = FileReader::open(temp_dir.path()).unwrap_err();
        assert_eq!(error.kind(), CopyErrorKind::SourceNotFound);
    }
}

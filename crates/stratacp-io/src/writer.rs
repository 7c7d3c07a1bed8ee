//! Destination file handle

use std::fs::{File, Metadata, OpenOptions};
use std::io::{BufWriter, ErrorKind, IoSlice, Write};
use std::path::{Path, PathBuf};
use stratacp_types::{Error, Result};
use tracing::debug;

/// Write handle on a copy destination
///
/// Owns the underlying file; dropping the writer closes it.
#[derive(Debug)]
pub struct FileWriter<W: Write = File> {
    writer: W,
    path: PathBuf,
    bytes_written: u64,
    write_calls: u64,
}

impl FileWriter<File> {
    /// Create the destination, truncating any existing content
    ///
    /// The file is opened read-write so it can also back a writable mapping.
    /// Any failure here is reported as [`Error::DestinationUnwritable`].
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::destination_unwritable(path, e.to_string()))?;

        debug!("Created destination: {}", path.display());

        Ok(Self {
            writer: file,
            path: path.to_path_buf(),
            bytes_written: 0,
            write_calls: 0,
        })
    }

    /// Wrap the file in an internal write buffer
    pub fn buffered(self, capacity: usize) -> FileWriter<BufWriter<File>> {
        FileWriter {
            writer: BufWriter::with_capacity(capacity, self.writer),
            path: self.path,
            bytes_written: self.bytes_written,
            write_calls: self.write_calls,
        }
    }

    /// Underlying file, for memory mapping
    pub fn file(&self) -> &File {
        &self.writer
    }

    /// Resize the destination to exactly `len` bytes and confirm the new length
    pub fn presize(&self, len: u64) -> Result<()> {
        if let Err(e) = self.writer.set_len(len) {
            debug!("Failed to resize {}: {}", self.path.display(), e);
            return Err(resize_error(&self.path, len, &e, self.writer.metadata()));
        }

        let current = self
            .writer
            .metadata()
            .map_err(|e| Error::io(format!("stat '{}'", self.path.display()), &e))?
            .len();
        if current != len {
            return Err(Error::size_mismatch(&self.path, len, current));
        }
        Ok(())
    }

    /// Account for bytes stored through a mapping, one call per chunk copied
    pub fn record_mapped_write(&mut self, bytes: u64, chunks: u64) {
        self.write_calls += chunks;
        self.bytes_written += bytes;
    }

    /// Sync all data to disk
    pub fn sync_all(&self) -> Result<()> {
        self.writer
            .sync_all()
            .map_err(|e| Error::io(format!("sync '{}'", self.path.display()), &e))?;

        debug!("Synced all data to disk");
        Ok(())
    }
}

impl FileWriter<BufWriter<File>> {
    /// Flush the internal buffer and unwrap the file
    pub fn into_unbuffered(self) -> Result<FileWriter<File>> {
        let path = self.path;
        let writer = self
            .writer
            .into_inner()
            .map_err(|e| Error::io(format!("flush '{}'", path.display()), e.error()))?;
        Ok(FileWriter {
            writer,
            path,
            bytes_written: self.bytes_written,
            write_calls: self.write_calls,
        })
    }
}

impl<W: Write> FileWriter<W> {
    /// Write the whole slice
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.writer
            .write_all(data)
            .map_err(|e| Error::io(format!("write to '{}'", self.path.display()), &e))?;

        self.write_calls += 1;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    /// Gather-write every slice in order, continuing after short writes
    pub fn write_all_vectored(&mut self, mut bufs: &mut [IoSlice<'_>]) -> Result<()> {
        IoSlice::advance_slices(&mut bufs, 0);
        while !bufs.is_empty() {
            match self.writer.write_vectored(bufs) {
                Ok(0) => {
                    return Err(Error::io(
                        format!("write to '{}'", self.path.display()),
                        &std::io::Error::from(ErrorKind::WriteZero),
                    ));
                }
                Ok(n) => {
                    self.write_calls += 1;
                    self.bytes_written += n as u64;
                    IoSlice::advance_slices(&mut bufs, n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(Error::io(
                        format!("write to '{}'", self.path.display()),
                        &e,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Flush any internally buffered bytes
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io(format!("flush '{}'", self.path.display()), &e))
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the number of bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Write calls issued so far
    pub fn write_calls(&self) -> u64 {
        self.write_calls
    }
}

/// A failed resize is a size mismatch when the current length is known
fn resize_error(
    path: &Path,
    len: u64,
    resize: &std::io::Error,
    stat: std::io::Result<Metadata>,
) -> Error {
    match stat {
        Ok(metadata) => Error::size_mismatch(path, len, metadata.len()),
        Err(stat) => Error::io(
            format!(
                "resize '{}' to {} bytes (stat failed: {})",
                path.display(),
                len,
                stat
            ),
            resize,
        ),
    }
}

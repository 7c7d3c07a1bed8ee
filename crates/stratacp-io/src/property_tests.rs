//! Property-based tests for the copy strategies

use crate::{
    BufferedStreamCopy, FileReader, FileWriter, MappedCopy, StreamCopy, TransferStrategy,
    VectoredCopy,
};
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use stratacp_types::{BufferSize, VectorLayout};
use tempfile::TempDir;

fn run(strategy: &dyn TransferStrategy, source: &Path, dest: &Path) -> u64 {
    strategy
        .transfer(FileReader::open(source).unwrap(), FileWriter::create(dest).unwrap())
        .unwrap()
        .bytes_copied
}

/// Segment layouts of 1 to 6 segments, each 1 to 600 bytes
fn layout_strategy() -> impl Strategy<Value = VectorLayout> {
    prop::collection::vec(1usize..=600, 1..=6).prop_map(|segments| VectorLayout::new(segments).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Stream copies reproduce the source for any buffer size
    #[test]
    fn test_stream_copy_is_exact(
        data in prop::collection::vec(any::<u8>(), 0..8192),
        buffer_size in 1usize..=4096,
    ) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.bin");
        let dest = temp_dir.path().join("dst.bin");
        fs::write(&source, &data).unwrap();

        let size = BufferSize::new(buffer_size).unwrap();
        prop_assert_eq!(run(&StreamCopy::new(size), &source, &dest), data.len() as u64);
        prop_assert_eq!(&fs::read(&dest).unwrap(), &data);

        prop_assert_eq!(run(&BufferedStreamCopy::new(size), &source, &dest), data.len() as u64);
        prop_assert_eq!(&fs::read(&dest).unwrap(), &data);
    }

    /// Vectored copies reproduce the source for any segment layout
    #[test]
    fn test_vectored_copy_is_exact(
        data in prop::collection::vec(any::<u8>(), 0..8192),
        layout in layout_strategy(),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.bin");
        let dest = temp_dir.path().join("dst.bin");
        fs::write(&source, &data).unwrap();

        prop_assert_eq!(run(&VectoredCopy::new(layout), &source, &dest), data.len() as u64);
        prop_assert_eq!(&fs::read(&dest).unwrap(), &data);
    }

    /// Mapped copies reproduce the source for any chunk size, over a stale longer destination
    #[test]
    fn test_mapped_copy_is_exact(
        data in prop::collection::vec(any::<u8>(), 0..16384),
        chunk_size in 1usize..=8192,
    ) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.bin");
        let dest = temp_dir.path().join("dst.bin");
        fs::write(&source, &data).unwrap();
        fs::write(&dest, vec![0xEEu8; data.len() + 100]).unwrap();

        prop_assert_eq!(run(&MappedCopy::with_chunk_size(chunk_size), &source, &dest), data.len() as u64);
        prop_assert_eq!(&fs::read(&dest).unwrap(), &data);
    }
}

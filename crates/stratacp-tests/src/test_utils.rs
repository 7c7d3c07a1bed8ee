//! Unified test utilities for StrataCP tests and benchmarks

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test data generation patterns
#[derive(Debug, Clone, Copy)]
pub enum TestDataPattern {
    /// All zeros
    Zeros,
    /// All ones
    Ones,
    /// Deterministic pseudo-random bytes
    Random,
    /// Repeating structured bytes
    Realistic,
}

/// Generate `size` bytes following `pattern`
///
/// The same size and pattern always yield the same bytes.
pub fn generate_test_data(size: usize, pattern: TestDataPattern) -> Vec<u8> {
    match pattern {
        TestDataPattern::Zeros => vec![0u8; size],
        TestDataPattern::Ones => vec![0xFFu8; size],
        TestDataPattern::Random => {
            // xorshift64, seeded so runs are reproducible
            let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
            (0..size)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state >> 24) as u8
                })
                .collect()
        }
        TestDataPattern::Realistic => (0..size).map(|i| ((i * 7 + 13) % 256) as u8).collect(),
    }
}

/// Create a file in `temp_dir` filled with `pattern`
pub fn create_test_file(
    temp_dir: &TempDir,
    name: &str,
    size: usize,
    pattern: TestDataPattern,
) -> PathBuf {
    let file_path = temp_dir.path().join(name);
    let data = generate_test_data(size, pattern);
    fs::write(&file_path, data).expect("Failed to write test file");
    file_path
}

/// Create a file with the random pattern
pub fn create_random_test_file(temp_dir: &TempDir, name: &str, size: usize) -> PathBuf {
    create_test_file(temp_dir, name, size, TestDataPattern::Random)
}

/// Number of descriptors this process currently holds on `path`
///
/// Reads `/proc/self/fd`, so unlike deleting the file it observes handles
/// that are still open. Only this file's descriptors are counted, which keeps
/// the result stable while other tests open files in parallel.
#[cfg(target_os = "linux")]
pub fn open_handles_to(path: &Path) -> usize {
    let Ok(target) = fs::canonicalize(path) else {
        return 0;
    };
    let Ok(entries) = fs::read_dir("/proc/self/fd") else {
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| fs::read_link(entry.path()).ok())
        .filter(|link| link == &target)
        .count()
}

/// File sizes around a buffer boundary
pub struct BoundarySizes;

impl BoundarySizes {
    /// Sizes 0, 1, `buffer - 1`, `buffer`, `buffer + 1` and a multi-chunk size
    pub fn around(buffer: usize) -> Vec<usize> {
        vec![
            0,
            1,
            buffer.saturating_sub(1),
            buffer,
            buffer + 1,
            buffer * 37 + buffer / 3,
        ]
    }
}

/// Common file sizes for benchmarks
pub struct CommonFileSizes;

impl CommonFileSizes {
    /// 1KB
    pub const TINY: usize = 1024;
    /// 64KB
    pub const MEDIUM: usize = 64 * 1024;
    /// 1MB
    pub const LARGE: usize = 1024 * 1024;
    /// 16MB
    pub const XLARGE: usize = 16 * 1024 * 1024;

    /// All benchmark sizes with labels
    pub fn all() -> Vec<(&'static str, usize)> {
        vec![
            ("1KB", Self::TINY),
            ("64KB", Self::MEDIUM),
            ("1MB", Self::LARGE),
            ("16MB", Self::XLARGE),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_test_data_patterns() {
        let size = 1024;

        let zeros = generate_test_data(size, TestDataPattern::Zeros);
        assert_eq!(zeros.len(), size);
        assert!(zeros.iter().all(|&b| b == 0));

        let ones = generate_test_data(size, TestDataPattern::Ones);
        assert!(ones.iter().all(|&b| b == 0xFF));

        let random = generate_test_data(size, TestDataPattern::Random);
        assert_eq!(random, generate_test_data(size, TestDataPattern::Random));
        assert!(random.iter().any(|&b| b != random[0]));
    }

    #[test]
    fn test_boundary_sizes() {
        assert_eq!(&BoundarySizes::around(1024)[..5], &[0, 1, 1023, 1024, 1025]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_open_handles_to_sees_held_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_random_test_file(&temp_dir, "held.bin", 16);

        let held = fs::File::open(&file_path).unwrap();
        assert_eq!(open_handles_to(&file_path), 1);
        drop(held);
        assert_eq!(open_handles_to(&file_path), 0);
    }

    #[test]
    fn test_create_test_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(&temp_dir, "test.dat", 1024, TestDataPattern::Zeros);
        assert_eq!(fs::metadata(&file_path).unwrap().len(), 1024);
    }
}

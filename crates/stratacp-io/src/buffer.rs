//! Transfer buffers
//!
//! Both buffers remember how many bytes the last read produced, so a write
//! only ever drains those bytes and never the stale tail left over from an
//! earlier, longer read.

use std::io::{IoSlice, IoSliceMut};
use stratacp_types::VectorLayout;

/// Single contiguous buffer for the stream strategies
#[derive(Debug)]
pub struct CopyBuffer {
    data: Vec<u8>,
    filled: usize,
}

impl CopyBuffer {
    /// Allocate a zeroed buffer of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
            filled: 0,
        }
    }

    /// Space the next read may fill
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.filled..]
    }

    /// Record that the last read produced `n` bytes
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.filled + n <= self.data.len());
        self.filled = (self.filled + n).min(self.data.len());
    }

    /// Bytes read and not yet drained
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Reset the read position
    pub fn clear(&mut self) {
        self.filled = 0;
    }

    /// Total capacity
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Check if no bytes are pending
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }
}

/// Ordered set of fixed-size buffers for scatter reads and gather writes
#[derive(Debug)]
pub struct VectorBuffer {
    segments: Vec<Vec<u8>>,
    filled: usize,
}

impl VectorBuffer {
    /// Allocate one zeroed buffer per segment of `layout`
    pub fn new(layout: &VectorLayout) -> Self {
        Self {
            segments: layout.segments().iter().map(|&size| vec![0u8; size]).collect(),
            filled: 0,
        }
    }

    /// Every segment as a read target, in order
    ///
    /// Callers clear the buffer before each read, so the whole vector is offered.
    pub fn io_slices_mut(&mut self) -> Vec<IoSliceMut<'_>> {
        self.segments
            .iter_mut()
            .map(|segment| IoSliceMut::new(segment))
            .collect()
    }

    /// Record that a scatter read produced `n` bytes across the segments
    pub fn set_filled(&mut self, n: usize) {
        debug_assert!(n <= self.capacity());
        self.filled = n.min(self.capacity());
    }

    /// Filled portions of each segment, in order, skipping untouched segments
    pub fn filled_slices(&self) -> Vec<IoSlice<'_>> {
        let mut remaining = self.filled;
        let mut slices = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(segment.len());
            slices.push(IoSlice::new(&segment[..take]));
            remaining -= take;
        }
        slices
    }

    /// Bytes currently filled
    pub fn filled_len(&self) -> usize {
        self.filled
    }

    /// Reset every segment's position
    pub fn clear(&mut self) {
        self.filled = 0;
    }

    /// Combined capacity of all segments
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_buffer_tracks_fill() {
        let mut buffer = CopyBuffer::new(8);
        assert!(buffer.is_empty());

        buffer.unfilled_mut()[..5].copy_from_slice(b"hello");
        buffer.advance(5);
        assert_eq!(buffer.filled(), b"hello");

        buffer.clear();
        buffer.unfilled_mut()[..2].copy_from_slice(b"hi");
        buffer.advance(2);
        // Stale "llo" must not leak into the next write
        assert_eq!(buffer.filled(), b"hi");
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_vector_buffer_filled_slices() {
        let layout = VectorLayout::new(vec![3, 5]).unwrap();
        let mut buffer = VectorBuffer::new(&layout);
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.segment_count(), 2);

        {
            let mut slices = buffer.io_slices_mut();
            slices[0].copy_from_slice(b"abc");
            slices[1][..2].copy_from_slice(b"de");
        }
        buffer.set_filled(5);

        let filled: Vec<Vec<u8>> = buffer.filled_slices().iter().map(|s| s.to_vec()).collect();
        assert_eq!(filled, vec![b"abc".to_vec(), b"de".to_vec()]);
    }

    #[test]
    fn test_vector_buffer_partial_first_segment() {
        let layout = VectorLayout::new(vec![20, 500]).unwrap();
        let mut buffer = VectorBuffer::new(&layout);
        buffer.set_filled(7);

        let slices = buffer.filled_slices();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].len(), 7);

        buffer.clear();
        assert!(buffer.filled_slices().is_empty());
        assert_eq!(buffer.filled_len(), 0);
    }
}

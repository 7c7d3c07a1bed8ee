//! Validated configuration values for StrataCP
//!
//! These types reject invalid values at construction time so that a
//! [`CopySpec`](crate::CopySpec) can never carry a zero-sized buffer.

/// Size of the intermediate buffer used by the stream strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "usize", into = "usize")
)]
pub struct BufferSize(usize);

impl BufferSize {
    /// Minimum buffer size (1 byte)
    pub const MIN: usize = 1;
    /// Maximum buffer size (64MB)
    pub const MAX: usize = 64 * 1024 * 1024;
    /// Default buffer size (1KB)
    pub const DEFAULT: usize = 1024;

    /// Create a new buffer size with validation
    pub fn new(size: usize) -> Result<Self, String> {
        if size < Self::MIN {
            Err(format!("Buffer size {} is below minimum {}", size, Self::MIN))
        } else if size > Self::MAX {
            Err(format!("Buffer size {} exceeds maximum {}", size, Self::MAX))
        } else {
            Ok(Self(size))
        }
    }

    /// Get the buffer size value
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BufferSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<usize> for BufferSize {
    type Error = String;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<BufferSize> for usize {
    fn from(size: BufferSize) -> Self {
        size.0
    }
}

/// Ordered buffer sizes used for scatter reads and gather writes
///
/// Each segment is one buffer of the vector, filled and drained in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct VectorLayout(Vec<usize>);

impl VectorLayout {
    /// Maximum number of segments in one vector
    pub const MAX_SEGMENTS: usize = 64;
    /// Default header segment size
    pub const DEFAULT_HEADER: usize = 20;
    /// Default body segment size
    pub const DEFAULT_BODY: usize = 500;

    /// Create a new layout with validation
    pub fn new(segments: Vec<usize>) -> Result<Self, String> {
        if segments.is_empty() {
            return Err("Vector layout needs at least one segment".to_string());
        }
        if segments.len() > Self::MAX_SEGMENTS {
            return Err(format!(
                "Vector layout has {} segments, maximum is {}",
                segments.len(),
                Self::MAX_SEGMENTS
            ));
        }
        if let Some(index) = segments.iter().position(|&size| size == 0) {
            return Err(format!("Vector segment {} has zero size", index));
        }
        if let Some(index) = segments.iter().position(|&size| size > BufferSize::MAX) {
            return Err(format!(
                "Vector segment {} has {} bytes, maximum is {}",
                index,
                segments[index],
                BufferSize::MAX
            ));
        }
        segments
            .iter()
            .try_fold(0usize, |total, &size| total.checked_add(size))
            .filter(|&total| total <= BufferSize::MAX)
            .ok_or_else(|| {
                format!(
                    "Vector layout exceeds the maximum of {} bytes",
                    BufferSize::MAX
                )
            })?;
        Ok(Self(segments))
    }

    /// Segment sizes in fill order
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Total capacity of one vector
    pub fn total_len(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Default for VectorLayout {
    fn default() -> Self {
        Self(vec![Self::DEFAULT_HEADER, Self::DEFAULT_BODY])
    }
}

impl TryFrom<Vec<usize>> for VectorLayout {
    type Error = String;

    fn try_from(segments: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<VectorLayout> for Vec<usize> {
    fn from(layout: VectorLayout) -> Self {
        layout.0
    }
}

impl std::str::FromStr for VectorLayout {
    type Err = String;

    /// Parse a comma separated list such as `20,500`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|e| format!("Invalid segment size '{}': {}", part, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(segments)
    }
}

impl std::fmt::Display for VectorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, true)]
    #[case(1024, true)]
    #[case(1023, true)]
    #[case(BufferSize::MAX, true)]
    #[case(0, false)]
    #[case(BufferSize::MAX + 1, false)]
    fn test_buffer_size_validation(#[case] size: usize, #[case] valid: bool) {
        assert_eq!(BufferSize::new(size).is_ok(), valid);
    }

    #[test]
    fn test_buffer_size_default() {
        assert_eq!(BufferSize::default().get(), 1024);
    }

    #[test]
    fn test_vector_layout_default() {
        let layout = VectorLayout::default();
        assert_eq!(layout.segments(), &[20, 500]);
        assert_eq!(layout.total_len(), 520);
    }

    #[test]
    fn test_vector_layout_rejects_invalid() {
        assert!(VectorLayout::new(vec![]).is_err());
        assert!(VectorLayout::new(vec![20, 0, 500]).is_err());
        assert!(VectorLayout::new(vec![1; VectorLayout::MAX_SEGMENTS + 1]).is_err());
        assert!(VectorLayout::new(vec![BufferSize::MAX, 1]).is_err());
        assert!(VectorLayout::new(vec![BufferSize::MAX + 1]).is_err());
    }

    #[rstest]
    #[case("18446744073709551615,1")]
    #[case("1,18446744073709551615")]
    #[case("9223372036854775808,9223372036854775808")]
    fn test_vector_layout_rejects_oversized_segments(#[case] input: &str) {
        if input.split(',').any(|part| part.parse::<usize>().is_err()) {
            // Values beyond usize fail to parse on narrower targets
            assert!(input.parse::<VectorLayout>().is_err());
            return;
        }
        let err = input.parse::<VectorLayout>().unwrap_err();
        assert!(err.contains("maximum"), "unexpected error: {}", err);
    }

    #[test]
    fn test_vector_layout_at_total_maximum() {
        let half = BufferSize::MAX / 2;
        let layout = VectorLayout::new(vec![half, BufferSize::MAX - half]).unwrap();
        assert_eq!(layout.total_len(), BufferSize::MAX);
    }

    #[test]
    fn test_vector_layout_parse_and_display() {
        let layout: VectorLayout = "16, 4096 ,64".parse().unwrap();
        assert_eq!(layout.segments(), &[16, 4096, 64]);
        assert_eq!(layout.to_string(), "16,4096,64");

        assert!("16,abc".parse::<VectorLayout>().is_err());
        assert!("".parse::<VectorLayout>().is_err());
    }
}

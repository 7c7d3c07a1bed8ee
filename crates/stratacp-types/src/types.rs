//! Core data types for StrataCP
//!
//! A copy is described by an immutable [`CopySpec`], performed with one
//! [`StrategyKind`], and summarised by a [`CopyResult`].

use crate::{BufferSize, VectorLayout};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transfer rate in bytes per second
pub type TransferRate = f64;

/// Transfer strategy used to move bytes from source to destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StrategyKind {
    /// Fixed-size buffer, plain read/write loop
    #[default]
    Stream,
    /// Read/write loop through internal buffering, flushed after every write
    BufferedStream,
    /// Source and destination mapped into memory
    Mapped,
    /// Scatter reads and gather writes over several fixed-size buffers
    Vectored,
}

impl StrategyKind {
    /// Every strategy, in the order comparisons run them
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Stream,
        StrategyKind::BufferedStream,
        StrategyKind::Mapped,
        StrategyKind::Vectored,
    ];

    /// Stable lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::BufferedStream => "buffered-stream",
            Self::Mapped => "mapped",
            Self::Vectored => "vectored",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            "buffered-stream" | "buffered_stream" | "buffered" => Ok(Self::BufferedStream),
            "mapped" | "mmap" => Ok(Self::Mapped),
            "vectored" | "scatter-gather" => Ok(Self::Vectored),
            other => Err(format!("Unknown copy strategy '{}'", other)),
        }
    }
}

/// Immutable description of one copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    source: PathBuf,
    destination: PathBuf,
    strategy: StrategyKind,
    buffer_size: BufferSize,
    vector_layout: VectorLayout,
}

impl CopySpec {
    /// Create a spec with the default buffer size and vector layout
    pub fn new<S, D>(source: S, destination: D, strategy: StrategyKind) -> Self
    where
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        Self {
            source: source.into(),
            destination: destination.into(),
            strategy,
            buffer_size: BufferSize::default(),
            vector_layout: VectorLayout::default(),
        }
    }

    /// Use a different stream buffer size
    pub fn with_buffer_size(mut self, buffer_size: BufferSize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Use a different scatter/gather layout
    pub fn with_vector_layout(mut self, vector_layout: VectorLayout) -> Self {
        self.vector_layout = vector_layout;
        self
    }

    /// Same paths and sizing, different strategy
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Source path
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination path
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Strategy to run
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Stream buffer size
    pub fn buffer_size(&self) -> BufferSize {
        self.buffer_size
    }

    /// Scatter/gather layout
    pub fn vector_layout(&self) -> &VectorLayout {
        &self.vector_layout
    }
}

/// Outcome of one successful copy
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CopyResult {
    /// Bytes written to the destination
    pub bytes_copied: u64,
    /// Wall-clock time from opening the source to releasing both handles
    pub elapsed_nanos: u64,
    /// Strategy that performed the transfer
    pub strategy_used: StrategyKind,
    /// Read calls (or mapped chunks) issued against the source
    pub read_calls: u64,
    /// Write calls (or mapped chunks) issued against the destination
    pub write_calls: u64,
}

impl CopyResult {
    /// Elapsed time as a [`Duration`]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos)
    }

    /// Calculate the transfer rate
    pub fn transfer_rate(&self) -> TransferRate {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.bytes_copied as f64 / secs
        } else {
            0.0
        }
    }
}

/// Lifecycle of a copy job
///
/// `Unopened -> Open -> Copying -> Closed`, and any state may fall straight
/// to `Closed` when a step fails. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CopyState {
    /// No handle acquired yet
    Unopened,
    /// Both handles acquired
    Open,
    /// Transfer in progress
    Copying,
    /// Handles released
    Closed,
}

impl CopyState {
    /// Check whether moving to `next` is allowed
    pub fn can_transition_to(self, next: CopyState) -> bool {
        matches!(
            (self, next),
            (Self::Unopened, Self::Open)
                | (Self::Open, Self::Copying)
                | (Self::Unopened | Self::Open | Self::Copying, Self::Closed)
        )
    }

    /// Whether the job has finished
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }
}

impl std::fmt::Display for CopyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unopened => "Unopened",
            Self::Open => "Open",
            Self::Copying => "Copying",
            Self::Closed => "Closed",
        };
        f.write_str(name)
    }
}

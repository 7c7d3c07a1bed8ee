//! Error types and handling for StrataCP
//!
//! Every failure of a copy is fatal to that copy. The taxonomy exists so that a
//! caller can tell *where* the copy broke (opening the source, opening the
//! destination, mid-transfer, or sizing a mapped destination) and react
//! accordingly. Nothing in the engine retries or falls back to another strategy.

use std::path::PathBuf;

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - operation can continue
    Low,
    /// Medium severity - caller may choose to continue with other work
    Medium,
    /// High severity - the current copy is aborted
    High,
    /// Critical severity - the process should stop
    Critical,
}

/// Main error type for StrataCP operations
#[derive(thiserror::Error, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// Source path is missing, unreadable or not a regular file
    #[error("Source not found: {path}: {reason}")]
    SourceNotFound {
        /// Path of the source file
        path: PathBuf,
        /// Why the source could not be opened
        reason: String,
    },

    /// Destination could not be created or opened for writing
    #[error("Destination unwritable: {path}: {reason}")]
    DestinationUnwritable {
        /// Path of the destination file
        path: PathBuf,
        /// Why the destination could not be opened
        reason: String,
    },

    /// Read or write failed in the middle of a transfer
    #[error("I/O failure: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// Destination length does not match the source length
    #[error("Size mismatch for {path}: expected {expected} bytes, found {actual} bytes")]
    SizeMismatch {
        /// Path of the destination file
        path: PathBuf,
        /// Expected length in bytes
        expected: u64,
        /// Actual length in bytes
        actual: u64,
    },

    /// Invalid configuration or copy parameters
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A copy job was driven through a transition its state machine forbids
    #[error("Invalid copy state transition: {from} -> {to}")]
    InvalidState {
        /// State the job was in
        from: String,
        /// State that was requested
        to: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Source missing or unreadable
    SourceNotFound,
    /// Destination could not be opened for write
    DestinationUnwritable,
    /// Mid-transfer read/write failure
    IoFailure,
    /// Destination could not be sized to the source length
    SizeMismatch,
    /// Configuration errors
    Config,
    /// State machine misuse
    InvalidState,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::DestinationUnwritable { .. } => ErrorKind::DestinationUnwritable,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::Config { .. } => ErrorKind::Config,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceNotFound { .. }
            | Self::DestinationUnwritable { .. }
            | Self::Io { .. }
            | Self::SizeMismatch { .. } => ErrorSeverity::High,
            Self::Config { .. } => ErrorSeverity::High,
            Self::InvalidState { .. } => ErrorSeverity::Critical,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Copy failures never are: the engine aborts on the first failure and the
    /// caller must start a fresh copy.
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Create a new source-not-found error
    pub fn source_not_found<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new destination-unwritable error
    pub fn destination_unwritable<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::DestinationUnwritable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new I/O failure carrying what was being attempted
    pub fn io<S: AsRef<str>>(operation: S, error: &std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", operation.as_ref(), error),
        }
    }

    /// Create a new size mismatch error
    pub fn size_mismatch<P: Into<PathBuf>>(path: P, expected: u64, actual: u64) -> Self {
        Self::SizeMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid state error
    pub fn invalid_state<A: ToString, B: ToString>(from: A, to: B) -> Self {
        Self::InvalidState {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

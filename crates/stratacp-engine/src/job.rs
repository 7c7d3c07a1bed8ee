//! Lifecycle tracking for a single copy

use std::path::PathBuf;
use stratacp_types::{CopySpec, CopyState, Error, Result};
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for a copy job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One copy from start to finish
///
/// A job only moves forward through [`CopyState`]; once `Closed` it cannot be
/// reused and a new job is needed for the next copy.
#[derive(Debug)]
pub struct CopyJob {
    id: JobId,
    source: PathBuf,
    destination: PathBuf,
    state: CopyState,
}

impl CopyJob {
    /// Create an unopened job for `spec`
    pub fn new(spec: &CopySpec) -> Self {
        Self {
            id: JobId::new(),
            source: spec.source().to_path_buf(),
            destination: spec.destination().to_path_buf(),
            state: CopyState::Unopened,
        }
    }

    /// Job identifier
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Current state
    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Source path
    pub fn source(&self) -> &PathBuf {
        &self.source
    }

    /// Destination path
    pub fn destination(&self) -> &PathBuf {
        &self.destination
    }

    /// Move to `next`, failing with [`Error::InvalidState`] if that is not a legal step
    pub fn transition(&mut self, next: CopyState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::invalid_state(self.state, next));
        }
        debug!("Job {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Close the job if it is not closed already
    pub fn close(&mut self) {
        if !self.state.is_terminal() {
            debug!("Job {}: {} -> {}", self.id, self.state, CopyState::Closed);
            self.state = CopyState::Closed;
        }
    }
}

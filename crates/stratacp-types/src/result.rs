//! Result type alias for StrataCP operations

use crate::Error;

/// Result type alias for StrataCP operations
pub type Result<T> = std::result::Result<T, Error>;

//! Configuration management for StrataCP
//!
//! Settings are layered: built-in defaults, then an optional file (YAML, TOML
//! or JSON, picked by extension), then `STRATACP_*` environment variables.
//!
//! # Examples
//!
//! ```rust
//! use stratacp_config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("stratacp.yaml")
//!     .add_env_prefix("STRATACP")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! println!("Buffer size: {}", config.copy.buffer_size.get());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use stratacp_types::{BufferSize, StrategyKind, VectorLayout};

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Environment variable prefix used by the default loaders
pub const ENV_PREFIX: &str = "STRATACP";

/// Main configuration structure for StrataCP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults applied to every copy
    #[serde(default)]
    pub copy: CopyConfig,
    /// Engine behaviour
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default copy parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Strategy used when none is given on the command line
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Buffer size for the stream strategies
    #[serde(default)]
    pub buffer_size: BufferSize,
    /// Segment sizes for the vectored strategy
    #[serde(default)]
    pub vector_layout: VectorLayout,
}

/// Engine behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Compare the destination length with the bytes copied after each copy
    #[serde(default = "default_verify_size")]
    pub verify_size: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verify_size: default_verify_size(),
        }
    }
}

fn default_verify_size() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

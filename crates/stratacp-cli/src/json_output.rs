//! JSON output structures for the StrataCP CLI

use serde::{Deserialize, Serialize};
use std::path::Path;
use stratacp_engine::ComparisonReport;
use stratacp_types::{CopyResult, StrategyKind};

/// JSON output for a single copy
#[derive(Debug, Serialize, Deserialize)]
pub struct CopyResultJson {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Copy statistics
    pub result: CopyStatsJson,
}

/// JSON output for a strategy comparison
#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonJson {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// One entry per strategy, in run order
    pub runs: Vec<ComparisonRunJson>,
    /// Strategy with the shortest elapsed time
    pub fastest: Option<StrategyKind>,
}

/// Operation metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// StrataCP version
    pub version: String,
    /// Operation type
    pub operation: String,
    /// Timestamp when the output was produced
    pub timestamp: String,
    /// Source path
    pub source_path: String,
    /// Destination path
    pub destination_path: String,
}

/// Statistics of one copy
#[derive(Debug, Serialize, Deserialize)]
pub struct CopyStatsJson {
    /// Strategy that ran
    pub strategy: StrategyKind,
    /// Bytes copied
    pub bytes_copied: u64,
    /// Elapsed time in nanoseconds
    pub elapsed_nanos: u64,
    /// Elapsed time in seconds
    pub duration_seconds: f64,
    /// Transfer rate in MB/s
    pub transfer_rate_mbps: f64,
    /// Read calls issued
    pub read_calls: u64,
    /// Write calls issued
    pub write_calls: u64,
}

/// One run inside a comparison
#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonRunJson {
    /// Statistics of the run
    #[serde(flatten)]
    pub stats: CopyStatsJson,
    /// Elapsed time divided by the fastest run's
    pub relative_to_fastest: f64,
}

impl OperationMetadata {
    fn new(operation: &str, source: &Path, destination: &Path) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            operation: operation.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source_path: source.display().to_string(),
            destination_path: destination.display().to_string(),
        }
    }
}

impl CopyStatsJson {
    /// Convert an engine result
    pub fn from_result(result: &CopyResult) -> Self {
        Self {
            strategy: result.strategy_used,
            bytes_copied: result.bytes_copied,
            elapsed_nanos: result.elapsed_nanos,
            duration_seconds: result.elapsed().as_secs_f64(),
            transfer_rate_mbps: result.transfer_rate() / 1024.0 / 1024.0,
            read_calls: result.read_calls,
            write_calls: result.write_calls,
        }
    }
}

impl CopyResultJson {
    /// Create the output for one copy
    pub fn new(source: &Path, destination: &Path, result: &CopyResult) -> Self {
        Self {
            metadata: OperationMetadata::new("copy", source, destination),
            result: CopyStatsJson::from_result(result),
        }
    }
}

impl ComparisonJson {
    /// Create the output for a comparison written to `destination`
    pub fn new(destination: &Path, report: &ComparisonReport) -> Self {
        let runs = report
            .results()
            .iter()
            .zip(report.relative_to_fastest())
            .map(|(result, (_, ratio))| ComparisonRunJson {
                stats: CopyStatsJson::from_result(result),
                relative_to_fastest: ratio,
            })
            .collect();

        Self {
            metadata: OperationMetadata::new("compare", report.source(), destination),
            runs,
            fastest: report.fastest().map(|r| r.strategy_used),
        }
    }
}

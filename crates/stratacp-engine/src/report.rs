//! Side-by-side timing of every strategy on one file

use std::path::{Path, PathBuf};
use stratacp_types::{CopyResult, StrategyKind};

/// Results of copying the same source once with each strategy
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonReport {
    source: PathBuf,
    results: Vec<CopyResult>,
}

impl ComparisonReport {
    /// Create a report from results in run order
    pub fn new<P: Into<PathBuf>>(source: P, results: Vec<CopyResult>) -> Self {
        Self {
            source: source.into(),
            results,
        }
    }

    /// Source that was copied
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Results in the order the strategies ran
    pub fn results(&self) -> &[CopyResult] {
        &self.results
    }

    /// Result for one strategy
    pub fn get(&self, strategy: StrategyKind) -> Option<&CopyResult> {
        self.results.iter().find(|r| r.strategy_used == strategy)
    }

    /// Quickest run; the earlier run wins a tie
    pub fn fastest(&self) -> Option<&CopyResult> {
        self.results
            .iter()
            .reduce(|best, r| if r.elapsed_nanos < best.elapsed_nanos { r } else { best })
    }

    /// Slowest run; the earlier run wins a tie
    pub fn slowest(&self) -> Option<&CopyResult> {
        self.results
            .iter()
            .reduce(|worst, r| if r.elapsed_nanos > worst.elapsed_nanos { r } else { worst })
    }

    /// Elapsed time of each run divided by the fastest run's, in run order
    pub fn relative_to_fastest(&self) -> Vec<(StrategyKind, f64)> {
        let Some(fastest) = self.fastest() else {
            return Vec::new();
        };
        let base = fastest.elapsed_nanos.max(1) as f64;
        self.results
            .iter()
            .map(|r| (r.strategy_used, r.elapsed_nanos.max(1) as f64 / base))
            .collect()
    }
}

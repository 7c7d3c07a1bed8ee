//! Main copy engine implementation

use crate::job::CopyJob;
use crate::report::ComparisonReport;
use std::fs;
use std::path::Path;
use std::time::Instant;
use stratacp_config::Config;
use stratacp_io::{strategy_for, FileReader, FileWriter, TransferOutcome};
use stratacp_types::{
    BufferSize, CopyResult, CopySpec, CopyState, Error, Result, StrategyKind, VectorLayout,
};
use tracing::{debug, info, info_span, warn};

/// Engine behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Check the destination length against the source after every copy
    pub verify_size: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { verify_size: true }
    }
}

impl EngineOptions {
    /// Take the engine section of a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            verify_size: config.engine.verify_size,
        }
    }
}

/// Synchronous copy engine
///
/// Holds no per-copy state, so one engine can serve any number of copies,
/// including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct CopyEngine {
    options: EngineOptions,
}

impl CopyEngine {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit options
    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Copy `spec.source()` to `spec.destination()` with `spec.strategy()`
    ///
    /// Both files are closed before this returns, on success and on failure.
    pub fn copy(&self, spec: &CopySpec) -> Result<CopyResult> {
        let mut job = CopyJob::new(spec);
        let span = info_span!("copy_job", id = %job.id(), strategy = %spec.strategy());
        let _guard = span.enter();

        info!(
            "Copying {} -> {}",
            spec.source().display(),
            spec.destination().display()
        );

        let start = Instant::now();
        let transferred = self.run(&mut job, spec);
        let elapsed = start.elapsed();
        job.close();

        let (outcome, source_size) = match transferred {
            Ok(done) => done,
            Err(e) => {
                warn!("Copy failed: {}", e);
                return Err(e);
            }
        };

        if self.options.verify_size {
            Self::verify_size(spec.destination(), source_size, &outcome)?;
        }

        let result = CopyResult {
            bytes_copied: outcome.bytes_copied,
            elapsed_nanos: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            strategy_used: spec.strategy(),
            read_calls: outcome.read_calls,
            write_calls: outcome.write_calls,
        };

        info!(
            "Copied {} bytes in {:?} ({} reads, {} writes)",
            result.bytes_copied, elapsed, result.read_calls, result.write_calls
        );
        Ok(result)
    }

    /// Copy `source` to `destination` once with every strategy, in
    /// [`StrategyKind::ALL`] order, overwriting the destination each time
    ///
    /// The first failure aborts the comparison.
    pub fn compare<S, D>(
        &self,
        source: S,
        destination: D,
        buffer_size: BufferSize,
        layout: &VectorLayout,
    ) -> Result<ComparisonReport>
    where
        S: AsRef<Path>,
        D: AsRef<Path>,
    {
        let source = source.as_ref();
        let destination = destination.as_ref();

        let mut results = Vec::with_capacity(StrategyKind::ALL.len());
        for strategy in StrategyKind::ALL {
            let spec = CopySpec::new(source, destination, strategy)
                .with_buffer_size(buffer_size)
                .with_vector_layout(layout.clone());
            let result = self.copy(&spec).map_err(|e| {
                warn!("Comparison aborted at {}: {}", strategy, e);
                e
            })?;
            results.push(result);
        }

        Ok(ComparisonReport::new(source, results))
    }

    fn run(&self, job: &mut CopyJob, spec: &CopySpec) -> Result<(TransferOutcome, u64)> {
        let reader = FileReader::open(spec.source())?;
        Self::reject_same_file(&reader, spec.destination())?;
        let writer = FileWriter::create(spec.destination())?;
        job.transition(CopyState::Open)?;

        let source_size = reader.file_size();
        let strategy = strategy_for(spec);
        debug!("Dispatching {} bytes to {:?}", source_size, strategy);

        job.transition(CopyState::Copying)?;
        let outcome = strategy.transfer(reader, writer)?;
        job.transition(CopyState::Closed)?;

        Ok((outcome, source_size))
    }

    /// Truncating the destination must never destroy the source
    ///
    /// The open source handle is compared with whatever the destination path
    /// resolves to, so symlinks and hard links to the source are caught too.
    fn reject_same_file(reader: &FileReader, destination: &Path) -> Result<()> {
        let Ok(existing) = fs::metadata(destination) else {
            return Ok(());
        };
        let source = reader
            .file()
            .metadata()
            .map_err(|e| Error::source_not_found(reader.path(), e.to_string()))?;

        if is_same_file(&source, &existing, reader.path(), destination) {
            return Err(Error::destination_unwritable(
                destination,
                "destination is the source file",
            ));
        }
        Ok(())
    }

    fn verify_size(destination: &Path, expected: u64, outcome: &TransferOutcome) -> Result<()> {
        if outcome.bytes_copied != expected {
            return Err(Error::size_mismatch(
                destination,
                expected,
                outcome.bytes_copied,
            ));
        }

        let actual = fs::metadata(destination)
            .map_err(|e| Error::io("stat destination", &e))?
            .len();
        if actual != expected {
            return Err(Error::size_mismatch(destination, expected, actual));
        }

        debug!("Verified destination size: {} bytes", actual);
        Ok(())
    }
}

#[cfg(unix)]
fn is_same_file(source: &fs::Metadata, destination: &fs::Metadata, _: &Path, _: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    source.dev() == destination.dev() && source.ino() == destination.ino()
}

#[cfg(not(unix))]
fn is_same_file(_: &fs::Metadata, _: &fs::Metadata, source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

/// Builder for creating a copy engine from configuration
#[derive(Debug, Default)]
pub struct EngineBuilder {
    options: EngineOptions,
}

impl EngineBuilder {
    /// Create a new engine builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Take engine options from a loaded configuration
    pub fn with_config(mut self, config: &Config) -> Self {
        self.options = EngineOptions::from_config(config);
        self
    }

    /// Enable or disable post-copy size verification
    pub fn verify_size(mut self, enabled: bool) -> Self {
        self.options.verify_size = enabled;
        self
    }

    /// Build the engine
    pub fn build(self) -> CopyEngine {
        CopyEngine::with_options(self.options)
    }
}

//! StrataCP - strategy-pluggable single-file copy tool
//!
//! Copies one file with a chosen transfer strategy and reports how long it
//! took, or runs every strategy in turn so they can be compared.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use stratacp_config::{Config, ConfigLoader};
use stratacp_engine::{CopyEngine, EngineBuilder};
use stratacp_types::{BufferSize, CopySpec, StrategyKind, VectorLayout};
use tracing::info;

mod display;
mod json_output;

use display::{create_spinner, print_comparison, print_copy_result};
use json_output::{ComparisonJson, CopyResultJson};

/// StrataCP - strategy-pluggable single-file copy tool
#[derive(Parser)]
#[command(
    name = "stratacp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy a file with a selectable transfer strategy and time it",
    long_about = "StrataCP copies one file to one destination using a stream, buffered\n\
                  stream, memory-mapped or scatter/gather vectored transfer, and reports\n\
                  the elapsed time so the strategies can be compared on real files."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a single file
    Copy {
        /// Source file
        source: PathBuf,
        /// Destination file (created or truncated)
        destination: PathBuf,
        /// Transfer strategy
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Buffer size in bytes for the stream strategies
        #[arg(short, long)]
        buffer_size: Option<usize>,
        /// Comma-separated segment sizes for the vectored strategy, e.g. 20,500
        #[arg(long)]
        vector_layout: Option<VectorLayout>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy a file once with every strategy and compare timings
    Compare {
        /// Source file
        source: PathBuf,
        /// Destination file, overwritten by every run
        destination: PathBuf,
        /// Buffer size in bytes for the stream strategies
        #[arg(short, long)]
        buffer_size: Option<usize>,
        /// Comma-separated segment sizes for the vectored strategy
        #[arg(long)]
        vector_layout: Option<VectorLayout>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum StrategyArg {
    Stream,
    BufferedStream,
    Mapped,
    Vectored,
}

impl From<StrategyArg> for StrategyKind {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Stream => StrategyKind::Stream,
            StrategyArg::BufferedStream => StrategyKind::BufferedStream,
            StrategyArg::Mapped => StrategyKind::Mapped,
            StrategyArg::Vectored => StrategyKind::Vectored,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load_default().context("Failed to load configuration")?,
    };

    init_logging(&cli, &config)?;

    info!("StrataCP v{} starting", env!("CARGO_PKG_VERSION"));

    let engine = EngineBuilder::new().with_config(&config).build();

    match cli.command {
        Commands::Copy {
            source,
            destination,
            strategy,
            buffer_size,
            vector_layout,
            json,
        } => {
            let spec = CopySpec::new(
                source,
                destination,
                strategy.map_or(config.copy.strategy, Into::into),
            )
            .with_buffer_size(resolve_buffer_size(buffer_size, &config)?)
            .with_vector_layout(vector_layout.unwrap_or_else(|| config.copy.vector_layout.clone()));
            copy_command(&engine, &spec, cli.quiet, json)?;
        }
        Commands::Compare {
            source,
            destination,
            buffer_size,
            vector_layout,
            json,
        } => {
            let buffer_size = resolve_buffer_size(buffer_size, &config)?;
            let layout = vector_layout.unwrap_or_else(|| config.copy.vector_layout.clone());
            compare_command(&engine, source, destination, buffer_size, &layout, cli.quiet, json)?;
        }
        Commands::Config { default } => {
            config_command(default, &config)?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

fn resolve_buffer_size(requested: Option<usize>, config: &Config) -> Result<BufferSize> {
    match requested {
        Some(size) => BufferSize::new(size).map_err(|e| anyhow::anyhow!("--buffer-size: {}", e)),
        None => Ok(config.copy.buffer_size),
    }
}

fn copy_command(engine: &CopyEngine, spec: &CopySpec, quiet: bool, json: bool) -> Result<()> {
    let interactive = !quiet && !json;

    if interactive {
        println!(
            "{} Copying {} to {} ({})",
            style("→").green().bold(),
            style(spec.source().display()).cyan(),
            style(spec.destination().display()).cyan(),
            style(spec.strategy()).yellow()
        );
    }

    let spinner = create_spinner(!interactive);
    if let Some(pb) = &spinner {
        pb.set_message(format!("Copying with {}...", spec.strategy()));
    }

    let result = engine.copy(spec);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let result = result.with_context(|| {
        format!(
            "Failed to copy {} to {}",
            spec.source().display(),
            spec.destination().display()
        )
    })?;

    if json {
        let output = CopyResultJson::new(spec.source(), spec.destination(), &result);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !quiet {
        print_copy_result(&result);
    }

    Ok(())
}

fn compare_command(
    engine: &CopyEngine,
    source: PathBuf,
    destination: PathBuf,
    buffer_size: BufferSize,
    layout: &VectorLayout,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let interactive = !quiet && !json;

    if interactive {
        println!(
            "{} Comparing strategies on {}",
            style("⟲").blue().bold(),
            style(source.display()).cyan()
        );
    }

    let spinner = create_spinner(!interactive);
    if let Some(pb) = &spinner {
        pb.set_message("Running every strategy...");
    }

    let report = engine.compare(&source, &destination, buffer_size, layout);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let report = report.with_context(|| format!("Comparison on {} failed", source.display()))?;

    if json {
        let output = ComparisonJson::new(&destination, &report);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !quiet {
        print_comparison(&report);
    }

    Ok(())
}

fn config_command(default: bool, current: &Config) -> Result<()> {
    let (label, config) = if default {
        ("Default configuration:", Config::default())
    } else {
        ("Current configuration:", current.clone())
    };

    println!("{} {}", style("⚙").blue().bold(), label);
    if !default {
        match ConfigLoader::config_exists() {
            Some(path) => println!("  loaded from {}", style(path.display()).cyan()),
            None => println!("  {}", style("no configuration file found, using defaults").dim()),
        }
    }
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_copy_arguments() {
        let cli = Cli::try_parse_from([
            "stratacp",
            "copy",
            "in.bin",
            "out.bin",
            "--strategy",
            "buffered-stream",
            "--buffer-size",
            "4096",
            "--vector-layout",
            "16,256",
        ])
        .unwrap();

        match cli.command {
            Commands::Copy {
                strategy,
                buffer_size,
                vector_layout,
                json,
                ..
            } => {
                assert_eq!(
                    StrategyKind::from(strategy.unwrap()),
                    StrategyKind::BufferedStream
                );
                assert_eq!(buffer_size, Some(4096));
                assert_eq!(vector_layout.unwrap().segments(), &[16, 256]);
                assert!(!json);
            }
            _ => panic!("expected copy command"),
        }
    }

    #[test]
    fn test_rejects_bad_vector_layout() {
        let parsed = Cli::try_parse_from(["stratacp", "copy", "a", "b", "--vector-layout", "20,0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_rejects_overflowing_vector_layout() {
        let parsed = Cli::try_parse_from([
            "stratacp",
            "compare",
            "a",
            "b",
            "--vector-layout",
            "18446744073709551615,1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_rejects_zero_buffer_size() {
        assert!(resolve_buffer_size(Some(0), &Config::default()).is_err());
        assert_eq!(
            resolve_buffer_size(None, &Config::default()).unwrap().get(),
            1024
        );
    }
}

//! Human-readable output for the StrataCP CLI

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use stratacp_engine::ComparisonReport;
use stratacp_types::CopyResult;

/// Spinner shown while a copy runs; `None` when output is suppressed
pub fn create_spinner(hidden: bool) -> Option<ProgressBar> {
    if hidden {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Print the outcome of a single copy
pub fn print_copy_result(result: &CopyResult) {
    println!();
    println!("{}", style("Copy Statistics:").bold().underlined());
    println!("  Strategy: {}", style(result.strategy_used).yellow());
    println!(
        "  Bytes copied: {}",
        style(format_bytes(result.bytes_copied)).green()
    );
    println!(
        "  Duration: {}",
        style(format_duration(result.elapsed())).blue()
    );
    println!(
        "  Transfer rate: {}",
        style(format_rate(result.transfer_rate())).blue()
    );
    println!(
        "  I/O calls: {} reads, {} writes",
        style(result.read_calls).cyan(),
        style(result.write_calls).cyan()
    );
}

/// Print one line per strategy, marking the fastest
pub fn print_comparison(report: &ComparisonReport) {
    let fastest = report.fastest().map(|r| r.strategy_used);

    println!();
    println!("{}", style("Strategy Comparison:").bold().underlined());
    println!(
        "  {:<16} {:>12} {:>14} {:>8} {:>10}",
        "strategy", "time", "rate", "x best", "writes"
    );

    for (result, (_, ratio)) in report.results().iter().zip(report.relative_to_fastest()) {
        let name = format!("{:<16}", result.strategy_used.as_str());
        let name = if Some(result.strategy_used) == fastest {
            style(name).green().bold()
        } else {
            style(name)
        };
        println!(
            "  {} {:>12} {:>14} {:>8} {:>10}",
            name,
            format_duration(result.elapsed()),
            format_rate(result.transfer_rate()),
            format!("{:.2}", ratio),
            result.write_calls
        );
    }

    if let Some(best) = report.fastest() {
        println!();
        println!(
            "{} Fastest: {} ({})",
            style("✓").green(),
            style(best.strategy_used).green().bold(),
            format_bytes(best.bytes_copied)
        );
    }
}

/// Format a byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format a duration, down to microseconds for short copies
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if duration < Duration::from_millis(1) {
        format!("{}µs", duration.as_micros())
    } else if secs < 1 {
        format!("{:.2}ms", duration.as_secs_f64() * 1000.0)
    } else if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Format a rate in bytes per second as MB/s
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{:.2} MB/s", bytes_per_sec / 1024.0 / 1024.0)
}

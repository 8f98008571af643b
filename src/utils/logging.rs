//! Logging helpers
//!
//! Subscriber setup plus the banner/summary lines every subcommand prints

use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
    });
    // a second init (tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// Logs the run banner
///
/// # Parameters
/// - `command`: subcommand name
pub fn log_startup(command: &str) {
    info!("{}", "=".repeat(60));
    info!("cv-gen {} - {}", command, chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
}

/// Logs an input file being read
pub fn log_input_loaded(path: &Path, records: usize) {
    info!("Loaded {} records from {}", records, path.display());
}

/// Logs an output file being written
pub fn log_output_written(path: &Path, bytes: usize) {
    info!("✓ Wrote {} ({} bytes)", path.display(), bytes);
}

/// Logs one record at debug level as truncated JSON
pub fn log_record<T: serde::Serialize>(label: &str, record: &T) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let json = serde_json::to_string(record).unwrap_or_default();
        debug!("Processing {}: {}", label, truncate_text(&json, 200));
    }
}

/// Prints the end-of-run summary
///
/// # Parameters
/// - `outputs`: number of files written
/// - `processed`: records rendered
/// - `skipped`: records left out
pub fn print_final_stats(outputs: usize, processed: usize, skipped: usize) {
    info!("{}", "=".repeat(60));
    info!("Finished at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Outputs written: {}", outputs);
    info!("Records processed: {}", processed);
    info!("Records skipped: {}", skipped);
    info!("{}", "=".repeat(60));
}

/// Truncates long text for log display
///
/// # Parameters
/// - `text`: original text
/// - `max_len`: maximum number of characters kept
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

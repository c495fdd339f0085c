//! # EnOcean Monitor
//!
//! Decode an EnOcean transceiver byte stream from stdin and print one JSON
//! line per telegram on stdout.
//!
//! The stream is read until end of input or Ctrl+C. Logs go to stderr, or to
//! a daily rolling file when `logging.log_dir` is configured.

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

use enocean_codec::config::{Config, LoggingConfig};
use enocean_codec::monitor;

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "enocean-monitor.log";

/// Main entry point for the EnOcean monitor
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration from the path given as first argument, or defaults
///    - Set up logging with tracing subscriber
///
/// 2. **Main Loop**
///    - Split stdin into ESP3 or ESP2 frames
///    - Decode each frame and write its JSON record to stdout
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be read or is invalid
/// - Reading stdin or writing stdout fails
///
/// # Examples
///
/// ```bash
/// xxd -r -p capture.hex | cargo run --release -- config/monitor.toml
/// ```
///
/// Expected output:
/// ```text
/// {"timestamp":"2024-03-01T12:30:00.000Z","protocol":"esp3","packet_type":"RADIO_ERP1","rorg":"RPS",...}
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::default(),
    };

    let _log_guard = init_logging(&config.logging);

    info!("EnOcean Monitor v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Reading {:?} frames ({:?} encoding) from stdin",
        config.input.protocol, config.input.encoding
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = monitor::run_configured(stdin, stdout, &config) => {
            let stats = result.context("Monitor stopped on I/O error")?;
            info!(
                "End of input: {} frames, {} packets, {} skipped, {} errors",
                stats.frames, stats.packets, stats.skipped, stats.errors
            );
            info!(
                "Stream: {} bytes discarded, {} resyncs, {} bytes overflowed",
                stats.buffer.discarded_bytes, stats.buffer.resyncs, stats.buffer.overflow_bytes
            );
        }

        // Handle Ctrl+C for graceful shutdown
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}

/// Install the tracing subscriber
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = parse_level(&config.level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let Some((writer, guard)) = file_writer(config) else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return None;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Non-blocking daily rolling writer, `None` when logging to stderr
fn file_writer(config: &LoggingConfig) -> Option<(NonBlocking, WorkerGuard)> {
    if config.log_dir.is_empty() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}

fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

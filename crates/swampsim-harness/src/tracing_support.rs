//! Structured logging for experiment runs
//!
//! The harness emits `tracing` spans and events; nothing is printed unless
//! the application installs a subscriber, typically with [`init_tracing`].
//!
//! # Example
//!
//! ```no_run
//! use swampsim_harness::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "swampsim_harness=debug,info".to_string(),
//!     ..TracingConfig::default()
//! })
//! .unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive (e.g. `RUST_LOG=swampsim_harness=debug`)
//! - `SWAMPSIM_LOG_FORMAT`: `pretty`, `json` or `compact` (default: `pretty`)

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "SWAMPSIM_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "swampsim_harness=info,swampsim_sim=warn,warn";

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line human-readable output
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line per event
    Compact,
}

impl TracingFormat {
    /// Parse from string, falling back to `Pretty`
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: TracingFormat,
    /// Filter directive (e.g. "swampsim_harness=debug,info")
    pub filter: String,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_file: bool,
    pub with_line_number: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_file: false,
            with_line_number: false,
        }
    }
}

/// Install a global subscriber
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    let installed = match config.format {
        TracingFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_file(config.with_file)
                .with_line_number(config.with_line_number)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
        TracingFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_file(config.with_file)
                .with_line_number(config.with_line_number)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
        TracingFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_file(config.with_file)
                .with_line_number(config.with_line_number)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
    };

    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}

/// Event for one finished repetition
pub fn record_run(row: usize, rep: usize, seed: u64, final_error: f64, elapsed: f64, iterations: usize) {
    tracing::debug!(
        row = row,
        rep = rep,
        seed = seed,
        final_error = final_error,
        elapsed = elapsed,
        iterations = iterations,
        "run_complete"
    );
}

/// Event for one summarized grid row
pub fn record_row_summary(row: usize, runs: usize, err_mean: f64, err_std: f64, time_mean: f64) {
    tracing::info!(
        row = row,
        runs = runs,
        err_mean = err_mean,
        err_std = err_std,
        time_mean = time_mean,
        "row_summarized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[test]
    fn test_tracing_format_parse() {
        assert_eq!(TracingFormat::parse("json"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse("JSON"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse("pretty"), TracingFormat::Pretty);
        assert_eq!(TracingFormat::parse("compact"), TracingFormat::Compact);
        assert_eq!(TracingFormat::parse("unknown"), TracingFormat::Pretty);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| std::io::Error::other("poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_record_run_emits_fields() {
        let out = capture(|| record_run(4, 2, 2, 0.5, 0.25, 10));
        assert!(out.contains("DEBUG"), "{}", out);
        assert!(out.contains("run_complete"), "{}", out);
        for field in ["row=4", "rep=2", "seed=2", "final_error=0.5", "elapsed=0.25", "iterations=10"] {
            assert!(out.contains(field), "missing {} in {}", field, out);
        }
    }

    #[test]
    fn test_record_row_summary_emits_fields() {
        let out = capture(|| record_row_summary(16, 3, 0.5, 0.125, 0.75));
        assert!(out.contains("INFO"), "{}", out);
        assert!(out.contains("row_summarized"), "{}", out);
        for field in ["row=16", "runs=3", "err_mean=0.5", "err_std=0.125", "time_mean=0.75"] {
            assert!(out.contains(field), "missing {} in {}", field, out);
        }
    }

    #[test]
    fn test_debug_events_filtered_at_info() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, || record_run(1, 0, 0, 0.5, 0.01, 1));
        assert!(captured.0.lock().unwrap().is_empty());
    }
}

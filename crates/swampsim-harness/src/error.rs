//! Error types for the experiment harness and results table

use swampsim_core::KernelError;
use swampsim_sim::SimError;
use thiserror::Error;

/// Failures surfaced by the harness
///
/// Per-run variants carry the grid row label, repetition index and seed so
/// the failing simulation can be reproduced exactly.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid grid row: {source}")]
    InvalidGridRow {
        #[source]
        source: SimError,
    },

    #[error("Simulation failed for row {row}, repetition {rep} (seed {seed}): {source}")]
    Simulation {
        row: usize,
        rep: usize,
        seed: u64,
        #[source]
        source: SimError,
    },

    #[error("Algorithm '{algorithm}' failed for row {row}, repetition {rep} (seed {seed}): {reason}")]
    ExternalAlgorithmFailure {
        row: usize,
        rep: usize,
        seed: u64,
        algorithm: String,
        reason: String,
    },

    #[error("Aggregation failed for row {row}: {reason}")]
    Aggregation { row: usize, reason: String },

    #[error("Dataset '{name}' could not be loaded: {reason}")]
    Dataset { name: String, reason: String },

    #[error("Results table error: {0}")]
    Table(#[from] TableError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Failures reading or writing a results table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected header: expected {expected:?}, found {found:?}")]
    Header {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Line {line}, column '{column}': cannot parse '{value}'")]
    Parse {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Row {label} has {found} runs, table has {expected}")]
    RunCount {
        label: usize,
        expected: usize,
        found: usize,
    },

    #[error("Results table has no rows")]
    Empty,
}

/// Result type for table I/O
pub type TableResult<T> = Result<T, TableError>;

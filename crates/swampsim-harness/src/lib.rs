//! # swampsim-harness - Benchmarking CP algorithms on swamps and bottlenecks
//!
//! Sweeps a fixed grid of tensor types through a pluggable factorization
//! routine and collects per-run errors and timings into a results table.
//!
//! ## Components
//!
//! - [`ParameterGrid`]: the 16 tensor types (rank × size × collinearity)
//! - [`Factorizer`]: the algorithm under test, with a declared
//!   [`Representation`]
//! - [`ExperimentHarness`]: simulation, factorization and error correction
//! - [`summarize`] / [`ResultsTable`]: per-row statistics and CSV output
//! - [`tracing_support`]: subscriber setup for the harness's spans
//!
//! ## Error correction
//!
//! When noise was injected the harness discards the algorithm's own fit and
//! reports ‖Z − Ẑ‖, the distance between the noiseless array and the
//! reconstruction of the returned factors. Noiseless runs report the
//! algorithm's last residual.
//!
//! ## Reproducibility
//!
//! Repetition `k` of every row simulates with seed `k` and passes the same
//! seed to the factorizer.

#![deny(warnings)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod factorizer;
pub mod grid;
pub mod harness;
pub mod loader;
pub mod table;
pub mod tracing_support;


pub use aggregate::{summarize, ResultsRow, Summary};
pub use config::{ErrorScale, GridConfig, HarnessConfig};
pub use error::{HarnessError, HarnessResult, TableError, TableResult};
pub use factorizer::{Factorization, FactorizeRequest, Factorizer, Representation, TensorInput};
pub use grid::{GridRow, ParameterGrid};
pub use harness::{ExperimentHarness, RunRecord};
pub use loader::{DatasetLoader, InMemoryLoader};
pub use table::{columns, ResultsTable};
pub use tracing_support::{init_tracing, TracingConfig, TracingFormat};

//! Experiment loop
//!
//! For every grid row the harness simulates `runs` arrays (seed = repetition
//! index), hands each one to the factorizer in the layout it declares and
//! scores the returned factors. Noisy runs are scored against the noiseless
//! array, so the reported error measures recovery of the true structure
//! rather than fit to the noise.

use crate::aggregate::summarize;
use crate::config::{ErrorScale, HarnessConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::factorizer::{Factorization, FactorizeRequest, Factorizer, TensorInput};
use crate::grid::{GridRow, ParameterGrid};
use crate::loader::DatasetLoader;
use crate::table::ResultsTable;
use crate::tracing_support::{record_row_summary, record_run};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use swampsim_core::{DenseND, FactorSet};
use swampsim_sim::{simulate, SimError, Simulation};

/// Outcome of one repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Seed of the simulated array and of the factorizer's initialization
    pub seed: u64,
    /// Error used for the summary statistics
    pub final_error: f64,
    /// Last value of the factorizer's own error trace
    pub reported_error: f64,
    /// Wall-clock seconds spent in the factorization call
    pub elapsed: f64,
    /// Seconds the factorizer reported for itself
    pub reported_elapsed: f64,
    pub error_trace: Vec<f64>,
    pub iteration_times: Vec<f64>,
}

impl RunRecord {
    pub fn new(
        seed: u64,
        final_error: f64,
        reported_error: f64,
        elapsed: f64,
        error_trace: Vec<f64>,
        iteration_times: Vec<f64>,
    ) -> Self {
        Self {
            seed,
            final_error,
            reported_error,
            elapsed,
            reported_elapsed: elapsed,
            error_trace,
            iteration_times,
        }
    }

    pub fn with_reported_elapsed(mut self, reported_elapsed: f64) -> Self {
        self.reported_elapsed = reported_elapsed;
        self
    }

    pub fn iterations(&self) -> usize {
        self.error_trace.len()
    }
}

/// Drives factorizers over simulated or loaded tensors
///
/// # Examples
///
/// ```
/// use swampsim_harness::{
///     ExperimentHarness, Factorization, FactorizeRequest, Factorizer, GridRow, HarnessConfig,
///     TensorInput,
/// };
/// use swampsim_sim::simulate;
///
/// /// Returns the generating factors of the simulated array
/// struct Oracle {
///     row: GridRow,
/// }
///
/// impl Factorizer for Oracle {
///     fn name(&self) -> &str {
///         "oracle"
///     }
///
///     fn factorize(
///         &mut self,
///         _input: &TensorInput,
///         request: &FactorizeRequest,
///     ) -> anyhow::Result<Factorization> {
///         let params = self.row.simulation_params(Default::default());
///         let sim = simulate(request.seed, &params)?;
///         Ok(Factorization {
///             elapsed: 0.0,
///             error_trace: vec![0.0],
///             factors: sim.factors,
///             iteration_times: vec![0.0],
///         })
///     }
/// }
///
/// let row = GridRow::new(2, 6, 0.5, 2);
/// let harness = ExperimentHarness::new(HarnessConfig::default()).unwrap();
/// let records = harness.run_row(1, &row, &mut Oracle { row }).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].seed, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExperimentHarness {
    config: HarnessConfig,
}

impl ExperimentHarness {
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every repetition of one grid row
    ///
    /// `label` is the row's 1-based grid label and only appears in logs and
    /// errors. The first failing repetition aborts the row.
    pub fn run_row<F>(
        &self,
        label: usize,
        row: &GridRow,
        factorizer: &mut F,
    ) -> HarnessResult<Vec<RunRecord>>
    where
        F: Factorizer + ?Sized,
    {
        row.validate()?;
        let span = tracing::info_span!(
            "grid_row",
            row = label,
            rank = row.rank,
            size = row.size,
            collinearity = row.collinearity,
            algorithm = factorizer.name()
        );
        let _enter = span.enter();

        let mut records = Vec::with_capacity(row.runs);
        for rep in 0..row.runs {
            match self.run_once(label, rep, row, factorizer) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(row = label, rep = rep, error = %e, "run failed");
                    return Err(e);
                }
            }
        }
        Ok(records)
    }

    /// Run and summarize every row, then assemble the table
    ///
    /// Any failure aborts the experiment; no partial table is produced.
    pub fn run_grid<F>(&self, grid: &ParameterGrid, factorizer: &mut F) -> HarnessResult<ResultsTable>
    where
        F: Factorizer + ?Sized,
    {
        tracing::info!(
            rows = grid.len(),
            runs = grid.runs(),
            algorithm = factorizer.name(),
            "starting grid"
        );

        let mut rows = Vec::with_capacity(grid.len());
        for (label, row) in grid.labeled() {
            let records = self.run_row(label, row, factorizer)?;
            let summarized = summarize(label, row, &records)?;
            record_row_summary(
                label,
                row.runs,
                summarized.summary.err_mean,
                summarized.summary.err_std,
                summarized.summary.time_mean,
            );
            rows.push(summarized);
        }

        Ok(ResultsTable::new(rows)?)
    }

    /// Factorize a loaded dataset `repetitions` times (seed = repetition)
    ///
    /// No ground truth exists, so the final error is the factorizer's last
    /// reported residual. Failures report row 0.
    pub fn run_dataset<L, F>(
        &self,
        loader: &L,
        name: &str,
        rank: usize,
        repetitions: usize,
        factorizer: &mut F,
    ) -> HarnessResult<Vec<RunRecord>>
    where
        L: DatasetLoader + ?Sized,
        F: Factorizer + ?Sized,
    {
        if rank == 0 {
            return Err(HarnessError::InvalidParameter {
                name: "rank",
                reason: "must be at least 1".to_string(),
            });
        }
        let input = loader
            .load(name, factorizer.representation())
            .map_err(|e| HarnessError::Dataset {
                name: name.to_string(),
                reason: format!("{:#}", e),
            })?;
        let shape = input.shape().to_vec();

        let span = tracing::info_span!("dataset", name = name, rank = rank);
        let _enter = span.enter();

        let mut records = Vec::with_capacity(repetitions);
        for rep in 0..repetitions {
            let seed = rep as u64;
            let (output, wall) =
                self.call_factorizer(0, rep, seed, rank, &input, &shape, factorizer)?;
            let reported = last_residual(&output);
            record_run(0, rep, seed, reported, wall, output.error_trace.len());
            records.push(
                RunRecord::new(
                    seed,
                    reported,
                    reported,
                    wall,
                    output.error_trace,
                    output.iteration_times,
                )
                .with_reported_elapsed(output.elapsed),
            );
        }
        Ok(records)
    }

    fn run_once<F>(
        &self,
        label: usize,
        rep: usize,
        row: &GridRow,
        factorizer: &mut F,
    ) -> HarnessResult<RunRecord>
    where
        F: Factorizer + ?Sized,
    {
        let seed = rep as u64;
        let span = tracing::debug_span!("run", rep = rep, seed = seed);
        let _enter = span.enter();

        let params = row.simulation_params(self.config.bottleneck);
        let Simulation {
            clean,
            doubly_noisy,
            ..
        } = simulate(seed, &params).map_err(|source| HarnessError::Simulation {
            row: label,
            rep,
            seed,
            source,
        })?;

        let noisy = row.is_noisy();
        let target = if noisy { doubly_noisy } else { clean.clone() };
        let input = TensorInput::from_dense(target, factorizer.representation())?;

        let (output, wall) =
            self.call_factorizer(label, rep, seed, row.rank, &input, clean.shape(), factorizer)?;
        let reported = last_residual(&output);

        let final_error = if noisy {
            self.corrected_error(&clean, &output.factors)
                .map_err(|reason| match reason {
                    Correction::DegenerateNorm => HarnessError::Simulation {
                        row: label,
                        rep,
                        seed,
                        source: SimError::DivisionByDegenerateNorm {
                            what: "noiseless tensor",
                        },
                    },
                    Correction::Kernel(reason) => HarnessError::ExternalAlgorithmFailure {
                        row: label,
                        rep,
                        seed,
                        algorithm: factorizer.name().to_string(),
                        reason,
                    },
                })?
        } else {
            reported
        };

        record_run(label, rep, seed, final_error, wall, output.error_trace.len());
        Ok(RunRecord::new(
            seed,
            final_error,
            reported,
            wall,
            output.error_trace,
            output.iteration_times,
        )
        .with_reported_elapsed(output.elapsed))
    }

    #[allow(clippy::too_many_arguments)]
    fn call_factorizer<F>(
        &self,
        label: usize,
        rep: usize,
        seed: u64,
        rank: usize,
        input: &TensorInput,
        shape: &[usize],
        factorizer: &mut F,
    ) -> HarnessResult<(Factorization, f64)>
    where
        F: Factorizer + ?Sized,
    {
        let request = FactorizeRequest {
            rank,
            max_iters: self.config.max_iters,
            seed,
            tol: self.config.tol,
        };
        let failure = |algorithm: &str, reason: String| HarnessError::ExternalAlgorithmFailure {
            row: label,
            rep,
            seed,
            algorithm: algorithm.to_string(),
            reason,
        };

        let started = Instant::now();
        let output = factorizer
            .factorize(input, &request)
            .map_err(|e| failure(factorizer.name(), format!("{:#}", e)))?;
        let wall = started.elapsed().as_secs_f64();

        validate_output(&output, shape, rank).map_err(|reason| failure(factorizer.name(), reason))?;
        tracing::debug!(
            reported_elapsed = output.elapsed,
            wall_elapsed = wall,
            iterations = output.error_trace.len(),
            "factorizer returned"
        );
        Ok((output, wall))
    }

    fn corrected_error(&self, clean: &DenseND<f64>, factors: &FactorSet<f64>) -> Result<f64, Correction> {
        let estimate = factors
            .reconstruct()
            .map_err(|e| Correction::Kernel(e.to_string()))?;
        let diff = clean
            .distance(&estimate)
            .map_err(|e| Correction::Kernel(e.to_string()))?;
        match self.config.error_scale {
            ErrorScale::Absolute => Ok(diff),
            ErrorScale::Relative => {
                let norm = clean.frobenius_norm();
                if norm == 0.0 {
                    return Err(Correction::DegenerateNorm);
                }
                Ok(diff / norm)
            }
        }
    }
}

#[derive(Debug)]
enum Correction {
    DegenerateNorm,
    Kernel(String),
}

fn last_residual(output: &Factorization) -> f64 {
    output.error_trace.last().copied().unwrap_or(f64::NAN)
}

/// Reject malformed factorizer output
fn validate_output(output: &Factorization, shape: &[usize], rank: usize) -> Result<(), String> {
    if output.error_trace.is_empty() {
        return Err("empty error trace".to_string());
    }
    if !output.elapsed.is_finite() || output.elapsed < 0.0 {
        return Err(format!("invalid elapsed time {}", output.elapsed));
    }
    let residual = last_residual(output);
    if !residual.is_finite() {
        return Err(format!("non-finite final residual {}", residual));
    }

    let factors = &output.factors.factors;
    if factors.len() != shape.len() {
        return Err(format!(
            "expected {} factor matrices, got {}",
            shape.len(),
            factors.len()
        ));
    }
    for (mode, (factor, &size)) in factors.iter().zip(shape).enumerate() {
        if factor.dim() != (size, rank) {
            return Err(format!(
                "factor {} has shape {:?}, expected ({}, {})",
                mode,
                factor.dim(),
                size,
                rank
            ));
        }
    }
    if let Some(weights) = &output.factors.weights {
        if weights.len() != rank {
            return Err(format!("{} weights for rank {}", weights.len(), rank));
        }
    }
    Ok(())
}

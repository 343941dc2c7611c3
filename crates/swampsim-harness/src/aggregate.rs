//! Per-row summary statistics

use crate::error::{HarnessError, HarnessResult};
use crate::grid::GridRow;
use crate::harness::RunRecord;
use serde::{Deserialize, Serialize};
use swampsim_core::stats::{mean, population_std};

/// Mean and population standard deviation of errors and times
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub err_mean: f64,
    pub err_std: f64,
    pub time_mean: f64,
    pub time_std: f64,
}

impl Summary {
    /// Summarize paired error and time samples
    pub fn from_samples(errors: &[f64], times: &[f64]) -> Option<Self> {
        Some(Self {
            err_mean: mean(errors)?,
            err_std: population_std(errors)?,
            time_mean: mean(times)?,
            time_std: population_std(times)?,
        })
    }
}

/// One finished row of the results table
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsRow {
    /// 1-based tensor type label
    pub label: usize,
    pub params: GridRow,
    pub summary: Summary,
    /// Final errors in run order
    pub errors: Vec<f64>,
    /// Elapsed times in run order
    pub times: Vec<f64>,
}

/// Collapse a row's run records into a [`ResultsRow`]
///
/// # Examples
///
/// ```
/// use swampsim_harness::{summarize, GridRow, RunRecord};
///
/// let row = GridRow::new(3, 20, 0.5, 2);
/// let records = vec![
///     RunRecord::new(0, 1.0, 1.0, 0.5, vec![1.0], vec![0.5]),
///     RunRecord::new(1, 3.0, 3.0, 1.5, vec![3.0], vec![1.5]),
/// ];
///
/// let summary = summarize(1, &row, &records).unwrap().summary;
/// assert_eq!(summary.err_mean, 2.0);
/// assert_eq!(summary.err_std, 1.0);
/// assert_eq!(summary.time_mean, 1.0);
/// ```
pub fn summarize(label: usize, params: &GridRow, records: &[RunRecord]) -> HarnessResult<ResultsRow> {
    if records.is_empty() {
        return Err(HarnessError::Aggregation {
            row: label,
            reason: "no run records".to_string(),
        });
    }
    if records.len() != params.runs {
        return Err(HarnessError::Aggregation {
            row: label,
            reason: format!("expected {} runs, got {}", params.runs, records.len()),
        });
    }

    let errors: Vec<f64> = records.iter().map(|r| r.final_error).collect();
    let times: Vec<f64> = records.iter().map(|r| r.elapsed).collect();
    let summary = Summary::from_samples(&errors, &times).ok_or_else(|| HarnessError::Aggregation {
        row: label,
        reason: "no samples".to_string(),
    })?;

    Ok(ResultsRow {
        label,
        params: *params,
        summary,
        errors,
        times,
    })
}

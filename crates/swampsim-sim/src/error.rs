//! Error types for tensor simulation

use scirs2_linalg::LinalgError;
use swampsim_core::KernelError;
use thiserror::Error;

/// Failure of a single simulation call
#[derive(Error, Debug)]
pub enum SimError {
    /// Rank, size, collinearity or bottleneck mode out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Noise level outside `[0, 100)`
    #[error("Invalid noise level {name} = {level}: must satisfy 0 <= level < 100")]
    InvalidNoiseLevel { name: &'static str, level: f64 },

    /// Correlation matrix does not admit a Cholesky factor
    #[error("Correlation matrix for rank {rank}, collinearity {collinearity} is not positive definite: {reason}")]
    NumericalInstability {
        rank: usize,
        collinearity: f64,
        reason: String,
    },

    /// A norm used as a divisor is zero
    #[error("Degenerate norm: {what} is zero")]
    DivisionByDegenerateNorm { what: &'static str },

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),
}

/// Result type for simulation
pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

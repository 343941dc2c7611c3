//! Error types for array and kernel operations
//!
//! Every fallible operation in this crate reports through [`KernelError`],
//! carrying the operation name so callers further up the stack can surface
//! which kernel rejected its input.

use thiserror::Error;

/// Error type for array construction and kernel operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Dimension mismatch between operands
    #[error("{operation}: dimension mismatch - expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        operation: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Invalid mode/axis specification
    #[error("Invalid mode {mode}: must be < {max_mode}")]
    InvalidMode { mode: usize, max_mode: usize },

    /// Factor matrices disagree on the CP rank
    #[error("{operation}: rank mismatch at factor {factor_index}: expected rank {expected_rank}, got {actual_rank}")]
    RankMismatch {
        operation: String,
        expected_rank: usize,
        actual_rank: usize,
        factor_index: usize,
    },

    /// Empty input not allowed
    #[error("{operation}: empty input not allowed for parameter '{parameter}'")]
    EmptyInput { operation: String, parameter: String },

    /// Distribution parameters rejected by the sampler
    #[error("{operation}: invalid distribution parameters: {message}")]
    InvalidDistribution { operation: String, message: String },
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

impl KernelError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(
        operation: impl Into<String>,
        expected: Vec<usize>,
        actual: Vec<usize>,
    ) -> Self {
        KernelError::DimensionMismatch {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    /// Create a rank mismatch error
    pub fn rank_mismatch(
        operation: impl Into<String>,
        expected_rank: usize,
        actual_rank: usize,
        factor_index: usize,
    ) -> Self {
        KernelError::RankMismatch {
            operation: operation.into(),
            expected_rank,
            actual_rank,
            factor_index,
        }
    }

    /// Create an empty input error
    pub fn empty_input(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        KernelError::EmptyInput {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = KernelError::dimension_mismatch("hadamard", vec![4, 4, 4], vec![4, 4, 5]);

        let msg = format!("{}", err);
        assert!(msg.contains("hadamard"));
        assert!(msg.contains("dimension mismatch"));
        assert!(msg.contains("[4, 4, 4]"));
        assert!(msg.contains("[4, 4, 5]"));
    }

    #[test]
    fn test_rank_mismatch_display() {
        let err = KernelError::rank_mismatch("reconstruct", 3, 2, 1);

        let msg = format!("{}", err);
        assert!(msg.contains("factor 1"));
        assert!(msg.contains("expected rank 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_invalid_mode_display() {
        let err = KernelError::InvalidMode {
            mode: 3,
            max_mode: 3,
        };
        assert_eq!(format!("{}", err), "Invalid mode 3: must be < 3");
    }
}

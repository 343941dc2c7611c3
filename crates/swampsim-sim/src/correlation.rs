//! Correlation-inducing transforms for factor matrices
//!
//! For rank R and collinearity c the target correlation matrix is
//!
//! ```text
//! K = c·J + (1 − c)·I_R
//! ```
//!
//! with J the all-ones matrix. K is symmetric positive definite for
//! c ∈ [0, 1). The upper Cholesky factor C (Cᵀ C = K) right-multiplied onto
//! a matrix Q with orthonormal columns gives (QC)ᵀ(QC) = K, so the columns of
//! QC have unit norm and pairwise inner product c.

use crate::error::{SimError, SimResult};
use scirs2_core::ndarray_ext::{Array2, ArrayView2};

/// Build K = c·J + (1 − c)·I for the given rank
///
/// # Examples
///
/// ```
/// use swampsim_sim::correlation_matrix;
///
/// let k = correlation_matrix(3, 0.5);
/// assert_eq!(k[[0, 0]], 1.0);
/// assert_eq!(k[[0, 2]], 0.5);
/// ```
pub fn correlation_matrix(rank: usize, collinearity: f64) -> Array2<f64> {
    Array2::from_shape_fn((rank, rank), |(i, j)| {
        if i == j {
            1.0
        } else {
            collinearity
        }
    })
}

/// Upper-triangular C with Cᵀ C = K
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationFactor {
    upper: Array2<f64>,
    collinearity: f64,
}

impl CorrelationFactor {
    /// Compute the factor for `rank` components at `collinearity`
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidParameter`] if `rank == 0` or `collinearity` is
    ///   outside `[0, 1)`
    /// - [`SimError::NumericalInstability`] if the Cholesky decomposition
    ///   fails or produces a non-positive pivot
    ///
    /// # Examples
    ///
    /// ```
    /// use swampsim_sim::CorrelationFactor;
    ///
    /// let c = CorrelationFactor::build(3, 0.9).unwrap();
    /// let k = c.matrix().t().dot(c.matrix());
    /// assert!((k[[0, 1]] - 0.9_f64).abs() < 1e-12);
    /// assert!((k[[2, 2]] - 1.0_f64).abs() < 1e-12);
    /// ```
    pub fn build(rank: usize, collinearity: f64) -> SimResult<Self> {
        if rank == 0 {
            return Err(SimError::invalid("rank", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&collinearity) {
            return Err(SimError::invalid(
                "collinearity",
                format!("{} is outside [0, 1)", collinearity),
            ));
        }

        let k = correlation_matrix(rank, collinearity);
        let lower = scirs2_linalg::cholesky(&k.view(), None).map_err(|e| {
            SimError::NumericalInstability {
                rank,
                collinearity,
                reason: e.to_string(),
            }
        })?;

        for i in 0..rank {
            let pivot = lower[[i, i]];
            if !pivot.is_finite() || pivot <= 0.0 {
                return Err(SimError::NumericalInstability {
                    rank,
                    collinearity,
                    reason: format!("pivot {} = {}", i, pivot),
                });
            }
        }

        // Keep only the triangle and hand back Lᵀ
        let upper = Array2::from_shape_fn((rank, rank), |(i, j)| {
            if j >= i {
                lower[[j, i]]
            } else {
                0.0
            }
        });

        Ok(Self {
            upper,
            collinearity,
        })
    }

    /// The upper-triangular factor C
    pub fn matrix(&self) -> &Array2<f64> {
        &self.upper
    }

    pub fn rank(&self) -> usize {
        self.upper.nrows()
    }

    pub fn collinearity(&self) -> f64 {
        self.collinearity
    }

    /// Right-multiply C onto a basis: returns `basis · C`
    pub fn imprint(&self, basis: &ArrayView2<f64>) -> SimResult<Array2<f64>> {
        if basis.ncols() != self.rank() {
            return Err(SimError::invalid(
                "basis",
                format!(
                    "has {} columns, correlation factor has rank {}",
                    basis.ncols(),
                    self.rank()
                ),
            ));
        }
        Ok(basis.dot(&self.upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_collinearity_is_identity() {
        let c = CorrelationFactor::build(4, 0.0).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((c.matrix()[[i, j]] - expected).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_factor_is_upper_triangular() {
        let c = CorrelationFactor::build(5, 0.7).unwrap();
        for i in 0..5 {
            for j in 0..i {
                assert_eq!(c.matrix()[[i, j]], 0.0);
            }
        }
    }

    #[test]
    fn test_factor_reproduces_correlation_matrix() {
        for &coll in &[0.1, 0.5, 0.9, 0.99] {
            let c = CorrelationFactor::build(5, coll).unwrap();
            let k = c.matrix().t().dot(c.matrix());
            let expected = correlation_matrix(5, coll);
            for (a, b) in k.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-10, "collinearity {}", coll);
            }
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            CorrelationFactor::build(0, 0.5),
            Err(SimError::InvalidParameter { name: "rank", .. })
        ));
        assert!(matches!(
            CorrelationFactor::build(3, 1.0),
            Err(SimError::InvalidParameter { name: "collinearity", .. })
        ));
        assert!(matches!(
            CorrelationFactor::build(3, -0.1),
            Err(SimError::InvalidParameter { .. })
        ));
        assert!(CorrelationFactor::build(3, f64::NAN).is_err());
    }

    #[test]
    fn test_imprint_checks_rank() {
        let c = CorrelationFactor::build(3, 0.5).unwrap();
        let basis = Array2::<f64>::zeros((10, 2));
        assert!(c.imprint(&basis.view()).is_err());
    }

    #[test]
    fn test_rank_one() {
        let c = CorrelationFactor::build(1, 0.9).unwrap();
        assert_eq!(c.matrix()[[0, 0]], 1.0);
    }
}

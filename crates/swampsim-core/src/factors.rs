//! CP factor sets and rank-R reconstruction
//!
//! A [`FactorSet`] represents a tensor as a sum of R rank-1 tensors:
//!
//! ```text
//! X = Σᵣ λᵣ (u₁ᵣ ⊗ u₂ᵣ ⊗ ... ⊗ uₙᵣ)
//! ```
//!
//! It is both the ground truth produced by the simulator and the estimate
//! returned by a factorization algorithm, so the same reconstruction kernel
//! builds the noiseless array and scores the estimate against it.

use crate::dense::DenseND;
use crate::error::{KernelError, KernelResult};
use crate::khatri_rao::khatri_rao_chain;
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView2};
use scirs2_core::numeric::Float;

/// CP factor matrices with optional component weights
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSet<T> {
    /// Factor matrices, one per mode, each of shape (Iₙ, R)
    pub factors: Vec<Array2<T>>,

    /// Weights for each rank-1 component
    /// If None, weights are absorbed into the factor matrices
    pub weights: Option<Array1<T>>,
}

impl<T> FactorSet<T>
where
    T: Float,
{
    /// Create a factor set without weights, checking that all ranks agree
    pub fn new(factors: Vec<Array2<T>>) -> KernelResult<Self> {
        let set = Self {
            factors,
            weights: None,
        };
        set.check_ranks()?;
        Ok(set)
    }

    /// Create a weighted factor set
    pub fn with_weights(factors: Vec<Array2<T>>, weights: Array1<T>) -> KernelResult<Self> {
        let set = Self {
            factors,
            weights: Some(weights),
        };
        set.check_ranks()?;
        Ok(set)
    }

    /// Number of modes
    pub fn n_modes(&self) -> usize {
        self.factors.len()
    }

    /// CP rank (number of columns shared by every factor)
    pub fn rank(&self) -> usize {
        self.factors.first().map_or(0, |f| f.ncols())
    }

    /// Row count of every factor, i.e. the shape of the reconstructed tensor
    pub fn mode_sizes(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.nrows()).collect()
    }

    /// Reconstruct the full tensor Σᵣ λᵣ (u₁ᵣ ⊗ ... ⊗ uₙᵣ)
    ///
    /// # Complexity
    ///
    /// Time: O(R × ∏ᵢ Iᵢ)
    /// Space: O(∏ᵢ Iᵢ)
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::array;
    /// use swampsim_core::FactorSet;
    ///
    /// let set = FactorSet::new(vec![
    ///     array![[1.0], [2.0]],
    ///     array![[3.0], [4.0]],
    ///     array![[5.0], [6.0]],
    /// ])
    /// .unwrap();
    ///
    /// let tensor = set.reconstruct().unwrap();
    /// assert_eq!(tensor.shape(), &[2, 2, 2]);
    /// assert_eq!(tensor.get(&[1, 1, 1]), Some(48.0));
    /// ```
    pub fn reconstruct(&self) -> KernelResult<DenseND<T>> {
        let views: Vec<ArrayView2<T>> = self.factors.iter().map(|f| f.view()).collect();
        cp_reconstruct(&views, self.weights.as_ref())
    }

    fn check_ranks(&self) -> KernelResult<()> {
        let rank = self.rank();
        for (idx, factor) in self.factors.iter().enumerate() {
            if factor.ncols() != rank {
                return Err(KernelError::rank_mismatch(
                    "FactorSet",
                    rank,
                    factor.ncols(),
                    idx,
                ));
            }
        }
        if let Some(w) = &self.weights {
            if w.len() != rank {
                return Err(KernelError::dimension_mismatch(
                    "FactorSet weights",
                    vec![rank],
                    vec![w.len()],
                ));
            }
        }
        Ok(())
    }
}

/// Rank-R reconstruction from factor views
///
/// The mode-0 unfolding of the result is `U₀ diag(λ) (U₁ ⊙ ... ⊙ Uₙ)ᵀ`,
/// laid out row-major so entry `[i₀, i₁, ..., iₙ]` equals
/// `Σᵣ λᵣ U₀[i₀, r] U₁[i₁, r] ... Uₙ[iₙ, r]`.
pub fn cp_reconstruct<T>(
    factors: &[ArrayView2<T>],
    weights: Option<&Array1<T>>,
) -> KernelResult<DenseND<T>>
where
    T: Float,
{
    let (lead, trailing) = factors
        .split_first()
        .ok_or_else(|| KernelError::empty_input("cp_reconstruct", "factors"))?;

    let rank = lead.ncols();
    if let Some(w) = weights {
        if w.len() != rank {
            return Err(KernelError::dimension_mismatch(
                "cp_reconstruct",
                vec![rank],
                vec![w.len()],
            ));
        }
    }

    let shape: Vec<usize> = factors.iter().map(|f| f.nrows()).collect();

    let trailing_kr = if trailing.is_empty() {
        Array2::<T>::ones((1, rank))
    } else {
        khatri_rao_chain(trailing)?
    };

    if trailing_kr.ncols() != rank {
        return Err(KernelError::rank_mismatch(
            "cp_reconstruct",
            rank,
            trailing_kr.ncols(),
            1,
        ));
    }

    let rows = lead.nrows();
    let cols = trailing_kr.nrows();
    let mut data = vec![T::zero(); rows * cols];

    for i in 0..rows {
        let scaled: Vec<T> = (0..rank)
            .map(|r| {
                let w = weights.map_or(T::one(), |w| w[r]);
                lead[[i, r]] * w
            })
            .collect();

        let out_row = &mut data[i * cols..(i + 1) * cols];
        for (col, out) in out_row.iter_mut().enumerate() {
            let mut acc = T::zero();
            for (r, &s) in scaled.iter().enumerate() {
                acc = acc + s * trailing_kr[[col, r]];
            }
            *out = acc;
        }
    }

    DenseND::from_vec(data, &shape)
}

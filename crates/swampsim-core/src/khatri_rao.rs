//! Khatri-Rao product (column-wise Kronecker product)
//!
//! For matrices A (I × K) and B (J × K) the product C = A ⊙ B has size
//! (I*J × K); row `i * J + j` of column `k` is `A[i, k] * B[j, k]`. That row
//! ordering matches the row-major flattening of the trailing modes, which is
//! what the reconstruction kernel relies on.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array2, ArrayView2};
use scirs2_core::numeric::Float;

/// Compute the Khatri-Rao product of two matrices
///
/// # Errors
///
/// Returns [`KernelError::RankMismatch`] when the column counts differ.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use swampsim_core::khatri_rao;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[5.0, 6.0], [7.0, 8.0]];
/// let c = khatri_rao(&a.view(), &b.view()).unwrap();
/// assert_eq!(c.shape(), &[4, 2]);
///
/// // First column: [1*5, 1*7, 3*5, 3*7]
/// assert_eq!(c[[0, 0]], 5.0);
/// assert_eq!(c[[1, 0]], 7.0);
/// assert_eq!(c[[2, 0]], 15.0);
/// assert_eq!(c[[3, 0]], 21.0);
/// ```
pub fn khatri_rao<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> KernelResult<Array2<T>>
where
    T: Float,
{
    let (i, k1) = a.dim();
    let (j, k2) = b.dim();

    if k1 != k2 {
        return Err(KernelError::rank_mismatch("khatri_rao", k1, k2, 1));
    }

    let mut result = Array2::<T>::zeros((i * j, k1));

    for col_idx in 0..k1 {
        let a_col = a.column(col_idx);
        let b_col = b.column(col_idx);

        for (row_a_idx, &a_val) in a_col.iter().enumerate() {
            for (row_b_idx, &b_val) in b_col.iter().enumerate() {
                result[[row_a_idx * j + row_b_idx, col_idx]] = a_val * b_val;
            }
        }
    }

    Ok(result)
}

/// Khatri-Rao product of a sequence of matrices, folded left to right
///
/// `khatri_rao_chain(&[A, B, C]) == khatri_rao(khatri_rao(A, B), C)`.
pub fn khatri_rao_chain<T>(matrices: &[ArrayView2<T>]) -> KernelResult<Array2<T>>
where
    T: Float,
{
    let (first, rest) = matrices
        .split_first()
        .ok_or_else(|| KernelError::empty_input("khatri_rao_chain", "matrices"))?;

    let mut acc = first.to_owned();
    for (idx, m) in rest.iter().enumerate() {
        if m.ncols() != acc.ncols() {
            return Err(KernelError::rank_mismatch(
                "khatri_rao_chain",
                acc.ncols(),
                m.ncols(),
                idx + 1,
            ));
        }
        acc = khatri_rao(&acc.view(), m)?;
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_khatri_rao_shape_and_values() {
        let a = array![[1.0, 0.0], [2.0, 1.0], [0.0, 3.0]];
        let b = array![[1.0, 2.0], [4.0, -1.0]];
        let c = khatri_rao(&a.view(), &b.view()).unwrap();

        assert_eq!(c.shape(), &[6, 2]);
        assert_eq!(c[[3, 0]], 8.0); // a[1,0] * b[1,0]
        assert_eq!(c[[5, 1]], -3.0); // a[2,1] * b[1,1]
    }

    #[test]
    fn test_khatri_rao_rank_mismatch() {
        let a = Array2::<f64>::ones((3, 2));
        let b = Array2::<f64>::ones((3, 3));
        assert!(matches!(
            khatri_rao(&a.view(), &b.view()),
            Err(KernelError::RankMismatch { .. })
        ));
    }

    #[test]
    fn test_chain_matches_nested() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[0.5, 1.0], [2.0, 0.0], [1.0, 1.0]];
        let c = array![[2.0, -1.0], [1.0, 3.0]];

        let nested = khatri_rao(&khatri_rao(&a.view(), &b.view()).unwrap().view(), &c.view()).unwrap();
        let chained = khatri_rao_chain(&[a.view(), b.view(), c.view()]).unwrap();
        assert_eq!(nested, chained);
    }

    #[test]
    fn test_chain_empty() {
        let empty: Vec<ArrayView2<f64>> = Vec::new();
        assert!(khatri_rao_chain(&empty).is_err());
    }
}

//! Dense N-dimensional array used for simulated tensors
//!
//! [`DenseND`] wraps a dynamic-dimensional `scirs2_core` array in row-major
//! layout. Only the operations the simulator and the harness rely on live
//! here: construction, Frobenius norms, elementwise products, scaled sums
//! and mode-n unfolding.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array, Array2, ArrayView, IxDyn};
use scirs2_core::numeric::Float;
use scirs2_core::random::{Distribution, RandNormal as Normal, Rng};

/// Dense N-dimensional tensor backed by scirs2_core's ndarray
///
/// # Examples
///
/// ```
/// use swampsim_core::DenseND;
///
/// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.rank(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseND<T> {
    data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Float,
{
    /// Create a tensor from an existing ndarray
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from a vector in row-major order
    ///
    /// # Examples
    ///
    /// ```
    /// use swampsim_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// assert!(DenseND::from_vec(vec![1.0, 2.0], &[2, 3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> KernelResult<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            return Err(KernelError::dimension_mismatch(
                "from_vec",
                vec![total],
                vec![vec.len()],
            ));
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)
            .map_err(|_| KernelError::dimension_mismatch("from_vec", shape.to_vec(), vec![total]))?;
        Ok(Self { data: array })
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), T::zero()),
        }
    }

    /// Number of modes
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// Shape of the tensor
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read-only view of the underlying array
    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Consume the tensor and return the underlying array
    pub fn into_array(self) -> Array<T, IxDyn> {
        self.data
    }

    /// Elements in row-major (logical) order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Element at a multi-index
    pub fn get(&self, index: &[usize]) -> Option<T> {
        self.data.get(IxDyn(index)).copied()
    }

    /// Elements copied into a row-major vector
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().copied().collect()
    }

    /// Frobenius norm: sqrt of the sum of squared entries
    ///
    /// # Examples
    ///
    /// ```
    /// use swampsim_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![3.0, 4.0], &[2]).unwrap();
    /// assert!((tensor.frobenius_norm() - 5.0_f64).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Elementwise (Hadamard) product with a tensor of the same shape
    pub fn hadamard(&self, other: &Self) -> KernelResult<Self> {
        self.check_same_shape("hadamard", other)?;
        let data = ndarray_zip(&self.data, &other.data, |a, b| a * b);
        Ok(Self { data })
    }

    /// Compute `self + alpha * other`
    pub fn scaled_add(&self, alpha: T, other: &Self) -> KernelResult<Self> {
        self.check_same_shape("scaled_add", other)?;
        let data = ndarray_zip(&self.data, &other.data, |a, b| a + alpha * b);
        Ok(Self { data })
    }

    /// Frobenius norm of `self - other`
    pub fn distance(&self, other: &Self) -> KernelResult<T> {
        self.check_same_shape("distance", other)?;
        let sum_sq = self
            .data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| {
                let d = a - b;
                acc + d * d
            });
        Ok(sum_sq.sqrt())
    }

    /// Unfold (matricize) the tensor along a mode
    ///
    /// Row `i` of the result holds every entry whose `mode` index is `i`,
    /// with the remaining indices in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use swampsim_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let unfolded = tensor.unfold(1).unwrap();
    /// assert_eq!(unfolded.shape(), &[3, 8]);
    /// ```
    pub fn unfold(&self, mode: usize) -> KernelResult<Array2<T>> {
        if mode >= self.rank() {
            return Err(KernelError::InvalidMode {
                mode,
                max_mode: self.rank(),
            });
        }

        let shape = self.shape();
        let rows = shape[mode];
        let cols: usize = shape
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != mode)
            .map(|(_, &s)| s)
            .product();

        let mut perm: Vec<usize> = vec![mode];
        perm.extend((0..mode).chain((mode + 1)..self.rank()));

        let permuted: Vec<T> = self.data.view().permuted_axes(perm).iter().copied().collect();
        Array2::from_shape_vec((rows, cols), permuted)
            .map_err(|_| KernelError::dimension_mismatch("unfold", vec![rows, cols], shape.to_vec()))
    }

    fn check_same_shape(&self, operation: &str, other: &Self) -> KernelResult<()> {
        if self.shape() != other.shape() {
            return Err(KernelError::dimension_mismatch(
                operation,
                self.shape().to_vec(),
                other.shape().to_vec(),
            ));
        }
        Ok(())
    }
}

impl DenseND<f64> {
    /// Create a tensor of independent normal draws from an explicit generator
    ///
    /// Entries are drawn in row-major order, so the same generator state
    /// always produces the same tensor.
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::random::{SeedableRng, StdRng};
    /// use swampsim_core::DenseND;
    ///
    /// let mut a = StdRng::seed_from_u64(7);
    /// let mut b = StdRng::seed_from_u64(7);
    /// let x = DenseND::random_normal(&[3, 3, 3], 0.0, 1.0, &mut a).unwrap();
    /// let y = DenseND::random_normal(&[3, 3, 3], 0.0, 1.0, &mut b).unwrap();
    /// assert_eq!(x, y);
    /// ```
    pub fn random_normal<R>(shape: &[usize], mean: f64, std: f64, rng: &mut R) -> KernelResult<Self>
    where
        R: Rng + ?Sized,
    {
        let normal = Normal::new(mean, std).map_err(|e| KernelError::InvalidDistribution {
            operation: "random_normal".to_string(),
            message: e.to_string(),
        })?;

        let total: usize = shape.iter().product();
        let mut data = Vec::with_capacity(total);
        for _ in 0..total {
            data.push(normal.sample(&mut *rng));
        }

        Self::from_vec(data, shape)
    }
}

fn ndarray_zip<T, F>(a: &Array<T, IxDyn>, b: &Array<T, IxDyn>, f: F) -> Array<T, IxDyn>
where
    T: Float,
    F: Fn(T, T) -> T,
{
    let mut out = a.clone();
    out.zip_mut_with(b, |x, &y| *x = f(*x, y));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::random::{SeedableRng, StdRng};

    #[test]
    fn test_from_vec_row_major() {
        let tensor = DenseND::from_vec((0..24).map(|x| x as f64).collect(), &[2, 3, 4]).unwrap();
        assert_eq!(tensor.get(&[0, 0, 1]), Some(1.0));
        assert_eq!(tensor.get(&[0, 1, 0]), Some(4.0));
        assert_eq!(tensor.get(&[1, 0, 0]), Some(12.0));
    }

    #[test]
    fn test_unfold_mode0_matches_row_major() {
        let tensor = DenseND::from_vec((0..24).map(|x| x as f64).collect(), &[2, 3, 4]).unwrap();
        let unfolded = tensor.unfold(0).unwrap();
        assert_eq!(unfolded.shape(), &[2, 12]);
        assert_eq!(unfolded[[1, 0]], 12.0);
        assert_eq!(unfolded[[0, 11]], 11.0);
    }

    #[test]
    fn test_unfold_mode2() {
        let tensor = DenseND::from_vec((0..24).map(|x| x as f64).collect(), &[2, 3, 4]).unwrap();
        let unfolded = tensor.unfold(2).unwrap();
        assert_eq!(unfolded.shape(), &[4, 6]);
        // row k, column (i * 3 + j) holds tensor[i, j, k]
        assert_eq!(unfolded[[1, 0]], 1.0);
        assert_eq!(unfolded[[1, 3]], 13.0);
    }

    #[test]
    fn test_unfold_invalid_mode() {
        let tensor = DenseND::<f64>::zeros(&[2, 2, 2]);
        assert!(matches!(
            tensor.unfold(3),
            Err(KernelError::InvalidMode { mode: 3, max_mode: 3 })
        ));
    }

    #[test]
    fn test_hadamard_and_scaled_add() {
        let a = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = DenseND::from_vec(vec![4.0, 5.0, 6.0], &[3]).unwrap();

        assert_eq!(a.hadamard(&b).unwrap().to_vec(), vec![4.0, 10.0, 18.0]);
        assert_eq!(a.scaled_add(0.5, &b).unwrap().to_vec(), vec![3.0, 4.5, 6.0]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let a = DenseND::<f64>::zeros(&[2, 2]);
        let b = DenseND::<f64>::zeros(&[2, 3]);
        assert!(a.hadamard(&b).is_err());
        assert!(a.scaled_add(1.0, &b).is_err());
        assert!(a.distance(&b).is_err());
    }

    #[test]
    fn test_distance_matches_difference_norm() {
        let a = DenseND::from_vec(vec![1.0, 5.0, -2.0, 0.5], &[2, 2]).unwrap();
        let b = DenseND::from_vec(vec![0.0, 1.0, 2.0, 0.5], &[2, 2]).unwrap();
        let expected = a.scaled_add(-1.0, &b).unwrap().frobenius_norm();
        assert!((a.distance(&b).unwrap() - expected).abs() < 1e-12);
        assert!((expected - 33.0f64.sqrt()).abs() < 1e-12);

        let c = DenseND::from_vec(vec![0.0, 1.0], &[2]).unwrap();
        assert!(a.distance(&c).is_err());
    }

    #[test]
    fn test_random_normal_seeded() {
        let mut rng = StdRng::seed_from_u64(1);
        let x = DenseND::random_normal(&[10, 10, 10], 0.0, 1.0, &mut rng).unwrap();
        let y = DenseND::random_normal(&[10, 10, 10], 0.0, 1.0, &mut rng).unwrap();
        assert_eq!(x.shape(), &[10, 10, 10]);
        assert_ne!(x, y);

        // Sample variance of 1000 standard normals
        let mean = x.iter().sum::<f64>() / 1000.0;
        let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / 1000.0;
        assert!(mean.abs() < 0.2, "mean = {}", mean);
        assert!((var - 1.0).abs() < 0.2, "var = {}", var);
    }

    #[test]
    fn test_random_normal_rejects_invalid_std() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(DenseND::random_normal(&[2], 0.0, -1.0, &mut rng).is_err());
    }
}

//! Boundary between the harness and a CP factorization algorithm
//!
//! Algorithms are collaborators: the harness hands them a tensor in the
//! layout they declare, and validates whatever they return.

use serde::{Deserialize, Serialize};
use swampsim_core::{DenseND, FactorSet, KernelError, KernelResult};
use scirs2_core::ndarray_ext::Array2;

/// Layout a factorizer consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Representation {
    /// The three-way array as is
    #[default]
    Dense,
    /// Mode-n matricization
    Unfolded { mode: usize },
}

/// Tensor handed to a factorizer
#[derive(Debug, Clone, PartialEq)]
pub enum TensorInput {
    Dense(DenseND<f64>),
    /// Mode-`mode` unfolding with the original shape carried alongside
    Unfolded {
        mode: usize,
        shape: Vec<usize>,
        matrix: Array2<f64>,
    },
}

impl TensorInput {
    /// Convert a dense array to the requested layout
    ///
    /// # Examples
    ///
    /// ```
    /// use swampsim_core::DenseND;
    /// use swampsim_harness::{Representation, TensorInput};
    ///
    /// let dense = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let input = TensorInput::from_dense(dense, Representation::Unfolded { mode: 1 }).unwrap();
    ///
    /// assert_eq!(input.shape(), &[2, 3, 4]);
    /// if let TensorInput::Unfolded { matrix, .. } = &input {
    ///     assert_eq!(matrix.dim(), (3, 8));
    /// }
    /// ```
    pub fn from_dense(tensor: DenseND<f64>, representation: Representation) -> KernelResult<Self> {
        match representation {
            Representation::Dense => Ok(TensorInput::Dense(tensor)),
            Representation::Unfolded { mode } => {
                let matrix = tensor.unfold(mode)?;
                Ok(TensorInput::Unfolded {
                    mode,
                    shape: tensor.shape().to_vec(),
                    matrix,
                })
            }
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            TensorInput::Dense(_) => Representation::Dense,
            TensorInput::Unfolded { mode, .. } => Representation::Unfolded { mode: *mode },
        }
    }

    /// Shape of the underlying three-way array
    pub fn shape(&self) -> &[usize] {
        match self {
            TensorInput::Dense(tensor) => tensor.shape(),
            TensorInput::Unfolded { shape, .. } => shape,
        }
    }

    pub fn frobenius_norm(&self) -> f64 {
        match self {
            TensorInput::Dense(tensor) => tensor.frobenius_norm(),
            TensorInput::Unfolded { matrix, .. } => {
                matrix.iter().map(|&x| x * x).sum::<f64>().sqrt()
            }
        }
    }

    /// Recover the dense array (folds an unfolding back)
    pub fn to_dense(&self) -> KernelResult<DenseND<f64>> {
        match self {
            TensorInput::Dense(tensor) => Ok(tensor.clone()),
            TensorInput::Unfolded {
                mode,
                shape,
                matrix,
            } => fold(matrix, *mode, shape),
        }
    }
}

/// Inverse of [`DenseND::unfold`]
fn fold(matrix: &Array2<f64>, mode: usize, shape: &[usize]) -> KernelResult<DenseND<f64>> {
    if mode >= shape.len() {
        return Err(KernelError::InvalidMode {
            mode,
            max_mode: shape.len(),
        });
    }
    let rest: usize = shape
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != mode)
        .map(|(_, &d)| d)
        .product();
    if matrix.dim() != (shape[mode], rest) {
        return Err(KernelError::dimension_mismatch(
            "fold",
            vec![shape[mode], rest],
            vec![matrix.nrows(), matrix.ncols()],
        ));
    }

    let mut out = DenseND::<f64>::zeros(shape).into_array();
    let mut index = vec![0usize; shape.len()];
    for (flat, value) in out.iter_mut().enumerate() {
        // Row-major multi-index of `flat`
        let mut remainder = flat;
        for axis in (0..shape.len()).rev() {
            index[axis] = remainder % shape[axis];
            remainder /= shape[axis];
        }
        let mut col = 0;
        for (axis, &dim) in shape.iter().enumerate() {
            if axis != mode {
                col = col * dim + index[axis];
            }
        }
        *value = matrix[[index[mode], col]];
    }
    Ok(DenseND::from_array(out))
}

/// Run settings passed to every factorization call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorizeRequest {
    pub rank: usize,
    pub max_iters: usize,
    /// Seed for the algorithm's own initialization
    pub seed: u64,
    pub tol: f64,
}

/// What a factorizer reports back
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    /// Seconds spent in the algorithm
    pub elapsed: f64,
    /// Residual after each iteration, last entry is the final fit
    pub error_trace: Vec<f64>,
    pub factors: FactorSet<f64>,
    /// Cumulative seconds at each iteration
    pub iteration_times: Vec<f64>,
}

/// A CP decomposition routine under test
pub trait Factorizer {
    /// Name used in logs and error reports
    fn name(&self) -> &str;

    /// Layout this factorizer expects its input in
    fn representation(&self) -> Representation {
        Representation::Dense
    }

    /// Decompose `input` at `request.rank`
    fn factorize(
        &mut self,
        input: &TensorInput,
        request: &FactorizeRequest,
    ) -> anyhow::Result<Factorization>;
}

impl<F: Factorizer + ?Sized> Factorizer for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn representation(&self) -> Representation {
        (**self).representation()
    }

    fn factorize(
        &mut self,
        input: &TensorInput,
        request: &FactorizeRequest,
    ) -> anyhow::Result<Factorization> {
        (**self).factorize(input, request)
    }
}

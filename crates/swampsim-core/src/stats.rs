//! Summary statistics over samples and factor columns

use scirs2_core::ndarray_ext::{Array2, ArrayView2};
use scirs2_core::numeric::{Float, NumCast};

/// Arithmetic mean, `None` for an empty sample
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let n: T = NumCast::from(values.len())?;
    Some(values.iter().fold(T::zero(), |acc, &v| acc + v) / n)
}

/// Population standard deviation (divisor `n`), `None` for an empty sample
///
/// # Examples
///
/// ```
/// use swampsim_core::stats::population_std;
///
/// let std = population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((std - 2.0_f64).abs() < 1e-12);
/// ```
pub fn population_std<T: Float>(values: &[T]) -> Option<T> {
    let m = mean(values)?;
    let n: T = NumCast::from(values.len())?;
    let var = values
        .iter()
        .fold(T::zero(), |acc, &v| acc + (v - m) * (v - m))
        / n;
    Some(var.sqrt())
}

/// Pearson correlation between every pair of columns
///
/// Columns with zero variance produce NaN entries.
pub fn column_correlation<T: Float>(matrix: &ArrayView2<T>) -> Array2<T> {
    let (rows, cols) = matrix.dim();
    let n: T = NumCast::from(rows).unwrap_or_else(T::nan);

    let mut centered = matrix.to_owned();
    for c in 0..cols {
        let col_mean = matrix.column(c).iter().fold(T::zero(), |acc, &v| acc + v) / n;
        for r in 0..rows {
            centered[[r, c]] = centered[[r, c]] - col_mean;
        }
    }

    let norms: Vec<T> = (0..cols)
        .map(|c| {
            centered
                .column(c)
                .iter()
                .fold(T::zero(), |acc, &v| acc + v * v)
                .sqrt()
        })
        .collect();

    let mut corr = Array2::<T>::zeros((cols, cols));
    for i in 0..cols {
        for j in 0..cols {
            let dot = centered
                .column(i)
                .iter()
                .zip(centered.column(j).iter())
                .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
            corr[[i, j]] = dot / (norms[i] * norms[j]);
        }
    }

    corr
}

/// Mean of the strictly off-diagonal entries of a square matrix
///
/// Returns zero for matrices smaller than 2×2.
pub fn mean_off_diagonal<T: Float>(matrix: &Array2<T>) -> T {
    let n = matrix.nrows().min(matrix.ncols());
    if n < 2 {
        return T::zero();
    }

    let mut sum = T::zero();
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum = sum + matrix[[i, j]];
            }
        }
    }

    let count: T = NumCast::from(n * (n - 1)).unwrap_or_else(T::nan);
    sum / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_mean_and_std_empty() {
        let empty: [f64; 0] = [];
        assert!(mean(&empty).is_none());
        assert!(population_std(&empty).is_none());
    }

    #[test]
    fn test_std_of_constant_is_zero() {
        assert_eq!(population_std(&[3.5, 3.5, 3.5]), Some(0.0));
    }

    #[test]
    fn test_column_correlation_perfect() {
        let m = array![[1.0, 2.0, -1.0], [2.0, 4.0, -2.0], [3.0, 6.0, -3.0]];
        let corr = column_correlation(&m.view());

        assert!((corr[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((corr[[0, 2]] + 1.0).abs() < 1e-12);
        assert!((corr[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_off_diagonal() {
        let m = array![[1.0, 0.2, 0.4], [0.2, 1.0, 0.6], [0.4, 0.6, 1.0]];
        assert!((mean_off_diagonal(&m) - 0.4).abs() < 1e-12);
        assert_eq!(mean_off_diagonal(&array![[1.0]]), 0.0);
    }
}

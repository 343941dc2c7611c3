//! Integration tests for reconstruction and unfolding
//!
//! These tests check that the reconstruction kernel and the mode-n unfolding
//! agree on index ordering, which every error computation downstream depends on.

use scirs2_core::ndarray_ext::{array, Array2};
use swampsim_core::{khatri_rao, DenseND, FactorSet};

#[test]
fn test_mode0_unfolding_equals_factor_times_khatri_rao() {
    let a = array![[1.0, 2.0], [0.5, -1.0], [3.0, 0.0]];
    let b = array![[2.0, 1.0], [1.0, 1.0], [0.0, -2.0]];
    let c = array![[1.0, 0.0], [4.0, 1.0], [1.0, 1.0]];

    let tensor = FactorSet::new(vec![a.clone(), b.clone(), c.clone()])
        .unwrap()
        .reconstruct()
        .unwrap();

    let kr = khatri_rao(&b.view(), &c.view()).unwrap();
    let expected: Array2<f64> = a.dot(&kr.t());
    let unfolded = tensor.unfold(0).unwrap();

    for (x, y) in unfolded.iter().zip(expected.iter()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn test_reconstruction_is_deterministic() {
    let factors = vec![
        array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
        array![[1.1, 1.2, 1.3], [1.4, 1.5, 1.6]],
        array![[2.1, 2.2, 2.3], [2.4, 2.5, 2.6]],
    ];
    let set = FactorSet::new(factors).unwrap();

    let first = set.reconstruct().unwrap();
    let second = set.reconstruct().unwrap();
    let bits = |t: &DenseND<f64>| t.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_zero_factor_gives_zero_tensor() {
    let set = FactorSet::new(vec![
        Array2::<f64>::zeros((3, 2)),
        Array2::<f64>::ones((3, 2)),
        Array2::<f64>::ones((3, 2)),
    ])
    .unwrap();
    assert_eq!(set.reconstruct().unwrap().frobenius_norm(), 0.0);
}

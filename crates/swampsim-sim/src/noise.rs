//! Noise injection at exact target levels
//!
//! A noise level `l` is the percentage of variance attributable to noise.
//! The perturbation is rescaled so that its norm relative to the signal is
//! exactly
//!
//! ```text
//! s(l) = 1 / √(100 / l − 1)
//! ```
//!
//! Homoscedastic noise is a standard-normal draw; heteroscedastic noise is a
//! standard-normal draw multiplied elementwise by the signal, so its
//! magnitude follows the local signal value.

use crate::error::{SimError, SimResult};
use scirs2_core::random::Rng;
use swampsim_core::DenseND;

/// Check `0 <= level < 100`
pub fn validate_noise_level(name: &'static str, level: f64) -> SimResult<()> {
    if level.is_finite() && (0.0..100.0).contains(&level) {
        Ok(())
    } else {
        Err(SimError::InvalidNoiseLevel { name, level })
    }
}

/// Ratio ‖noise‖ / ‖signal‖ for a noise level
///
/// # Examples
///
/// ```
/// use swampsim_sim::noise_scale;
///
/// assert_eq!(noise_scale(0.0).unwrap(), 0.0);
/// assert!((noise_scale(50.0).unwrap() - 1.0).abs() < 1e-12);
/// assert!(noise_scale(100.0).is_err());
/// ```
pub fn noise_scale(level: f64) -> SimResult<f64> {
    validate_noise_level("level", level)?;
    if level == 0.0 {
        return Ok(0.0);
    }
    Ok(1.0 / (100.0 / level - 1.0).sqrt())
}

/// Add standard-normal noise scaled to `level`
///
/// Returns `signal + s(level) · (‖signal‖ / ‖N‖) · N`. A zero level returns
/// a copy of `signal` without drawing from `rng`.
pub fn add_homoscedastic<R>(
    signal: &DenseND<f64>,
    level: f64,
    rng: &mut R,
) -> SimResult<DenseND<f64>>
where
    R: Rng + ?Sized,
{
    let scale = noise_scale(level)?;
    if scale == 0.0 {
        return Ok(signal.clone());
    }

    let noise = DenseND::random_normal(signal.shape(), 0.0, 1.0, rng)?;
    let noise_norm = noise.frobenius_norm();
    if noise_norm == 0.0 {
        return Err(SimError::DivisionByDegenerateNorm {
            what: "homoscedastic noise draw",
        });
    }

    let alpha = scale * signal.frobenius_norm() / noise_norm;
    Ok(signal.scaled_add(alpha, &noise)?)
}

/// Add signal-proportional noise scaled to `level`
///
/// Forms `P = N ⊙ signal` and returns
/// `signal + s(level) · (‖signal‖ / ‖P‖) · P`. A zero level returns a copy
/// of `signal` without drawing from `rng`.
pub fn add_heteroscedastic<R>(
    signal: &DenseND<f64>,
    level: f64,
    rng: &mut R,
) -> SimResult<DenseND<f64>>
where
    R: Rng + ?Sized,
{
    let scale = noise_scale(level)?;
    if scale == 0.0 {
        return Ok(signal.clone());
    }

    let draw = DenseND::random_normal(signal.shape(), 0.0, 1.0, rng)?;
    let perturbation = draw.hadamard(signal)?;
    let perturbation_norm = perturbation.frobenius_norm();
    if perturbation_norm == 0.0 {
        return Err(SimError::DivisionByDegenerateNorm {
            what: "heteroscedastic perturbation",
        });
    }

    let alpha = scale * signal.frobenius_norm() / perturbation_norm;
    Ok(signal.scaled_add(alpha, &perturbation)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::random::{SeedableRng, StdRng};

    fn signal() -> DenseND<f64> {
        let mut rng = StdRng::seed_from_u64(99);
        DenseND::random_normal(&[6, 6, 6], 0.0, 1.0, &mut rng).unwrap()
    }

    #[test]
    fn test_noise_scale_values() {
        assert!((noise_scale(1.0).unwrap() - 1.0 / 99.0_f64.sqrt()).abs() < 1e-15);
        assert!((noise_scale(10.0).unwrap() - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_levels() {
        for &level in &[-1.0, 100.0, 250.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                noise_scale(level),
                Err(SimError::InvalidNoiseLevel { .. })
            ));
        }
    }

    #[test]
    fn test_zero_level_is_exact_copy() {
        let z = signal();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(add_homoscedastic(&z, 0.0, &mut rng).unwrap(), z);
        assert_eq!(add_heteroscedastic(&z, 0.0, &mut rng).unwrap(), z);
    }

    #[test]
    fn test_homoscedastic_ratio() {
        let z = signal();
        let mut rng = StdRng::seed_from_u64(2);
        let noisy = add_homoscedastic(&z, 5.0, &mut rng).unwrap();
        let ratio = noisy.distance(&z).unwrap() / z.frobenius_norm();
        assert!((ratio - noise_scale(5.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_heteroscedastic_ratio() {
        let z = signal();
        let mut rng = StdRng::seed_from_u64(3);
        let noisy = add_heteroscedastic(&z, 20.0, &mut rng).unwrap();
        let ratio = noisy.distance(&z).unwrap() / z.frobenius_norm();
        assert!((ratio - noise_scale(20.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_heteroscedastic_on_zero_signal_is_degenerate() {
        let z = DenseND::<f64>::zeros(&[3, 3, 3]);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            add_heteroscedastic(&z, 10.0, &mut rng),
            Err(SimError::DivisionByDegenerateNorm { .. })
        ));
    }

    #[test]
    fn test_homoscedastic_on_empty_signal_is_degenerate() {
        // An empty draw has zero norm, leaving nothing to rescale
        let z = DenseND::<f64>::zeros(&[0, 3, 3]);
        let mut rng = StdRng::seed_from_u64(6);
        match add_homoscedastic(&z, 10.0, &mut rng) {
            Err(SimError::DivisionByDegenerateNorm { what }) => {
                assert_eq!(what, "homoscedastic noise draw");
            }
            other => panic!("expected degenerate norm, got {:?}", other),
        }
        // A zero level never draws, so the copy still succeeds
        assert_eq!(add_homoscedastic(&z, 0.0, &mut rng).unwrap(), z);
    }

    #[test]
    fn test_heteroscedastic_preserves_zero_entries() {
        let mut z = signal().to_vec();
        z[0] = 0.0;
        let z = DenseND::from_vec(z, &[6, 6, 6]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let noisy = add_heteroscedastic(&z, 30.0, &mut rng).unwrap();
        assert_eq!(noisy.get(&[0, 0, 0]), Some(0.0));
    }
}

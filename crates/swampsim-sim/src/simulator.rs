//! Tensor simulator for swamps and bottlenecks
//!
//! A simulation draws three I×R factor matrices whose columns have pairwise
//! correlation ≈ c, assembles the noiseless rank-R array Z from them and
//! derives two progressively noisier variants:
//!
//! ```text
//! Z   = Σᵣ aᵣ ⊗ bᵣ ⊗ cᵣ
//! Z′  = Z  + s(l₁)·(‖Z‖ / ‖N₁‖)·N₁
//! Z″  = Z′ + s(l₂)·(‖Z′‖ / ‖N₂ ⊙ Z′‖)·(N₂ ⊙ Z′)
//! ```
//!
//! Each call owns its generator. Draws happen in a fixed order (modes 0, 1,
//! 2, bottleneck overrides, N₁, N₂), so identical parameters and seed give
//! bit-identical output.

use crate::correlation::CorrelationFactor;
use crate::error::{SimError, SimResult};
use crate::noise::{add_heteroscedastic, add_homoscedastic, validate_noise_level};
use scirs2_core::ndarray_ext::{s, Array2};
use scirs2_core::random::{Rng, SeedableRng, StdRng};
use serde::{Deserialize, Serialize};
use swampsim_core::stats::population_std;
use swampsim_core::{DenseND, FactorSet};

/// Number of modes of every simulated array
pub const N_MODES: usize = 3;

/// Which modes keep their collinear columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BottleneckMode {
    /// All three modes collinear
    #[default]
    Swamp,
    /// Only mode 0 collinear; modes 1 and 2 are independent draws
    OneMode,
    /// Modes 0 and 1 collinear; mode 2 is an independent draw
    TwoModes,
}

impl BottleneckMode {
    /// Raw scenario index (0 = swamp, 1 = one collinear mode, 2 = two)
    pub fn index(self) -> u8 {
        match self {
            BottleneckMode::Swamp => 0,
            BottleneckMode::OneMode => 1,
            BottleneckMode::TwoModes => 2,
        }
    }

    /// Modes whose factors are replaced by independent draws
    pub fn broken_modes(self) -> &'static [usize] {
        match self {
            BottleneckMode::Swamp => &[],
            BottleneckMode::OneMode => &[1, 2],
            BottleneckMode::TwoModes => &[2],
        }
    }
}

impl TryFrom<u8> for BottleneckMode {
    type Error = SimError;

    fn try_from(value: u8) -> SimResult<Self> {
        match value {
            0 => Ok(BottleneckMode::Swamp),
            1 => Ok(BottleneckMode::OneMode),
            2 => Ok(BottleneckMode::TwoModes),
            other => Err(SimError::invalid(
                "bottleneck_mode",
                format!("{} is not one of 0, 1, 2", other),
            )),
        }
    }
}

/// Parameters of one simulated array
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Mode size I (the array is I×I×I)
    pub size: usize,
    /// Number of latent components R
    pub rank: usize,
    /// Off-diagonal column correlation c ∈ [0, 1)
    pub collinearity: f64,
    /// Homoscedastic noise level in percent, [0, 100)
    pub l1: f64,
    /// Heteroscedastic noise level in percent, [0, 100)
    pub l2: f64,
    pub bottleneck: BottleneckMode,
}

impl SimulationParams {
    /// Noiseless swamp of the given size, rank and collinearity
    pub fn new(size: usize, rank: usize, collinearity: f64) -> Self {
        Self {
            size,
            rank,
            collinearity,
            l1: 0.0,
            l2: 0.0,
            bottleneck: BottleneckMode::Swamp,
        }
    }

    pub fn with_noise(mut self, l1: f64, l2: f64) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    pub fn with_bottleneck(mut self, bottleneck: BottleneckMode) -> Self {
        self.bottleneck = bottleneck;
        self
    }

    /// Whether either noise level is non-zero
    pub fn is_noisy(&self) -> bool {
        self.l1 > 0.0 || self.l2 > 0.0
    }

    /// Reject out-of-range parameters before any work is done
    pub fn validate(&self) -> SimResult<()> {
        if self.rank == 0 {
            return Err(SimError::invalid("rank", "must be at least 1"));
        }
        if self.size < self.rank {
            return Err(SimError::invalid(
                "size",
                format!("{} is smaller than rank {}", self.size, self.rank),
            ));
        }
        if !(0.0..1.0).contains(&self.collinearity) {
            return Err(SimError::invalid(
                "collinearity",
                format!("{} is outside [0, 1)", self.collinearity),
            ));
        }
        validate_noise_level("l1", self.l1)?;
        validate_noise_level("l2", self.l2)?;
        Ok(())
    }
}

/// Output of one simulation call
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    /// Noiseless array Z
    pub clean: DenseND<f64>,
    /// Z plus homoscedastic noise (Z′)
    pub noisy: DenseND<f64>,
    /// Z′ plus heteroscedastic noise (Z″)
    pub doubly_noisy: DenseND<f64>,
    /// Ground-truth factors after any bottleneck override
    pub factors: FactorSet<f64>,
}

/// Simulate with a dedicated generator seeded from `seed`
///
/// # Examples
///
/// ```
/// use swampsim_sim::{simulate, SimulationParams};
///
/// let params = SimulationParams::new(6, 2, 0.9).with_noise(1.0, 0.0);
/// let sim = simulate(1, &params).unwrap();
///
/// assert_eq!(sim.clean.shape(), &[6, 6, 6]);
/// assert_eq!(sim.noisy, sim.doubly_noisy);
/// assert_ne!(sim.clean, sim.noisy);
/// ```
pub fn simulate(seed: u64, params: &SimulationParams) -> SimResult<Simulation> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_with_rng(&mut rng, params)
}

/// Simulate drawing from a caller-supplied generator
pub fn simulate_with_rng<R>(rng: &mut R, params: &SimulationParams) -> SimResult<Simulation>
where
    R: Rng + ?Sized,
{
    params.validate()?;

    let correlation = CorrelationFactor::build(params.rank, params.collinearity)?;

    let mut factors = Vec::with_capacity(N_MODES);
    for _ in 0..N_MODES {
        factors.push(correlated_factor(params.size, &correlation, rng)?);
    }

    let broken = params.bottleneck.broken_modes();
    if !broken.is_empty() {
        let entries: Vec<f64> = factors.iter().flat_map(|f| f.iter().copied()).collect();
        let sigma = population_std(&entries)
            .ok_or_else(|| SimError::invalid("factors", "no entries to match scale against"))?;
        for &mode in broken {
            factors[mode] = normal_matrix(params.size, params.rank, sigma, rng)?;
        }
    }

    let factors = FactorSet::new(factors)?;
    let clean = factors.reconstruct()?;
    let noisy = add_homoscedastic(&clean, params.l1, rng)?;
    let doubly_noisy = add_heteroscedastic(&noisy, params.l2, rng)?;

    tracing::debug!(
        size = params.size,
        rank = params.rank,
        collinearity = params.collinearity,
        l1 = params.l1,
        l2 = params.l2,
        bottleneck = params.bottleneck.index(),
        norm = clean.frobenius_norm(),
        "simulated tensor"
    );

    Ok(Simulation {
        clean,
        noisy,
        doubly_noisy,
        factors,
    })
}

/// Orthonormalized normal draw with the correlation factor imprinted
fn correlated_factor<R>(
    size: usize,
    correlation: &CorrelationFactor,
    rng: &mut R,
) -> SimResult<Array2<f64>>
where
    R: Rng + ?Sized,
{
    let rank = correlation.rank();
    let draw = normal_matrix(size, rank, 1.0, rng)?;

    // Q may come back square; the first `rank` columns span the draw
    let (q_full, _r) = scirs2_linalg::qr(&draw.view(), None)?;
    let q = q_full.slice(s![.., ..rank]).to_owned();

    correlation.imprint(&q.view())
}

fn normal_matrix<R>(rows: usize, cols: usize, std: f64, rng: &mut R) -> SimResult<Array2<f64>>
where
    R: Rng + ?Sized,
{
    let draw = DenseND::random_normal(&[rows, cols], 0.0, std, rng)?;
    Ok(draw.unfold(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swampsim_core::stats::{column_correlation, mean_off_diagonal};

    fn bits(t: &DenseND<f64>) -> Vec<u64> {
        t.iter().map(|v| v.to_bits()).collect()
    }

    #[test]
    fn test_shapes() {
        let sim = simulate(0, &SimulationParams::new(8, 3, 0.5)).unwrap();
        assert_eq!(sim.clean.shape(), &[8, 8, 8]);
        assert_eq!(sim.factors.n_modes(), 3);
        for f in &sim.factors.factors {
            assert_eq!(f.shape(), &[8, 3]);
        }
    }

    #[test]
    fn test_noiseless_variants_are_identical() {
        let sim = simulate(3, &SimulationParams::new(7, 2, 0.9)).unwrap();
        assert_eq!(bits(&sim.clean), bits(&sim.noisy));
        assert_eq!(bits(&sim.noisy), bits(&sim.doubly_noisy));
    }

    #[test]
    fn test_factor_columns_have_target_gram() {
        let sim = simulate(5, &SimulationParams::new(30, 4, 0.9)).unwrap();
        for f in &sim.factors.factors {
            let gram = f.t().dot(f);
            for i in 0..4 {
                for j in 0..4 {
                    let expected = if i == j { 1.0 } else { 0.9 };
                    assert!((gram[[i, j]] - expected).abs() < 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_zero_collinearity_factors_are_orthonormal() {
        let sim = simulate(11, &SimulationParams::new(20, 3, 0.0)).unwrap();
        for f in &sim.factors.factors {
            let gram = f.t().dot(f);
            for i in 0..3 {
                for j in 0..3 {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert!((gram[[i, j]] - expected).abs() < 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_two_modes_bottleneck_only_breaks_last_mode() {
        let params = SimulationParams::new(100, 5, 0.9).with_bottleneck(BottleneckMode::TwoModes);
        let sim = simulate(2, &params).unwrap();

        let corr: Vec<f64> = sim
            .factors
            .factors
            .iter()
            .map(|f| mean_off_diagonal(&column_correlation(&f.view())))
            .collect();

        assert!((corr[0] - 0.9).abs() < 0.1, "mode 0: {}", corr[0]);
        assert!((corr[1] - 0.9).abs() < 0.1, "mode 1: {}", corr[1]);
        assert!(corr[2].abs() < 0.2, "mode 2: {}", corr[2]);
    }

    #[test]
    fn test_validation_runs_before_work() {
        let cases = [
            SimulationParams::new(5, 0, 0.5),
            SimulationParams::new(2, 3, 0.5),
            SimulationParams::new(5, 2, 1.0),
            SimulationParams::new(5, 2, -0.5),
            SimulationParams::new(5, 2, 0.5).with_noise(100.0, 0.0),
            SimulationParams::new(5, 2, 0.5).with_noise(0.0, -3.0),
        ];
        for params in &cases {
            assert!(simulate(0, params).is_err(), "{:?}", params);
        }
        assert!(matches!(
            simulate(0, &SimulationParams::new(5, 2, 0.5).with_noise(0.0, 100.0)),
            Err(SimError::InvalidNoiseLevel { name: "l2", .. })
        ));
    }

    #[test]
    fn test_bottleneck_index_roundtrip() {
        for mode in [BottleneckMode::Swamp, BottleneckMode::OneMode, BottleneckMode::TwoModes] {
            assert_eq!(BottleneckMode::try_from(mode.index()).unwrap(), mode);
        }
        assert!(BottleneckMode::try_from(3).is_err());
    }

    #[test]
    fn test_params_serde() {
        let params = SimulationParams::new(20, 3, 0.9)
            .with_noise(1.0, 5.0)
            .with_bottleneck(BottleneckMode::OneMode);
        let json = serde_json::to_string(&params).unwrap();
        let back: SimulationParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}

//! # swampsim-sim - Synthetic tensors with controlled ill-conditioning
//!
//! Generates three-way arrays of known CP rank whose latent factors are
//! collinear to a prescribed degree, then perturbs them at exact noise
//! levels. These arrays are the adversarial inputs ("swamps" and
//! "bottlenecks") on which decomposition algorithms are benchmarked.
//!
//! ## Components
//!
//! - [`CorrelationFactor`]: upper Cholesky factor of K = c·J + (1 − c)·I
//! - [`simulate`]: factor generation, bottleneck overrides, reconstruction
//!   and noise injection
//! - [`noise`]: homoscedastic and heteroscedastic perturbations
//!
//! ## Quick Start
//!
//! ```
//! use swampsim_sim::{simulate, BottleneckMode, SimulationParams};
//!
//! let params = SimulationParams::new(10, 3, 0.9)
//!     .with_noise(1.0, 1.0)
//!     .with_bottleneck(BottleneckMode::TwoModes);
//!
//! let sim = simulate(42, &params)?;
//! assert_eq!(sim.clean.shape(), &[10, 10, 10]);
//! assert_eq!(sim.factors.rank(), 3);
//! # Ok::<(), swampsim_sim::SimError>(())
//! ```
//!
//! ## Reproducibility
//!
//! Every call to [`simulate`] seeds its own `StdRng`; there is no shared
//! generator. [`simulate_with_rng`] accepts a caller-owned generator
//! instead.
//!
//! ## Input constraints
//!
//! - `1 <= rank <= size`
//! - `0 <= collinearity < 1`
//! - `0 <= l1, l2 < 100` (the scale `1/√(100/l − 1)` is undefined at 100)

#![deny(warnings)]

pub mod correlation;
pub mod error;
pub mod noise;
pub mod simulator;


pub use correlation::{correlation_matrix, CorrelationFactor};
pub use error::{SimError, SimResult};
pub use noise::{add_heteroscedastic, add_homoscedastic, noise_scale, validate_noise_level};
pub use simulator::{simulate, simulate_with_rng, BottleneckMode, Simulation, SimulationParams, N_MODES};

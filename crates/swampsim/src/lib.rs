//! # SwampSim - Swamp and bottleneck benchmarks for CP decomposition
//!
//! This is the **meta crate** that re-exports all SwampSim components.
//!
//! ## Quick Start
//!
//! ```
//! use swampsim::prelude::*;
//!
//! let params = SimulationParams::new(10, 3, 0.9).with_noise(1.0, 0.0);
//! let sim = simulate(0, &params)?;
//! assert_eq!(sim.clean.shape(), &[10, 10, 10]);
//!
//! let grid = ParameterGrid::standard(&GridConfig::new(5, 1.0, 0.0))?;
//! assert_eq!(grid.len(), 16);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! - [`core`]: dense tensors, Khatri-Rao products, CP reconstruction,
//!   column statistics
//! - [`sim`]: correlated factors, bottleneck scenarios, exact-ratio noise
//! - [`harness`]: the experiment grid, the [`Factorizer`](harness::Factorizer)
//!   boundary, error correction and CSV results

#![deny(warnings)]

pub use swampsim_core as core;
pub use swampsim_harness as harness;
pub use swampsim_sim as sim;

pub mod prelude {
    //! Prelude module for convenient imports

    pub use crate::core::{cp_reconstruct, khatri_rao, DenseND, FactorSet};

    pub use crate::sim::{simulate, BottleneckMode, CorrelationFactor, Simulation, SimulationParams};

    pub use crate::harness::{
        summarize, ErrorScale, ExperimentHarness, Factorization, FactorizeRequest, Factorizer,
        GridConfig, GridRow, HarnessConfig, ParameterGrid, Representation, ResultsTable,
        RunRecord, TensorInput,
    };
}

//! # swampsim-core
//!
//! Core array types and kernels for SwampSim.
//!
//! - **Dense arrays** ([`DenseND`]) in row-major layout with Frobenius norms,
//!   elementwise products, scaled sums and mode-n unfolding
//! - **CP factor sets** ([`FactorSet`]) with rank-R reconstruction
//! - **Khatri-Rao products** ([`khatri_rao`], [`khatri_rao_chain`])
//! - **Statistics** ([`stats`]) for column correlations and run summaries
//!
//! ## SciRS2 Integration
//!
//! All array and random-number access goes through `scirs2_core`
//! (`ndarray_ext`, `numeric`, `random`).
//!
//! ## Quick Start
//!
//! ```
//! use scirs2_core::ndarray_ext::Array2;
//! use swampsim_core::{DenseND, FactorSet};
//!
//! let factors = FactorSet::new(vec![
//!     Array2::<f64>::ones((4, 2)),
//!     Array2::<f64>::ones((4, 2)),
//!     Array2::<f64>::ones((4, 2)),
//! ])
//! .unwrap();
//!
//! let tensor: DenseND<f64> = factors.reconstruct().unwrap();
//! assert_eq!(tensor.shape(), &[4, 4, 4]);
//! assert_eq!(tensor.get(&[0, 0, 0]), Some(2.0));
//! ```

#![deny(warnings)]

pub mod dense;
pub mod error;
pub mod factors;
pub mod khatri_rao;
pub mod stats;


pub use dense::DenseND;
pub use error::{KernelError, KernelResult};
pub use factors::{cp_reconstruct, FactorSet};
pub use khatri_rao::{khatri_rao, khatri_rao_chain};

//! Harness and grid configuration
//!
//! Configuration structs derive serde so an experiment's settings can be
//! stored as JSON next to its results table.

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use swampsim_sim::BottleneckMode;

/// How the noise-corrected final error is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorScale {
    /// ‖Z − Ẑ‖
    #[default]
    Absolute,
    /// ‖Z − Ẑ‖ / ‖Z‖
    Relative,
}

/// Settings shared by every run of an experiment
///
/// # Examples
///
/// ```
/// use swampsim_harness::{ErrorScale, HarnessConfig};
///
/// let config = HarnessConfig::default()
///     .with_max_iters(200)
///     .with_error_scale(ErrorScale::Relative);
///
/// let json = config.to_json().unwrap();
/// assert_eq!(HarnessConfig::from_json(&json).unwrap(), config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Iteration cap handed to the factorizer
    pub max_iters: usize,
    /// Convergence tolerance handed to the factorizer
    pub tol: f64,
    /// Normalization of the noise-corrected error
    pub error_scale: ErrorScale,
    /// Scenario used for every simulated array
    pub bottleneck: BottleneckMode,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_iters: 5000,
            tol: 1e-8,
            error_scale: ErrorScale::Absolute,
            bottleneck: BottleneckMode::Swamp,
        }
    }
}

impl HarnessConfig {
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_error_scale(mut self, error_scale: ErrorScale) -> Self {
        self.error_scale = error_scale;
        self
    }

    pub fn with_bottleneck(mut self, bottleneck: BottleneckMode) -> Self {
        self.bottleneck = bottleneck;
        self
    }

    pub fn validate(&self) -> HarnessResult<()> {
        if self.max_iters == 0 {
            return Err(HarnessError::InvalidParameter {
                name: "max_iters",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(HarnessError::InvalidParameter {
                name: "tol",
                reason: format!("{} is not a finite non-negative tolerance", self.tol),
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> HarnessResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Caller-chosen settings applied to every row of the standard grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Independent simulated instances per tensor type
    pub runs: usize,
    /// Homoscedastic noise level in percent
    pub l1: f64,
    /// Heteroscedastic noise level in percent
    pub l2: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            runs: 5,
            l1: 0.0,
            l2: 0.0,
        }
    }
}

impl GridConfig {
    pub fn new(runs: usize, l1: f64, l2: f64) -> Self {
        Self { runs, l1, l2 }
    }
}

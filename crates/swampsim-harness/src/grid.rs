//! The fixed experiment grid
//!
//! Sixteen tensor types span R ∈ {3, 5}, I ∈ {20, 50, 100, 250} and
//! c ∈ {0.5, 0.9}. Rank varies slowest and collinearity fastest; labels run
//! 1..=16 in that order.

use crate::config::GridConfig;
use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use swampsim_sim::{BottleneckMode, SimulationParams};

/// Ranks of the standard grid
pub const STANDARD_RANKS: [usize; 2] = [3, 5];

/// Mode sizes of the standard grid
pub const STANDARD_SIZES: [usize; 4] = [20, 50, 100, 250];

/// Collinearities of the standard grid
pub const STANDARD_COLLINEARITIES: [f64; 2] = [0.5, 0.9];

/// One tensor type of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub rank: usize,
    pub size: usize,
    pub collinearity: f64,
    pub l1: f64,
    pub l2: f64,
    pub runs: usize,
}

impl GridRow {
    pub fn new(rank: usize, size: usize, collinearity: f64, runs: usize) -> Self {
        Self {
            rank,
            size,
            collinearity,
            l1: 0.0,
            l2: 0.0,
            runs,
        }
    }

    pub fn with_noise(mut self, l1: f64, l2: f64) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    /// True when either noise level is non-zero
    pub fn is_noisy(&self) -> bool {
        self.l1 != 0.0 || self.l2 != 0.0
    }

    /// Simulator parameters for this row under a bottleneck scenario
    pub fn simulation_params(&self, bottleneck: BottleneckMode) -> SimulationParams {
        SimulationParams::new(self.size, self.rank, self.collinearity)
            .with_noise(self.l1, self.l2)
            .with_bottleneck(bottleneck)
    }

    pub fn validate(&self) -> HarnessResult<()> {
        if self.runs == 0 {
            return Err(HarnessError::InvalidParameter {
                name: "runs",
                reason: "at least one run per tensor type is required".to_string(),
            });
        }
        self.simulation_params(BottleneckMode::Swamp)
            .validate()
            .map_err(|source| HarnessError::InvalidGridRow { source })
    }
}

/// Ordered list of tensor types sharing one run count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    rows: Vec<GridRow>,
}

impl ParameterGrid {
    /// The 16-row grid with the caller's run count and noise levels
    ///
    /// # Examples
    ///
    /// ```
    /// use swampsim_harness::{GridConfig, ParameterGrid};
    ///
    /// let grid = ParameterGrid::standard(&GridConfig::new(3, 1.0, 0.0)).unwrap();
    /// assert_eq!(grid.len(), 16);
    ///
    /// let first = grid.row(1).unwrap();
    /// assert_eq!((first.rank, first.size, first.collinearity), (3, 20, 0.5));
    /// let last = grid.row(16).unwrap();
    /// assert_eq!((last.rank, last.size, last.collinearity), (5, 250, 0.9));
    /// ```
    pub fn standard(config: &GridConfig) -> HarnessResult<Self> {
        let mut rows = Vec::with_capacity(
            STANDARD_RANKS.len() * STANDARD_SIZES.len() * STANDARD_COLLINEARITIES.len(),
        );
        for &rank in &STANDARD_RANKS {
            for &size in &STANDARD_SIZES {
                for &collinearity in &STANDARD_COLLINEARITIES {
                    rows.push(
                        GridRow::new(rank, size, collinearity, config.runs)
                            .with_noise(config.l1, config.l2),
                    );
                }
            }
        }
        Self::from_rows(rows)
    }

    /// Custom grid; every row must be valid and share the same run count
    pub fn from_rows(rows: Vec<GridRow>) -> HarnessResult<Self> {
        let first = rows.first().ok_or_else(|| HarnessError::InvalidParameter {
            name: "grid",
            reason: "grid has no rows".to_string(),
        })?;
        let runs = first.runs;
        for row in &rows {
            row.validate()?;
            if row.runs != runs {
                return Err(HarnessError::InvalidParameter {
                    name: "runs",
                    reason: format!("rows disagree on run count ({} vs {})", runs, row.runs),
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Row by 1-based label
    pub fn row(&self, label: usize) -> Option<&GridRow> {
        label.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Rows paired with their 1-based labels
    pub fn labeled(&self) -> impl Iterator<Item = (usize, &GridRow)> {
        self.rows.iter().enumerate().map(|(i, row)| (i + 1, row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Shared run count
    pub fn runs(&self) -> usize {
        self.rows.first().map_or(0, |row| row.runs)
    }
}

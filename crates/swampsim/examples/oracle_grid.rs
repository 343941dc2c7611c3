//! Run a small grid through an oracle factorizer and print the CSV table
//!
//! The oracle returns the generating factors of the simulated array, so the
//! noise-corrected errors are zero and the reported residuals measure the
//! injected noise alone. Swap in a real CP routine by implementing
//! `Factorizer`.

use anyhow::{anyhow, Result};
use std::time::Instant;
use swampsim::harness::tracing_support::{init_tracing, TracingConfig};
use swampsim::prelude::*;

struct Oracle {
    rows: Vec<GridRow>,
    calls: usize,
}

impl Factorizer for Oracle {
    fn name(&self) -> &str {
        "oracle"
    }

    fn factorize(&mut self, input: &TensorInput, request: &FactorizeRequest) -> Result<Factorization> {
        let started = Instant::now();
        let runs = self.rows.first().map_or(1, |r| r.runs);
        let row = *self
            .rows
            .get(self.calls / runs)
            .ok_or_else(|| anyhow!("no grid row for call {}", self.calls))?;
        self.calls += 1;

        let sim = simulate(request.seed, &row.simulation_params(BottleneckMode::Swamp))?;
        let residual = input.to_dense()?.distance(&sim.factors.reconstruct()?)?;
        let elapsed = started.elapsed().as_secs_f64();

        Ok(Factorization {
            elapsed,
            error_trace: vec![residual],
            factors: sim.factors,
            iteration_times: vec![elapsed],
        })
    }
}

fn main() -> Result<()> {
    init_tracing(TracingConfig::default())?;

    let rows: Vec<GridRow> = [(3, 20, 0.5), (3, 20, 0.9), (5, 30, 0.5), (5, 30, 0.9)]
        .into_iter()
        .map(|(rank, size, c)| GridRow::new(rank, size, c, 3).with_noise(1.0, 1.0))
        .collect();
    let grid = ParameterGrid::from_rows(rows.clone())?;

    let harness = ExperimentHarness::new(HarnessConfig::default())?;
    let table = harness.run_grid(&grid, &mut Oracle { rows, calls: 0 })?;

    table.write_csv(std::io::stdout())?;
    Ok(())
}

//! Benchmarks for tensor simulation across the standard sizes

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use swampsim_sim::{simulate, BottleneckMode, SimulationParams};

fn bench_simulate_swamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_swamp");

    for &(size, rank) in &[(20, 3), (50, 3), (50, 5), (100, 5)] {
        let params = SimulationParams::new(size, rank, 0.9).with_noise(1.0, 1.0);

        group.throughput(Throughput::Elements((size * size * size) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}x{}_r{}", size, size, size, rank)),
            &params,
            |b, params| b.iter(|| black_box(simulate(black_box(0), params))),
        );
    }

    group.finish();
}

fn bench_simulate_bottleneck(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_bottleneck");

    for mode in [BottleneckMode::OneMode, BottleneckMode::TwoModes] {
        let params = SimulationParams::new(50, 5, 0.9).with_bottleneck(mode);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", mode)),
            &params,
            |b, params| b.iter(|| black_box(simulate(black_box(0), params))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_simulate_swamp, bench_simulate_bottleneck);
criterion_main!(benches);

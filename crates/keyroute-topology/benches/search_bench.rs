//! Benchmarks for the nearest-match search.
//!
//! Measures:
//! - Full exploration (no node matches)
//! - Early exit at varying distances from the origin

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keyroute_topology::{nearest_matching, Topology};

/// Square grid with unit-cost links between orthogonal neighbours.
fn grid(side: usize) -> Topology {
    let name = |x: usize, y: usize| format!("s{x:04}-{y:04}");
    let mut edges = Vec::with_capacity(side * side * 2);
    for x in 0..side {
        for y in 0..side {
            if x + 1 < side {
                edges.push((name(x, y), name(x + 1, y), 1.0 + ((x * 7 + y) % 5) as f64));
            }
            if y + 1 < side {
                edges.push((name(x, y), name(x, y + 1), 1.0 + ((x + y * 3) % 5) as f64));
            }
        }
    }
    Topology::undirected(edges).expect("grid weights are positive")
}

fn bench_exhaustive(c: &mut Criterion) {
    let mut group = c.benchmark_group("exhaustive");

    for &side in &[8usize, 32, 128] {
        let topology = grid(side);
        let origin = "s0000-0000".to_string();
        group.throughput(Throughput::Elements(topology.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &side, |b, _| {
            b.iter(|| nearest_matching(black_box(&topology), &origin, |_| false))
        });
    }
    group.finish();
}

fn bench_early_exit(c: &mut Criterion) {
    let mut group = c.benchmark_group("early_exit");
    let topology = grid(128);
    let origin = "s0000-0000".to_string();

    for &hop in &[1usize, 8, 64] {
        let target = format!("s{hop:04}-{hop:04}");
        group.bench_with_input(BenchmarkId::new("diagonal", hop), &target, |b, target| {
            b.iter(|| nearest_matching(black_box(&topology), &origin, |id| id == target.as_str()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exhaustive, bench_early_exit);
criterion_main!(benches);

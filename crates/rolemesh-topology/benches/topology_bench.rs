//! Benchmarks for rolemesh topology construction
//!
//! Measures performance of:
//! - Random triangle grid network growth
//! - Adjacency construction from a layout
//! - Connectivity checks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, SeedableRng};
use rolemesh_topology::{NodeId, TriGridNetwork};

const SIZES: [usize; 4] = [30, 100, 300, 1000];

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigrid_generate");

    for &size in &SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                TriGridNetwork::generate(black_box(n), &mut rng)
            })
        });
    }
    group.finish();
}

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigrid_topology");

    for &size in &SIZES {
        let network = TriGridNetwork::generate(size, &mut StdRng::seed_from_u64(42));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &network, |b, net| {
            b.iter(|| black_box(net).topology())
        });
    }
    group.finish();
}

fn bench_connectivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("connectivity");

    for &size in &SIZES {
        let topology = TriGridNetwork::generate(size, &mut StdRng::seed_from_u64(42)).topology();
        group.bench_with_input(BenchmarkId::from_parameter(size), &topology, |b, t| {
            b.iter(|| black_box(t).unreachable_from(NodeId(0)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_topology, bench_connectivity);
criterion_main!(benches);

use astar_lsh::{AStarLattice, LshStore};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

const DIMS: &[usize] = &[4, 16, 64];
const NUM_QUERIES: usize = 256;

fn gaussian_vectors(seed: u64, dim: usize, count: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 10.0).unwrap();
    (0..count)
        .map(|_| (0..dim).map(|_| normal.sample(&mut rng)).collect())
        .collect()
}

// ============================================================================
// DECODING
// ============================================================================

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    group.throughput(Throughput::Elements(NUM_QUERIES as u64));

    for &dim in DIMS {
        let lattice = AStarLattice::new(dim, 1.0, 0).unwrap();
        let queries = gaussian_vectors(42, dim, NUM_QUERIES);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| {
                for q in &queries {
                    black_box(lattice.nearest_hash(black_box(q)).unwrap());
                }
            })
        });
    }
    group.finish();
}

fn bench_delaunay(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay");
    group.throughput(Throughput::Elements(NUM_QUERIES as u64));

    for &dim in DIMS {
        let lattice = AStarLattice::new(dim, 1.0, 0).unwrap();
        let queries = gaussian_vectors(43, dim, NUM_QUERIES);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| {
                for q in &queries {
                    black_box(lattice.delaunay_hashes(black_box(q)).unwrap());
                }
            })
        });
    }
    group.finish();
}

// ============================================================================
// EXTENDED PROBING
// ============================================================================

fn bench_extended(c: &mut Criterion) {
    let mut group = c.benchmark_group("extended");

    for &dim in DIMS {
        for shells in [1, 3] {
            let lattice = AStarLattice::new(dim, 1.0, shells).unwrap();
            let queries = gaussian_vectors(44, dim, NUM_QUERIES);
            group.throughput(Throughput::Elements((NUM_QUERIES * lattice.num_probes()) as u64));

            group.bench_with_input(
                BenchmarkId::new(format!("shells_{shells}"), dim),
                &dim,
                |b, _| {
                    b.iter(|| {
                        for q in &queries {
                            lattice
                                .extended_visit(black_box(q), |p: astar_lsh::Probe<'_>| -> Result<(), i32> {
                                    black_box(p.hash);
                                    Ok(())
                                })
                                .unwrap();
                        }
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_store_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_query");

    for &dim in &[4, 16] {
        let mut store = LshStore::new(dim, 4.0, 2).unwrap();
        for (i, v) in gaussian_vectors(45, dim, 10_000).into_iter().enumerate() {
            store.insert(v, i).unwrap();
        }
        let queries = gaussian_vectors(46, dim, NUM_QUERIES);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| {
                for q in &queries {
                    black_box(store.query(black_box(q)).unwrap());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nearest, bench_delaunay, bench_extended, bench_store_query);
criterion_main!(benches);

// Setup, search, and incremental-insert timing against the two obvious
// alternatives: a sorted Vec searched linearly and a BTreeMap used as
// an ordered multiset.

use std::collections::BTreeMap;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use strata::Strata;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];
const SEARCHES: usize = 2_000;

fn values(n: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| rng.random_range(0..n as i32) + n as i32 / 2)
        .collect()
}

/// Values mostly absent from the `values` range.
fn probes(n: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..SEARCHES).map(|_| rng.random_range(0..2 * n as i32)).collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build from slice");
    for n in SIZES {
        let data = values(n, 1);
        group.bench_with_input(BenchmarkId::new("Strata", n), &data, |b, d| {
            b.iter(|| Strata::from_slice(d, true))
        });
        group.bench_with_input(BenchmarkId::new("Vec", n), &data, |b, d| {
            b.iter(|| {
                let mut v = d.to_vec();
                v.sort_unstable();
                v
            })
        });
        group.bench_with_input(BenchmarkId::new("BTreeMap", n), &data, |b, d| {
            b.iter(|| {
                let mut m = BTreeMap::new();
                for &v in d {
                    *m.entry(v).or_insert(0u32) += 1;
                }
                m
            })
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership search");
    for n in SIZES {
        let data = values(n, 1);
        let queries = probes(n, 2);

        let s = Strata::from_slice(&data, true);
        group.bench_with_input(BenchmarkId::new("Strata", n), &queries, |b, q| {
            b.iter(|| q.iter().filter(|&v| s.contains(v)).count())
        });

        let v = data.clone();
        group.bench_with_input(BenchmarkId::new("Vec", n), &queries, |b, q| {
            b.iter(|| q.iter().filter(|&x| v.contains(x)).count())
        });

        let mut m = BTreeMap::new();
        for &x in &data {
            *m.entry(x).or_insert(0u32) += 1;
        }
        group.bench_with_input(BenchmarkId::new("BTreeMap", n), &queries, |b, q| {
            b.iter(|| q.iter().filter(|&x| m.contains_key(x)).count())
        });
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("build one value at a time");
    for n in SIZES {
        let data = values(n, 3);
        group.bench_with_input(BenchmarkId::new("Strata", n), &data, |b, d| {
            b.iter(|| {
                let mut s = Strata::new();
                for &v in d {
                    s.insert(v).unwrap();
                }
                s
            })
        });
        group.bench_with_input(BenchmarkId::new("Vec", n), &data, |b, d| {
            b.iter(|| {
                let mut v = Vec::new();
                for &x in d {
                    v.push(x);
                }
                v
            })
        });
        group.bench_with_input(BenchmarkId::new("BTreeMap", n), &data, |b, d| {
            b.iter(|| {
                let mut m = BTreeMap::new();
                for &x in d {
                    *m.entry(x).or_insert(0u32) += 1;
                }
                m
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_search, bench_insert);
criterion_main!(benches);

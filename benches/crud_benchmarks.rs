use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rbtree_set::RBTreeSet;
use std::collections::BTreeSet;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Key sequences ──────────────────────────────────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn patterns() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("set_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
            b.iter(|| {
                let mut set = RBTreeSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });

        group.finish();
    }
}

fn bench_set_contains(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
        let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
        let mut group = c.benchmark_group(format!("set_contains_{pattern}"));

        group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
            b.iter(|| keys.iter().filter(|k| rb_set.contains(black_box(*k))).count());
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().filter(|k| bt_set.contains(black_box(*k))).count());
        });

        group.finish();
    }
}

fn bench_set_remove(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
        let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
        let mut group = c.benchmark_group(format!("set_remove_{pattern}"));

        group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
            b.iter_batched(
                || rb_set.clone(),
                |mut set| {
                    for k in &keys {
                        set.remove(k);
                    }
                    set
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter_batched(
                || bt_set.clone(),
                |mut set| {
                    for k in &keys {
                        set.remove(k);
                    }
                    set
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

fn bench_set_traverse(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
    let mut group = c.benchmark_group("set_traverse");

    group.bench_function(BenchmarkId::new("RBTreeSet::iter", N), |b| {
        b.iter(|| rb_set.iter().copied().sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("RBTreeSet::cursor", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            let mut cursor = rb_set.begin();
            while let Some(value) = cursor.get() {
                sum = sum.wrapping_add(*value);
                cursor.move_next();
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet::iter", N), |b| {
        b.iter(|| bt_set.iter().copied().sum::<i64>());
    });

    group.finish();
}

criterion_group!(set_benches, bench_set_insert, bench_set_contains, bench_set_remove, bench_set_traverse,);

criterion_main!(set_benches);

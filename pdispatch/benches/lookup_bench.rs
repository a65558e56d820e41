//! Dispatch lookup benchmarks using criterion.
//!
//! Measures trie lookups as the number of sibling edges grows, and the
//! overhead of a full generic function call on top of the index.
//!
//! Run with: cargo bench --bench lookup_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdispatch::{GenericFunction, GenericOptions, MatchIndex, Predicate};

/// Build an index with `width` single-value predicates at each of `depth` levels.
fn build_index(width: u32, depth: usize) -> (MatchIndex<u32, u32>, Vec<Predicate<u32>>) {
    let predicates: Vec<_> = (0..width)
        .map(|n| Predicate::new(move |x: &u32| *x == n))
        .collect();
    let mut index = MatchIndex::new();
    for n in 0..width {
        let path = vec![predicates[n as usize].clone(); depth];
        index.set_value(&path, n);
    }
    (index, predicates)
}

fn bench_index_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_lookup");

    for width in [1u32, 8, 64] {
        let (index, _predicates) = build_index(width, 3);

        // The first registered edge is scanned last.
        group.bench_with_input(BenchmarkId::new("oldest_edge", width), &width, |b, _| {
            let features = [0u32; 3];
            b.iter(|| black_box(index.get_value(black_box(&features))));
        });

        group.bench_with_input(BenchmarkId::new("miss", width), &width, |b, &width| {
            let features = [width; 3];
            b.iter(|| black_box(index.get_value(black_box(&features))));
        });
    }

    group.finish();
}

fn bench_generic_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("generic_call");

    let is_small = Predicate::new(|x: &u32| *x < 100);
    let is_large = Predicate::new(|x: &u32| *x >= 100);
    let mut sum = GenericFunction::with_default(GenericOptions::new("sum", 2), |_: &[u32]| 0u32);
    sum.when(&[is_small.clone(), is_small], |a: &[u32]| a[0] + a[1]).unwrap();
    sum.when(&[is_large.clone(), is_large], |a: &[u32]| a[0] * a[1]).unwrap();

    group.bench_function("registered", |b| {
        b.iter(|| black_box(sum.call(black_box(&[3u32, 4][..]))))
    });

    group.bench_function("fallback", |b| {
        b.iter(|| black_box(sum.call(black_box(&[3u32, 400][..]))))
    });

    group.finish();
}

criterion_group!(benches, bench_index_lookup, bench_generic_call);
criterion_main!(benches);

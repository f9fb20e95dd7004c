use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use lazygraph::prelude::*;

/// Four neighbors of `v` on a `side x side` grid with row-major ids.
fn grid_neighbors(v: u32, side: u32) -> impl Iterator<Item = u32> {
    let (x, y) = (v % side, v / side);
    [
        (x + 1 < side).then(|| v + 1),
        (x > 0).then(|| v - 1),
        (y + 1 < side).then(|| v + side),
        (y > 0).then(|| v - side),
    ]
    .into_iter()
    .flatten()
}

fn weight(a: u32, b: u32) -> u64 {
    u64::from((a.min(b).wrapping_mul(2_654_435_761) ^ a.max(b)) % 9 + 1)
}

fn bench_breadth_first(c: &mut Criterion) {
    let mut group = c.benchmark_group("breadth_first");

    for &side in &[64u32, 256u32] {
        let n = (side * side) as usize;

        group.bench_with_input(BenchmarkId::new("hash_gear", side), &side, |b, &side| {
            b.iter(|| {
                let mut bfs = TraversalBreadthFirst::new(|&v: &u32, _: &_| grid_neighbors(v, side));
                bfs.start_from([0]);
                black_box(bfs.iter().count());
            });
        });

        group.bench_with_input(BenchmarkId::new("dense_gear", side), &side, |b, &side| {
            b.iter(|| {
                let mut bfs = TraversalBreadthFirst::with_gear(
                    |&v: &u32, _: &_| grid_neighbors(v, side),
                    Identity,
                    DenseGear::<()>::new(n),
                );
                bfs.start_from([0]);
                black_box(bfs.iter().count());
            });
        });
    }

    group.finish();
}

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths");

    for &side in &[64u32, 256u32] {
        let n = (side * side) as usize;
        let goal = side * side - 1;

        group.bench_with_input(BenchmarkId::new("hash_gear", side), &side, |b, &side| {
            b.iter(|| {
                let mut sp = TraversalShortestPaths::new(|&v: &u32, _: &_| {
                    grid_neighbors(v, side).map(move |u| (u, weight(v, u)))
                });
                sp.start_from([0]);
                black_box(sp.go_to(&goal, false).ok());
            });
        });

        group.bench_with_input(BenchmarkId::new("dense_native_gear", side), &side, |b, &side| {
            b.iter(|| {
                let mut sp = TraversalShortestPaths::with_gear(
                    |&v: &u32, _: &_| grid_neighbors(v, side).map(move |u| (u, weight(v, u))),
                    Identity,
                    DenseNativeGear::new(n, u64::MAX),
                );
                sp.start_from([0]);
                black_box(sp.go_to(&goal, false).ok());
            });
        });

        group.bench_with_input(BenchmarkId::new("bidirectional", side), &side, |b, &side| {
            b.iter(|| {
                let mut search = BSearchShortestPath::new(
                    |&v: &u32, _: &_| grid_neighbors(v, side).map(move |u| (u, weight(v, u))),
                    |&v: &u32, _: &_| grid_neighbors(v, side).map(move |u| (u, weight(u, v))),
                );
                black_box(search.start_from([0], [goal]).ok());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_breadth_first, bench_shortest_paths);
criterion_main!(benches);

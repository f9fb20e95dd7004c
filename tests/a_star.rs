mod util;

use lazygraph::prelude::*;
use proptest::prelude::*;
use util::{grid_neighbors, grid_weight, manhattan};

#[test]
fn inconsistent_heuristic_reopens_vertices() {
    // s -> a -> c costs 3, s -> b -> c costs 2; h(b) delays b until c was reported once
    let mut astar = TraversalAStar::new(|v: &char, _: &_| match v {
        's' => vec![('a', 1u32), ('b', 1)],
        'a' => vec![('c', 2)],
        'b' => vec![('c', 1)],
        'c' => vec![('g', 10)],
        _ => vec![],
    });
    astar.start_from_with(
        |v: &char| if *v == 'b' { 11 } else { 0 },
        ['s'],
        AStarOptions::new().build_paths(true),
    );
    let mut log = Vec::new();
    while let Some(v) = astar.next_vertex().unwrap() {
        log.push((v, astar.path_length()));
    }
    assert_eq!(
        log,
        vec![('a', 1), ('c', 3), ('b', 1), ('c', 2), ('g', 12)]
    );
    assert_eq!(astar.paths().unwrap().path(&'g').unwrap(), vec!['s', 'b', 'c', 'g']);
    assert_eq!(astar.depth(), 3);
}

#[test]
fn hopeless_vertices_are_pruned() {
    // x is a dead end; an infinite estimate marks it as such
    let mut astar = TraversalAStar::new(|v: &char, _: &_| match v {
        's' => vec![('x', 1.0f64), ('a', 1.0)],
        'a' => vec![('g', 1.0)],
        _ => vec![],
    });
    astar.start_from(|v: &char| if *v == 'x' { f64::INFINITY } else { 0.0 }, ['s']);
    let mut log = Vec::new();
    while let Some(v) = astar.next_vertex().unwrap() {
        log.push((v, astar.path_length()));
    }
    assert_eq!(log, vec![('a', 1.0), ('g', 2.0)]);
}

#[test]
fn estimates_beyond_the_weight_range_are_pruned() {
    let mut astar = TraversalAStar::new(|v: &u8, _: &_| [(v + 1, 1u32)]);
    astar.start_from(|v: &u8| if *v >= 3 { u32::MAX } else { 0 }, [0]);
    let reached: Vec<u8> = astar.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(reached, vec![1, 2]);
    assert_eq!(astar.phase(), Phase::Exhausted);
}

#[test]
fn zero_heuristic_behaves_like_dijkstra() {
    let edges = |v: &u32| [(v + 1, 2u32), (v + 3, 5)];
    let mut astar = TraversalAStar::new(move |v: &u32, _: &_| edges(v));
    astar.start_from(|_: &u32| 0, [0]);
    let mut sp = TraversalShortestPaths::new(move |v: &u32, _: &_| edges(v));
    sp.start_from([0]);
    for _ in 0..20 {
        let a = astar.next_vertex().unwrap();
        let d = sp.next_vertex().unwrap();
        assert_eq!(a.is_some(), d.is_some());
        assert_eq!(astar.path_length(), sp.distance());
    }
}

#[test]
fn calculation_limit_on_an_endless_grid() {
    let mut astar = TraversalAStar::new(|p: &(i64, i64), _: &_| grid_neighbors(p).map(|q| (q, 1u64)));
    astar.start_from_with(
        |p: &(i64, i64)| manhattan(*p, (1_000, 1_000)),
        [(0, 0)],
        AStarOptions::new().calculation_limit(50),
    );
    assert_eq!(
        astar.go_to(&(1_000, 1_000), false),
        Err(TraversalError::CalculationLimitExceeded { limit: 50 })
    );
}

#[test]
fn unstarted_search_is_an_error() {
    let mut astar = TraversalAStar::new(|v: &u32, _: &_| [(v + 1, 1u32)]);
    assert_eq!(astar.next_vertex(), Err(TraversalError::NotStarted));
}

proptest! {
    #[test]
    fn path_length_matches_dijkstra(
        dx in -8i64..=8,
        dy in -8i64..=8,
        seed in any::<u64>(),
    ) {
        prop_assume!((dx, dy) != (0, 0));
        let goal = (dx, dy);

        let mut sp = TraversalShortestPaths::new(move |p: &(i64, i64), _: &_| {
            grid_neighbors(p).map(|q| (q, grid_weight(*p, q, seed)))
        });
        sp.start_from([(0, 0)]);
        prop_assert_eq!(sp.go_to(&goal, false), Ok(Some(goal)));

        let mut astar = TraversalAStar::new(move |p: &(i64, i64), _: &_| {
            grid_neighbors(p).map(|q| (q, grid_weight(*p, q, seed)))
        });
        astar.start_from_with(
            move |p: &(i64, i64)| manhattan(*p, goal),
            [(0, 0)],
            AStarOptions::new().build_paths(true),
        );
        prop_assert_eq!(astar.go_to(&goal, false), Ok(Some(goal)));
        prop_assert_eq!(astar.path_length(), sp.distance());
        prop_assert!(astar.expanded_vertices() <= sp.expanded_vertices());

        let path = astar.paths().unwrap().path(&goal).unwrap();
        let weight: u64 = path.windows(2).map(|p| grid_weight(p[0], p[1], seed)).sum();
        prop_assert_eq!(weight, astar.path_length());
        prop_assert_eq!(path.len(), astar.depth() + 1);
    }
}

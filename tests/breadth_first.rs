mod util;

use lazygraph::algs::strategy::SearchState;
use lazygraph::prelude::*;
use proptest::prelude::*;
use util::{bfs_depths, maze_neighbors, random_graph};

#[test]
fn maze_shortest_route() {
    let mut bfs = TraversalBreadthFirst::new(|p: &(i32, i32), _: &_| maze_neighbors(p));
    bfs.start_from_with([(0, 0)], StartOptions::new().build_paths(true));
    assert_eq!(bfs.go_to(&(4, 4), false), Ok(Some((4, 4))));
    assert_eq!(bfs.depth(), 12);
    let path = bfs.paths().unwrap().path(&(4, 4)).unwrap();
    assert_eq!(
        path,
        vec![
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 3),
            (2, 3),
            (2, 2),
            (2, 1),
            (3, 1),
            (4, 1),
            (4, 2),
            (4, 3),
            (4, 4),
        ]
    );
}

#[test]
fn depth_range_on_infinite_graph() {
    let mut bfs = TraversalBreadthFirst::new(|v: &u64, _: &_| [v + 2]);
    bfs.start_from([0]);
    let found: Vec<u64> = bfs
        .go_for_depth_range(10..20)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(found, vec![20, 22, 24, 26, 28, 30, 32, 34, 36, 38]);
    // 40 ended the range and was consumed
    assert_eq!(bfs.next_vertex(), Ok(Some(42)));
}

#[test]
fn calculation_limit_ends_the_run() {
    let mut bfs = TraversalBreadthFirst::new(|v: &u64, _: &_| [v + 1]);
    bfs.start_from_with([0], StartOptions::new().calculation_limit(3));
    for expected in 1..=3 {
        assert_eq!(bfs.next_vertex(), Ok(Some(expected)));
    }
    assert_eq!(
        bfs.next_vertex(),
        Err(TraversalError::CalculationLimitExceeded { limit: 3 })
    );
    assert_eq!(bfs.phase(), Phase::Exhausted);
    assert_eq!(bfs.next_vertex(), Ok(None));
}

#[test]
fn vertices_in_reports_misses() {
    let mut bfs = TraversalBreadthFirst::new(|v: &u32, _: &_| if *v < 2 { vec![v + 1] } else { vec![] });
    bfs.start_from([0]);
    let got: Vec<_> = bfs.go_for_vertices_in([2, 9], false).collect();
    assert_eq!(
        got,
        vec![Ok(2), Err(TraversalError::VertexNotFound("9".to_string()))]
    );

    bfs.start_from([0]);
    let got: Vec<_> = bfs.go_for_vertices_in([2, 9], true).collect();
    assert_eq!(got, vec![Ok(2)]);
}

#[test]
fn visited_set_carries_over_between_runs() {
    let mut bfs = TraversalBreadthFirst::new(|v: &u32, _: &_| match v {
        0 => vec![1],
        1 => vec![2],
        5 => vec![1, 6],
        _ => vec![],
    });
    bfs.start_from([0]);
    let first: Vec<u32> = bfs.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(first, vec![1, 2]);

    let visited = bfs.take_visited();
    bfs.start_from_with([5], StartOptions::new().already_visited(visited));
    let second: Vec<u32> = bfs.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(second, vec![6]);
    assert_eq!(bfs.visited().len(), 5);
}

fn children(v: &u32, _: &SearchState<u32, (), Identity, HashGear>) -> Vec<u32> {
    if *v < 15 { vec![2 * v + 1, 2 * v + 2] } else { vec![] }
}

#[test]
fn tree_mode_matches_on_trees() {
    let mut plain = TraversalBreadthFirst::new(children);
    plain.start_from([0]);
    let expected: Vec<u32> = plain.iter().collect::<Result<_, _>>().unwrap();

    let mut tree = TraversalBreadthFirst::new(children);
    tree.start_from_with([0], StartOptions::new().is_tree(true));
    let got: Vec<u32> = tree.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(got, expected);
    assert!(tree.visited().is_empty());
}

#[test]
fn restart_discards_previous_run() {
    let mut bfs = TraversalBreadthFirst::new(|v: &u32, _: &_| if *v < 3 { vec![v + 1] } else { vec![] });
    bfs.start_from([0]);
    assert_eq!(bfs.next_vertex(), Ok(Some(1)));
    bfs.start_from([1]);
    let rest: Vec<u32> = bfs.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(rest, vec![2, 3]);
}

proptest! {
    #[test]
    fn depths_match_reference(n in 2usize..40, degree in 1usize..4, seed in any::<u64>()) {
        let g = random_graph(n, degree, 1, seed);
        let expected = bfs_depths(&g, 0);
        let mut bfs = TraversalBreadthFirst::new(|v: &usize, _: &_| {
            g[*v].iter().map(|&(t, _)| t).collect::<Vec<_>>()
        });
        bfs.start_from_with([0], StartOptions::new().build_paths(true));
        let mut last = 0;
        let mut reported = 0;
        while let Some(v) = bfs.next_vertex().unwrap() {
            let depth = bfs.depth();
            prop_assert!(depth >= last);
            prop_assert_eq!(Some(depth), expected[v]);
            let path = bfs.paths().unwrap().path(&v).unwrap();
            prop_assert_eq!(path.len(), depth + 1);
            for pair in path.windows(2) {
                prop_assert!(g[pair[0]].iter().any(|&(t, _)| t == pair[1]));
            }
            last = depth;
            reported += 1;
        }
        let reachable = expected.iter().skip(1).filter(|d| d.is_some()).count();
        prop_assert_eq!(reported, reachable);
    }

    #[test]
    fn neighbors_then_depth_reaches_the_same_set(
        n in 2usize..40,
        degree in 1usize..4,
        seed in any::<u64>(),
    ) {
        let g = random_graph(n, degree, 1, seed);
        let expected = bfs_depths(&g, 0);
        let mut ntd = TraversalNeighborsThenDepth::new(|v: &usize, _: &_| {
            g[*v].iter().map(|&(t, _)| t).collect::<Vec<_>>()
        });
        ntd.start_from([0]);
        let mut seen: Vec<usize> = ntd.iter().collect::<Result<_, _>>().unwrap();
        seen.sort_unstable();
        let reachable: Vec<usize> = (1..n).filter(|&v| expected[v].is_some()).collect();
        prop_assert_eq!(seen, reachable);
    }
}

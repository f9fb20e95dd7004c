mod util;

use lazygraph::prelude::*;
use proptest::prelude::*;
use util::{
    bellman_ford, bfs_depths, grid_neighbors, grid_weight, path_weight, random_graph, reversed,
};

#[test]
fn meets_in_the_middle_of_a_grid() {
    let goal = (10i64, 10i64);
    let mut bfs = TraversalBreadthFirst::new(|p: &(i64, i64), _: &_| grid_neighbors(p));
    bfs.start_from([(0, 0)]);
    bfs.go_to(&goal, false).unwrap();
    assert_eq!(bfs.depth(), 20);

    let mut search = BSearchBreadthFirst::new(
        |p: &(i64, i64), _: &_| grid_neighbors(p),
        |p: &(i64, i64), _: &_| grid_neighbors(p),
    );
    let meeting = search
        .start_from_with([(0, 0)], [goal], BidirectionalOptions::new().build_path(true))
        .unwrap()
        .unwrap();
    assert_eq!(meeting.length, 20);
    let path = meeting.path.unwrap();
    assert_eq!(path.first(), Some(&(0, 0)));
    assert_eq!(path.last(), Some(&goal));
    assert!(search.expanded_vertices() < bfs.expanded_vertices());
}

#[test]
fn weighted_grid_agrees_with_dijkstra() {
    let goal = (7i64, -4i64);
    let mut sp = TraversalShortestPaths::new(|p: &(i64, i64), _: &_| {
        grid_neighbors(p).map(|q| (q, grid_weight(*p, q, 7)))
    });
    sp.start_from([(0, 0)]);
    sp.go_to(&goal, false).unwrap();

    let mut search = BSearchShortestPath::new(
        |p: &(i64, i64), _: &_| grid_neighbors(p).map(|q| (q, grid_weight(*p, q, 7))),
        |p: &(i64, i64), _: &_| grid_neighbors(p).map(|q| (q, grid_weight(q, *p, 7))),
    );
    let meeting = search
        .start_from_with([(0, 0)], [goal], BidirectionalOptions::new().build_path(true))
        .unwrap()
        .unwrap();
    assert_eq!(meeting.length, sp.distance());
    let path = meeting.path.unwrap();
    let weight: u64 = path.windows(2).map(|p| grid_weight(p[0], p[1], 7)).sum();
    assert_eq!(weight, meeting.length);
}

#[test]
fn meeting_serializes_as_a_plain_record() {
    let mut search = BSearchBreadthFirst::new(
        |v: &u32, _: &_| if *v < 4 { vec![v + 1] } else { vec![] },
        |v: &u32, _: &_| if *v > 0 { vec![v - 1] } else { vec![] },
    );
    let meeting = search
        .start_from_with([0], [4], BidirectionalOptions::new().build_path(true))
        .unwrap()
        .unwrap();
    assert_eq!(
        serde_json::to_string(&meeting).unwrap(),
        r#"{"length":4,"path":[0,1,2,3,4]}"#
    );
    let without_path = search.start_from([0], [4]).unwrap().unwrap();
    assert_eq!(without_path, Meeting { length: 4, path: None });
}

proptest! {
    #[test]
    fn breadth_first_length_matches_reference(
        n in 2usize..40,
        degree in 1usize..4,
        seed in any::<u64>(),
    ) {
        let g = random_graph(n, degree, 1, seed);
        let r = reversed(&g);
        let expected = bfs_depths(&g, 0)[n - 1];
        let mut search = BSearchBreadthFirst::new(
            |v: &usize, _: &_| g[*v].iter().map(|&(t, _)| t).collect::<Vec<_>>(),
            |v: &usize, _: &_| r[*v].iter().map(|&(t, _)| t).collect::<Vec<_>>(),
        );
        let meeting = search
            .start_from_with(
                [0],
                [n - 1],
                BidirectionalOptions::new().build_path(true).fail_silently(true),
            )
            .unwrap();
        match (expected, meeting) {
            (Some(depth), Some(meeting)) => {
                prop_assert_eq!(meeting.length, depth);
                let path = meeting.path.unwrap();
                prop_assert_eq!(path.len(), depth + 1);
                prop_assert_eq!(path[0], 0);
                prop_assert_eq!(path[depth], n - 1);
                for pair in path.windows(2) {
                    prop_assert!(g[pair[0]].iter().any(|&(t, _)| t == pair[1]));
                }
            }
            (None, None) => {}
            (expected, meeting) => {
                prop_assert!(false, "expected {:?}, got {:?}", expected, meeting);
            }
        }

        // each side reports a prefix of its unidirectional order and stops
        // once it reports a root of the other side
        let mut forward_only = TraversalBreadthFirst::new(|v: &usize, _: &_| {
            g[*v].iter().map(|&(t, _)| t).collect::<Vec<_>>()
        });
        forward_only.start_from([0]);
        forward_only.go_to(&(n - 1), true).unwrap();
        let mut backward_only = TraversalBreadthFirst::new(|v: &usize, _: &_| {
            r[*v].iter().map(|&(t, _)| t).collect::<Vec<_>>()
        });
        backward_only.start_from([n - 1]);
        backward_only.go_to(&0, true).unwrap();
        prop_assert!(search.forward().expanded_vertices() <= forward_only.expanded_vertices());
        prop_assert!(search.backward().expanded_vertices() <= backward_only.expanded_vertices());
    }

    #[test]
    fn dijkstra_length_matches_bellman_ford(
        n in 2usize..40,
        degree in 1usize..4,
        seed in any::<u64>(),
    ) {
        let g = random_graph(n, degree, 9, seed);
        let r = reversed(&g);
        let expected = bellman_ford(&g, 0)[n - 1];
        let mut search = BSearchShortestPath::new(
            |v: &usize, _: &_| g[*v].iter().map(|&(t, w)| (t, u64::from(w))).collect::<Vec<_>>(),
            |v: &usize, _: &_| r[*v].iter().map(|&(t, w)| (t, u64::from(w))).collect::<Vec<_>>(),
        );
        let outcome = search.start_from_with(
            [0],
            [n - 1],
            BidirectionalOptions::new().build_path(true),
        );
        match (expected, outcome) {
            (Some(distance), Ok(Some(meeting))) => {
                prop_assert_eq!(meeting.length, distance);
                let path = meeting.path.unwrap();
                prop_assert_eq!(path[0], 0);
                prop_assert_eq!(path[path.len() - 1], n - 1);
                prop_assert_eq!(path_weight(&g, &path), Some(distance));
            }
            (None, Err(TraversalError::NoMeeting)) => {}
            (expected, outcome) => {
                prop_assert!(false, "expected {:?}, got {:?}", expected, outcome);
            }
        }

        let mut forward_only = TraversalShortestPaths::new(|v: &usize, _: &_| {
            g[*v].iter().map(|&(t, w)| (t, u64::from(w))).collect::<Vec<_>>()
        });
        forward_only.start_from([0]);
        forward_only.go_to(&(n - 1), true).unwrap();
        let mut backward_only = TraversalShortestPaths::new(|v: &usize, _: &_| {
            r[*v].iter().map(|&(t, w)| (t, u64::from(w))).collect::<Vec<_>>()
        });
        backward_only.start_from([n - 1]);
        backward_only.go_to(&0, true).unwrap();
        prop_assert!(search.forward().expanded_vertices() <= forward_only.expanded_vertices());
        prop_assert!(search.backward().expanded_vertices() <= backward_only.expanded_vertices());
    }
}

#![allow(dead_code)]
use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Weighted directed graph as adjacency lists.
pub type Graph = Vec<Vec<(usize, u32)>>;

/// Random directed graph on `n` vertices with about `n * degree` edges.
pub fn random_graph(n: usize, degree: usize, max_weight: u32, seed: u64) -> Graph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = vec![Vec::new(); n];
    for _ in 0..n * degree {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        let w = rng.gen_range(0..=max_weight);
        g[u].push((v, w));
    }
    g
}

/// Random undirected graph: every edge stored in both directions, same weight.
pub fn random_symmetric_graph(n: usize, degree: usize, max_weight: u32, seed: u64) -> Graph {
    let directed = random_graph(n, degree, max_weight, seed);
    let mut g = vec![Vec::new(); n];
    for (u, edges) in directed.iter().enumerate() {
        for &(v, w) in edges {
            g[u].push((v, w));
            g[v].push((u, w));
        }
    }
    g
}

/// Incoming edges of every vertex, as `(predecessor, weight)`.
pub fn reversed(g: &Graph) -> Graph {
    let mut r = vec![Vec::new(); g.len()];
    for (u, edges) in g.iter().enumerate() {
        for &(v, w) in edges {
            r[v].push((u, w));
        }
    }
    r
}

/// Reference distances from `start`.
pub fn bellman_ford(g: &Graph, start: usize) -> Vec<Option<u64>> {
    let mut dist = vec![None; g.len()];
    dist[start] = Some(0u64);
    for _ in 0..g.len() {
        let mut changed = false;
        for (u, edges) in g.iter().enumerate() {
            let Some(du) = dist[u] else { continue };
            for &(v, w) in edges {
                let candidate = du + u64::from(w);
                if dist[v].is_none_or(|dv| candidate < dv) {
                    dist[v] = Some(candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    dist
}

/// Reference edge counts from `start`.
pub fn bfs_depths(g: &Graph, start: usize) -> Vec<Option<usize>> {
    let mut depth = vec![None; g.len()];
    depth[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        let du = depth[u].unwrap_or_default();
        for &(v, _) in &g[u] {
            if depth[v].is_none() {
                depth[v] = Some(du + 1);
                queue.push_back(v);
            }
        }
    }
    depth
}

/// Weight of a minimum spanning tree of the component of `start` (Kruskal).
pub fn kruskal_weight(g: &Graph, start: usize) -> i64 {
    let reached = bfs_depths(g, start);
    let mut edges: Vec<(u32, usize, usize)> = g
        .iter()
        .enumerate()
        .filter(|(u, _)| reached[*u].is_some())
        .flat_map(|(u, es)| es.iter().map(move |&(v, w)| (w, u, v)))
        .collect();
    edges.sort_unstable();
    let mut parent: Vec<usize> = (0..g.len()).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    let mut total = 0i64;
    for (w, u, v) in edges {
        let (ru, rv) = (find(&mut parent, u), find(&mut parent, v));
        if ru != rv {
            parent[ru] = rv;
            total += i64::from(w);
        }
    }
    total
}

/// `true` if `path` follows edges of `g`; returns the summed weight
/// (cheapest parallel edge per step).
pub fn path_weight(g: &Graph, path: &[usize]) -> Option<u64> {
    path.windows(2)
        .map(|p| {
            g[p[0]]
                .iter()
                .filter(|(v, _)| *v == p[1])
                .map(|&(_, w)| u64::from(w))
                .min()
        })
        .sum()
}

/// The 5x5 maze: walls at x = 1 for y <= 2 and at x = 3 for y >= 2.
pub fn maze_neighbors(&(x, y): &(i32, i32)) -> Vec<(i32, i32)> {
    let open = |(x, y): (i32, i32)| {
        (0..5).contains(&x)
            && (0..5).contains(&y)
            && !(x == 1 && y <= 2)
            && !(x == 3 && y >= 2)
    };
    [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
        .into_iter()
        .filter(|&p| open(p))
        .collect()
}

/// Four neighbors on the unbounded integer grid.
pub fn grid_neighbors(&(x, y): &(i64, i64)) -> [(i64, i64); 4] {
    [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
}

/// Deterministic weight in `1..=9` of the undirected grid edge between `a` and `b`.
pub fn grid_weight(a: (i64, i64), b: (i64, i64), seed: u64) -> u64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut h = seed ^ 0x9e37_79b9_7f4a_7c15;
    for part in [lo.0, lo.1, hi.0, hi.1] {
        h = (h ^ part as u64).wrapping_mul(0x100_0000_01b3);
        h ^= h >> 29;
    }
    1 + h % 9
}

pub fn manhattan(a: (i64, i64), b: (i64, i64)) -> u64 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

// This code is part of Qiskit.
//
// (C) Copyright IBM 2024
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! The `Distances` and `Neighbours` capability traits the solver is
//! generic over, plus `EdgeListGraph`, a default in-memory implementation
//! of both backed by `rustworkx_core`'s `petgraph` re-export.

use std::collections::VecDeque;

use hashbrown::HashMap;
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{Error, Result, Vertex};

/// A lazy, caching oracle for pairwise shortest-path distance.
///
/// Implementations must memoise per unordered pair and must fail with
/// `DisconnectedGraph` rather than returning an arbitrary sentinel when a
/// query crosses connected components.
pub trait Distances {
    fn distance(&mut self, a: Vertex, b: Vertex) -> Result<u64>;

    /// Seeds the cache with every pairwise distance along `path`, whose
    /// sub-paths are themselves shortest paths by optimal substructure.
    /// For paths of length >= 11 only the two 5-vertex prefix/suffix plus
    /// the 5-vertex middle are cached, to avoid the O(n^2) blow-up of
    /// caching every sub-pair of a long path.
    fn register_shortest_path(&mut self, path: &[Vertex]);

    /// Caches `dist(u, v) = 1` directly, for an edge the caller already
    /// knows about independent of any path it was found on.
    fn register_edge(&mut self, u: Vertex, v: Vertex);
}

/// A lazy, caching oracle for adjacency.
pub trait Neighbours {
    /// Returns `v`'s neighbours, sorted ascending.
    fn neighbours(&mut self, v: Vertex) -> &[Vertex];
}

const LONG_PATH_THRESHOLD: usize = 11;
const LONG_PATH_WINDOW: usize = 5;

/// An in-memory undirected graph, and the default implementation of both
/// `Distances` and `Neighbours` over it.
///
/// Built on `rustworkx_core::petgraph`'s `UnGraph`, the same graph
/// representation the routing passes this crate was grounded on use for
/// their coupling maps.
pub struct EdgeListGraph {
    graph: UnGraph<Vertex, ()>,
    index_of: HashMap<Vertex, NodeIndex>,
    distance_cache: HashMap<(Vertex, Vertex), u64>,
    neighbour_cache: HashMap<Vertex, Vec<Vertex>>,
}

fn edge_key(a: Vertex, b: Vertex) -> (Vertex, Vertex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn bfs_distance(
    graph: &UnGraph<Vertex, ()>,
    index_of: &HashMap<Vertex, NodeIndex>,
    a: Vertex,
    b: Vertex,
) -> Option<u64> {
    if a == b {
        return Some(0);
    }
    let start = *index_of.get(&a)?;
    let goal = *index_of.get(&b)?;
    let mut visited: HashMap<NodeIndex, u64> = HashMap::new();
    visited.insert(start, 0);
    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        let d = visited[&node];
        if node == goal {
            return Some(d);
        }
        for neighbour in graph.neighbors(node) {
            if !visited.contains_key(&neighbour) {
                visited.insert(neighbour, d + 1);
                queue.push_back(neighbour);
            }
        }
    }
    None
}

impl EdgeListGraph {
    pub fn from_edges(edges: impl IntoIterator<Item = (Vertex, Vertex)>) -> Result<Self> {
        let mut graph = UnGraph::default();
        let mut index_of: HashMap<Vertex, NodeIndex> = HashMap::new();
        for (a, b) in edges {
            if a == b {
                return Err(Error::InvalidSwap(a));
            }
            let ia = *index_of.entry(a).or_insert_with(|| graph.add_node(a));
            let ib = *index_of.entry(b).or_insert_with(|| graph.add_node(b));
            if !graph.contains_edge(ia, ib) {
                graph.add_edge(ia, ib, ());
            }
        }
        Ok(EdgeListGraph {
            graph,
            index_of,
            distance_cache: HashMap::new(),
            neighbour_cache: HashMap::new(),
        })
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.graph.node_weights().copied()
    }

    /// A view onto this graph that implements `Distances` only.
    pub fn distances(&mut self) -> GraphDistances<'_> {
        GraphDistances {
            graph: &self.graph,
            index_of: &self.index_of,
            cache: &mut self.distance_cache,
        }
    }

    /// A view onto this graph that implements `Neighbours` only.
    pub fn neighbours_view(&mut self) -> GraphNeighbours<'_> {
        GraphNeighbours {
            graph: &self.graph,
            index_of: &self.index_of,
            cache: &mut self.neighbour_cache,
        }
    }

    /// Splits this graph into independent `Distances` and `Neighbours`
    /// views, borrowed simultaneously: each view only ever touches its own
    /// cache field plus the shared, read-only graph, so the borrow checker
    /// accepts both live at once. Needed by callers (like `BestFullTsa`)
    /// that thread both oracles through the same solve.
    pub fn split_mut(&mut self) -> (GraphDistances<'_>, GraphNeighbours<'_>) {
        (
            GraphDistances {
                graph: &self.graph,
                index_of: &self.index_of,
                cache: &mut self.distance_cache,
            },
            GraphNeighbours {
                graph: &self.graph,
                index_of: &self.index_of,
                cache: &mut self.neighbour_cache,
            },
        )
    }
}

pub struct GraphDistances<'a> {
    graph: &'a UnGraph<Vertex, ()>,
    index_of: &'a HashMap<Vertex, NodeIndex>,
    cache: &'a mut HashMap<(Vertex, Vertex), u64>,
}

impl Distances for GraphDistances<'_> {
    fn distance(&mut self, a: Vertex, b: Vertex) -> Result<u64> {
        let key = edge_key(a, b);
        if let Some(&d) = self.cache.get(&key) {
            return Ok(d);
        }
        let d = bfs_distance(self.graph, self.index_of, a, b).ok_or(Error::DisconnectedGraph(a, b))?;
        self.cache.insert(key, d);
        Ok(d)
    }

    fn register_shortest_path(&mut self, path: &[Vertex]) {
        let cache_window = |cache: &mut HashMap<(Vertex, Vertex), u64>, window: &[Vertex], base: usize| {
            for i in 0..window.len() {
                for j in (i + 1)..window.len() {
                    let d = (j - i) as u64;
                    cache.insert(edge_key(path[base + i], path[base + j]), d);
                }
            }
        };
        if path.len() < LONG_PATH_THRESHOLD {
            cache_window(self.cache, path, 0);
            return;
        }
        let n = path.len();
        let mid_start = (n - LONG_PATH_WINDOW) / 2;
        cache_window(self.cache, &path[0..LONG_PATH_WINDOW], 0);
        cache_window(self.cache, &path[n - LONG_PATH_WINDOW..n], n - LONG_PATH_WINDOW);
        cache_window(self.cache, &path[mid_start..mid_start + LONG_PATH_WINDOW], mid_start);
    }

    fn register_edge(&mut self, u: Vertex, v: Vertex) {
        self.cache.insert(edge_key(u, v), 1);
    }
}

pub struct GraphNeighbours<'a> {
    graph: &'a UnGraph<Vertex, ()>,
    index_of: &'a HashMap<Vertex, NodeIndex>,
    cache: &'a mut HashMap<Vertex, Vec<Vertex>>,
}

impl Neighbours for GraphNeighbours<'_> {
    fn neighbours(&mut self, v: Vertex) -> &[Vertex] {
        let graph = self.graph;
        let index_of = self.index_of;
        self.cache.entry(v).or_insert_with(|| {
            let mut out: Vec<Vertex> = match index_of.get(&v) {
                Some(&idx) => graph.neighbors(idx).map(|n| graph[n]).collect(),
                None => Vec::new(),
            };
            out.sort_unstable();
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_on_a_path() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut d = graph.distances();
        assert_eq!(d.distance(0, 3).unwrap(), 3);
        assert_eq!(d.distance(1, 1).unwrap(), 0);
    }

    #[test]
    fn disconnected_query_fails() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (2, 3)]).unwrap();
        let mut d = graph.distances();
        assert!(matches!(d.distance(0, 3), Err(Error::DisconnectedGraph(0, 3))));
    }

    #[test]
    fn neighbours_are_sorted() {
        let mut graph = EdgeListGraph::from_edges([(1, 0), (1, 2), (1, 5)]).unwrap();
        let mut n = graph.neighbours_view();
        assert_eq!(n.neighbours(1), &[0, 2, 5]);
    }

    #[test]
    fn register_shortest_path_primes_the_cache() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        let mut d = graph.distances();
        d.register_shortest_path(&[0, 1, 2, 3, 4]);
        assert_eq!(d.distance(0, 4).unwrap(), 4);
        assert_eq!(d.distance(1, 3).unwrap(), 2);
    }

    #[test]
    fn split_mut_gives_independent_views() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2)]).unwrap();
        let (mut dist, mut nbrs) = graph.split_mut();
        assert_eq!(dist.distance(0, 2).unwrap(), 2);
        assert_eq!(nbrs.neighbours(1), &[0, 2]);
    }
}

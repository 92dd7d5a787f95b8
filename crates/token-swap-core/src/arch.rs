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

//! A caller-facing convenience layer on top of [`crate::BestFullTsa`] for
//! callers who think in terms of a logical/physical split rather than the
//! solver's own current-vertex/target-vertex `VertexMapping`, the same
//! split the teacher's own layout passes make with their `logic_to_phys`
//! and `phys_to_logic` arrays (see `sabre_layout`/`stochastic_swap`),
//! generalised here from `usize` physical qubits to an arbitrary node type.

use std::collections::HashMap;
use std::hash::Hash;

use crate::best_full_tsa::BestFullTsa;
use crate::error::{Error, Result, Vertex};
use crate::graph::EdgeListGraph;
use crate::mapping::VertexMapping;

/// The physical coupling graph a caller routes against, in their own node
/// identifier space.
///
/// `nodes()` establishes the physical vertex numbering this module derives
/// internally; callers only need it to be consistent across the two calls
/// `route` makes (`nodes()` then `edges()`), not stable across calls to
/// `route` itself.
pub trait ArchGraph {
    type Node: Eq + Hash + Clone;

    fn nodes(&self) -> Vec<Self::Node>;
    fn edges(&self) -> Vec<(Self::Node, Self::Node)>;
}

fn vertex_of<N: Eq + Hash + Clone>(index: &HashMap<N, Vertex>, node: &N) -> Result<Vertex> {
    index.get(node).copied().ok_or_else(|| {
        Error::internal("arch::route: a node referenced by the logical mapping is not in the graph's node set")
    })
}

/// Routes `initial` (each logical node's current physical node) to
/// `desired` (each logical node's target physical node), returning an
/// ordered sequence of physical-node swaps realising that movement.
///
/// Fails with [`Error::UnmatchedLogicalQubit`] if `initial` and `desired`
/// don't name the same set of logical nodes.
pub fn route<N: Eq + Hash + Clone>(
    graph: &impl ArchGraph<Node = N>,
    initial: &HashMap<N, N>,
    desired: &HashMap<N, N>,
) -> Result<Vec<(N, N)>> {
    if initial.len() != desired.len() || initial.keys().any(|k| !desired.contains_key(k)) {
        return Err(Error::UnmatchedLogicalQubit);
    }

    let nodes = graph.nodes();
    let mut index: HashMap<N, Vertex> = HashMap::with_capacity(nodes.len());
    let mut node_of: Vec<N> = Vec::with_capacity(nodes.len());
    for node in nodes {
        index.insert(node.clone(), node_of.len() as Vertex);
        node_of.push(node);
    }

    let mut edge_graph = EdgeListGraph::from_edges(
        graph
            .edges()
            .into_iter()
            .map(|(a, b)| Ok((vertex_of(&index, &a)?, vertex_of(&index, &b)?)))
            .collect::<Result<Vec<_>>>()?,
    )?;

    let mut mapping = VertexMapping::new();
    for logical in initial.keys() {
        let from = vertex_of(&index, &initial[logical])?;
        let to = vertex_of(&index, &desired[logical])?;
        mapping.insert(from, to)?;
    }

    let (mut distances, mut neighbours) = edge_graph.split_mut();
    let mut solver = BestFullTsa::new(0);
    let swaps = solver.solve(&mapping, &mut distances, &mut neighbours)?;

    Ok(swaps
        .into_iter()
        .map(|(a, b)| (node_of[a as usize].clone(), node_of[b as usize].clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ring(Vec<char>);

    impl ArchGraph for Ring {
        type Node = char;

        fn nodes(&self) -> Vec<char> {
            self.0.clone()
        }

        fn edges(&self) -> Vec<(char, char)> {
            (0..self.0.len())
                .map(|i| (self.0[i], self.0[(i + 1) % self.0.len()]))
                .collect()
        }
    }

    #[test]
    fn routes_a_transposition_on_named_nodes() {
        let graph = Ring(vec!['a', 'b', 'c']);
        let initial: HashMap<char, char> = [('x', 'a'), ('y', 'c')].into_iter().collect();
        let desired: HashMap<char, char> = [('x', 'c'), ('y', 'a')].into_iter().collect();
        let swaps = route(&graph, &initial, &desired).unwrap();
        assert!(!swaps.is_empty());
        for &(u, v) in &swaps {
            assert!(graph.edges().contains(&(u, v)) || graph.edges().contains(&(v, u)));
        }
    }

    #[test]
    fn mismatched_logical_node_sets_are_rejected() {
        let graph = Ring(vec!['a', 'b', 'c']);
        let initial: HashMap<char, char> = [('x', 'a')].into_iter().collect();
        let desired: HashMap<char, char> = [('y', 'a')].into_iter().collect();
        assert!(matches!(route(&graph, &initial, &desired), Err(Error::UnmatchedLogicalQubit)));
    }

    #[test]
    fn identity_routing_needs_no_swaps() {
        let graph = Ring(vec!['a', 'b', 'c']);
        let initial: HashMap<char, char> = [('x', 'a'), ('y', 'b')].into_iter().collect();
        let desired = initial.clone();
        let swaps = route(&graph, &initial, &desired).unwrap();
        assert!(swaps.is_empty());
    }
}

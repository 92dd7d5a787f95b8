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

//! `BestFullTsa`: the end-to-end solver. Runs `HybridTsa` to a complete,
//! correct (but possibly long) swap sequence, then a fixed postprocessing
//! pipeline — algebraic passes, then the table optimiser — that can only
//! ever shorten it.

use hashbrown::HashSet;
use log::debug;

use crate::cycles::candidates;
use crate::cycles::growth;
use crate::cycles::CyclesPartialTsa;
use crate::error::{Result, Vertex};
use crate::graph::{Distances, Neighbours};
use crate::hybrid_tsa;
use crate::lookup::{PartialMappingLookup, PartialMappingParameters, VertexMapResizing};
use crate::mapping::VertexMapping;
use crate::optimiser;
use crate::path_finder::RiverFlow;
use crate::swap_list::SwapList;
use crate::table_optimiser;

/// Tuning knobs for every stage of `BestFullTsa::solve`, each defaulting to
/// the literal values the component design gives.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub growth: growth::Options,
    pub candidates: candidates::Options,
    pub partial_mapping: PartialMappingParameters,
}

/// The end-to-end token-swapping solver.
///
/// Owns every piece of state a solve reuses across calls against the same
/// graph (the growth/candidate arenas inside `CyclesPartialTsa`, and
/// `RiverFlow`'s edge-usage counters and RNG). Nothing here is shared
/// between instances; two `BestFullTsa`s never observe each other's state.
pub struct BestFullTsa {
    options: Options,
    path_finder: RiverFlow,
    cycles_tsa: CyclesPartialTsa,
}

impl BestFullTsa {
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, Options::default())
    }

    pub fn with_options(seed: u64, options: Options) -> Self {
        BestFullTsa {
            path_finder: RiverFlow::new(seed),
            cycles_tsa: CyclesPartialTsa::new(options.growth, options.candidates),
            options,
        }
    }

    /// Solves `mapping` against the graph exposed through `distances` and
    /// `neighbours`, returning an ordered sequence of edges `(u, v)` with
    /// `u < v` whose cumulative application realises `mapping`.
    ///
    /// `mapping` itself is left untouched: `HybridTsa` mutates a private
    /// clone, consistent with the reference design's note that the full
    /// TSA has no further use for the caller's copy.
    pub fn solve(
        &mut self,
        mapping: &VertexMapping,
        distances: &mut impl Distances,
        neighbours: &mut impl Neighbours,
    ) -> Result<Vec<(Vertex, Vertex)>> {
        mapping.check()?;
        // Reseed the RNG deterministically at the top of every solve, so
        // repeated solves against the same graph are byte-for-byte
        // reproducible regardless of what earlier solves did.
        self.path_finder.reset();

        let mut working = mapping.clone();
        let mut swap_list = SwapList::new();
        hybrid_tsa::solve(
            &mut working,
            distances,
            neighbours,
            &mut self.path_finder,
            &mut swap_list,
            &mut self.cycles_tsa,
        )?;
        debug!("best_full_tsa: hybrid_tsa emitted {} swaps", swap_list.len());

        optimiser::zero_travel_pass(&mut swap_list);
        optimiser::token_tracking_pass(&mut swap_list);
        let mut replay = mapping.clone();
        optimiser::remove_empty_swaps(&mut swap_list, &mut replay);
        optimiser::full_optimise(&mut swap_list, &mut replay);
        debug!("best_full_tsa: after algebraic passes, {} swaps", swap_list.len());

        let tokens: HashSet<Vertex> = mapping.keys().collect();
        let mut resizer = VertexMapResizing::new();
        let lookup = PartialMappingLookup::new(self.options.partial_mapping);
        table_optimiser::optimise(&tokens, &mut resizer, &mut swap_list, neighbours, &lookup)?;
        debug!("best_full_tsa: after table optimiser, {} swaps", swap_list.len());

        Ok(swap_list.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListGraph;

    fn apply_to_identity(swaps: &[(Vertex, Vertex)], keys: impl IntoIterator<Item = Vertex>) -> VertexMapping {
        let mut mapping = VertexMapping::from_pairs(keys.into_iter().map(|v| (v, v))).unwrap();
        for &(a, b) in swaps {
            mapping.apply_swap(a, b);
        }
        mapping
    }

    #[test]
    fn solves_scenario_s1_transposition_on_a_path() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mapping = VertexMapping::from_pairs([(0, 2), (2, 0)]).unwrap();
        let mut solver = BestFullTsa::new(0);
        let swaps = solver.solve(&mapping, &mut d, &mut n).unwrap();
        assert_eq!(swaps.len(), 3);
        let result = apply_to_identity(&swaps, mapping.keys());
        assert_eq!(result.get(0), Some(2));
        assert_eq!(result.get(2), Some(0));
    }

    #[test]
    fn solves_scenario_s2_three_cycle_on_a_triangle() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (0, 2)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut solver = BestFullTsa::new(0);
        let swaps = solver.solve(&mapping, &mut d, &mut n).unwrap();
        assert_eq!(swaps.len(), 2);
        for &(u, v) in &swaps {
            assert!(u < v);
        }
    }

    #[test]
    fn solves_scenario_s3_identity_with_no_swaps() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mapping = VertexMapping::from_pairs([(0, 0), (1, 1), (2, 2)]).unwrap();
        let mut solver = BestFullTsa::new(0);
        let swaps = solver.solve(&mapping, &mut d, &mut n).unwrap();
        assert!(swaps.is_empty());
    }

    #[test]
    fn every_emitted_swap_is_a_real_edge_and_no_swap_is_empty() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
        let mut graph = EdgeListGraph::from_edges(edges).unwrap();
        let edge_set: HashSet<(Vertex, Vertex)> = edges
            .iter()
            .map(|&(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        let (mut d, mut n) = graph.split_mut();
        let mapping = VertexMapping::from_pairs([(0, 2), (1, 4), (2, 0), (3, 1), (4, 3)]).unwrap();
        let mut solver = BestFullTsa::new(7);
        let swaps = solver.solve(&mapping, &mut d, &mut n).unwrap();

        for &(u, v) in &swaps {
            assert!(u < v, "swaps must be canonicalised with u < v");
            assert!(edge_set.contains(&(u, v)), "swap ({u}, {v}) is not a graph edge");
        }

        let mut result = mapping.clone();
        for &(u, v) in &swaps {
            result.apply_swap(u, v);
        }
        assert!(result.all_tokens_home());
    }

    #[test]
    fn is_deterministic_across_repeated_solves() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let mapping = VertexMapping::from_pairs([(0, 3), (1, 4), (2, 0), (3, 1), (4, 2)]).unwrap();
        let mut solver = BestFullTsa::new(42);

        let (mut d1, mut n1) = graph.split_mut();
        let first = solver.solve(&mapping, &mut d1, &mut n1).unwrap();
        let (mut d2, mut n2) = graph.split_mut();
        let second = solver.solve(&mapping, &mut d2, &mut n2).unwrap();
        assert_eq!(first, second);
    }
}

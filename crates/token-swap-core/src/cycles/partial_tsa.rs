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

//! `CyclesPartialTsa`: repeatedly grows and closes candidate cycles until
//! none more can be found, appending the swaps each round contributes.

use crate::cycles::candidates::{self, CyclesCandidateManager};
use crate::cycles::growth::{self, CyclesGrowthManager};
use crate::error::Result;
use crate::graph::{Distances, Neighbours};
use crate::mapping::VertexMapping;
use crate::path_finder::RiverFlow;
use crate::swap_list::SwapList;

pub struct CyclesPartialTsa {
    growth: CyclesGrowthManager,
    candidates: CyclesCandidateManager,
}

impl CyclesPartialTsa {
    pub fn new(growth_options: growth::Options, candidate_options: candidates::Options) -> Self {
        CyclesPartialTsa {
            growth: CyclesGrowthManager::new(growth_options),
            candidates: CyclesCandidateManager::new(candidate_options),
        }
    }

    /// Runs rounds of grow-then-close until a round contributes no new
    /// swaps, registering every emitted swap's edge with `path_finder` so
    /// later path searches are biased to reuse it.
    pub fn append_partial_solution(
        &mut self,
        mapping: &mut VertexMapping,
        distances: &mut impl Distances,
        neighbours: &mut impl Neighbours,
        path_finder: &mut RiverFlow,
        swap_list: &mut SwapList,
    ) -> Result<()> {
        loop {
            let before = swap_list.len();
            self.single_iteration_partial_solution(mapping, distances, neighbours, swap_list)?;
            if swap_list.len() == before {
                return Ok(());
            }
            // Register the edges this round added so the path finder biases
            // towards reusing them on subsequent lookups.
            let mut handle = match swap_list.front_id() {
                Some(h) => h,
                None => return Ok(()),
            };
            // Skip to the first newly added swap: `before` swaps already had
            // their edges registered in earlier rounds.
            for _ in 0..before {
                handle = match swap_list.next(handle) {
                    Some(h) => h,
                    None => return Ok(()),
                };
            }
            loop {
                let swap = swap_list.get(handle);
                let (a, b) = swap.endpoints();
                path_finder.register_edge(a, b);
                match swap_list.next(handle) {
                    Some(h) => handle = h,
                    None => break,
                }
            }
        }
    }

    fn single_iteration_partial_solution(
        &mut self,
        mapping: &mut VertexMapping,
        distances: &mut impl Distances,
        neighbours: &mut impl Neighbours,
        swap_list: &mut SwapList,
    ) -> Result<()> {
        if !self.growth.reset(mapping, distances, neighbours)? {
            return Ok(());
        }
        for _ in 0..self.growth.max_cycle_size() {
            if self.growth.attempt_to_close_cycles(mapping, distances)? {
                let cycles = self.growth.cycles_mut().drain(..).collect();
                return self.candidates.append_partial_solution(cycles, mapping, swap_list);
            }
            let result = self.growth.attempt_to_grow(mapping, distances, neighbours)?;
            if result.empty || result.hit_cycle_length_limit {
                return Ok(());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListGraph;

    #[test]
    fn solves_a_triangle_three_cycle() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 0)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut path_finder = RiverFlow::new(0);
        let mut swap_list = SwapList::new();
        let mut tsa = CyclesPartialTsa::new(growth::Options::default(), candidates::Options::default());
        tsa.append_partial_solution(&mut mapping, &mut d, &mut n, &mut path_finder, &mut swap_list)
            .unwrap();
        assert!(mapping.all_tokens_home());
    }

    #[test]
    fn leaves_a_trivially_solved_mapping_untouched() {
        let mut graph = EdgeListGraph::from_edges([(0, 1)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mut mapping = VertexMapping::new();
        let mut path_finder = RiverFlow::new(0);
        let mut swap_list = SwapList::new();
        let mut tsa = CyclesPartialTsa::new(growth::Options::default(), candidates::Options::default());
        tsa.append_partial_solution(&mut mapping, &mut d, &mut n, &mut path_finder, &mut swap_list)
            .unwrap();
        assert!(swap_list.is_empty());
    }
}

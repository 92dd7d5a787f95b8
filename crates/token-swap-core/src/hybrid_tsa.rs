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

//! `HybridTsa`: alternates the cycles engine with `TrivialTsa`'s
//! guaranteed-progress mode, so every outer iteration strictly reduces `L`
//! even on inputs the cycles engine alone can't make headway on.

use log::debug;

use crate::cycles::CyclesPartialTsa;
use crate::error::{Error, Result};
use crate::graph::{Distances, Neighbours};
use crate::mapping::{progress_l, VertexMapping};
use crate::path_finder::RiverFlow;
use crate::swap_list::SwapList;
use crate::trivial_tsa;

/// Drives `mapping` to the identity, appending every swap used to
/// `swap_list`. Bounded to `initial_L + 1` outer iterations: each iteration
/// that adds no swap means both engines are stuck, which can only happen
/// once every token is already home.
pub fn solve(
    mapping: &mut VertexMapping,
    distances: &mut impl Distances,
    neighbours: &mut impl Neighbours,
    path_finder: &mut RiverFlow,
    swap_list: &mut SwapList,
    cycles_tsa: &mut CyclesPartialTsa,
) -> Result<()> {
    let initial_l = progress_l(mapping, distances)?;
    for iteration in 0..=initial_l {
        let before = swap_list.len();
        cycles_tsa.append_partial_solution(mapping, distances, neighbours, path_finder, swap_list)?;
        trivial_tsa::break_after_progress(mapping, distances, neighbours, path_finder, swap_list)?;
        debug!(
            "hybrid_tsa: iteration {iteration}, L = {}",
            progress_l(mapping, distances)?
        );
        if swap_list.len() == before {
            break;
        }
    }
    if !mapping.all_tokens_home() {
        return Err(Error::internal(
            "hybrid_tsa exhausted its iteration budget without homing every token",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::{candidates, growth};
    use crate::graph::EdgeListGraph;

    #[test]
    fn solves_a_line_graph_rotation() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mut mapping = VertexMapping::from_pairs([(0, 4), (4, 0)]).unwrap();
        let mut path_finder = RiverFlow::new(0);
        let mut swap_list = SwapList::new();
        let mut cycles_tsa = CyclesPartialTsa::new(growth::Options::default(), candidates::Options::default());
        solve(&mut mapping, &mut d, &mut n, &mut path_finder, &mut swap_list, &mut cycles_tsa).unwrap();
        assert!(mapping.all_tokens_home());
    }

    #[test]
    fn solves_a_five_cycle_on_a_ring() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let mut path_finder = RiverFlow::new(3);
        let mut swap_list = SwapList::new();
        let mut cycles_tsa = CyclesPartialTsa::new(growth::Options::default(), candidates::Options::default());
        solve(&mut mapping, &mut d, &mut n, &mut path_finder, &mut swap_list, &mut cycles_tsa).unwrap();
        assert!(mapping.all_tokens_home());
    }
}

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

//! `TrivialTsa`: decomposes the current mapping into disjoint abstract
//! cycles and resolves them via interchange paths, guaranteed to make
//! progress even where the cycles engine finds nothing.

use hashbrown::{HashMap, HashSet};

use crate::cycles::growth::get_swap_decrease;
use crate::error::{Result, Vertex};
use crate::graph::{Distances, Neighbours};
use crate::mapping::VertexMapping;
use crate::path_finder::RiverFlow;
use crate::swap_list::{Swap, SwapList};

/// Decomposes `mapping` into disjoint chains of vertices that each need to
/// rotate into place. Each chain either closes back on itself (a genuine
/// cycle of the permutation) or ends at a vertex holding no token (an open
/// chain, extended backward from its start to pick up every vertex that
/// feeds into it).
pub fn decompose_into_cycles(mapping: &VertexMapping) -> Vec<Vec<Vertex>> {
    let reverse: HashMap<Vertex, Vertex> = mapping.iter().map(|(v, t)| (t, v)).collect();
    let mut seen: HashSet<Vertex> = HashSet::new();
    let mut cycles = Vec::new();

    for v in mapping.keys() {
        if seen.contains(&v) {
            continue;
        }
        if mapping.get(v) == Some(v) {
            seen.insert(v);
            continue;
        }
        let mut chain = vec![v];
        seen.insert(v);
        let mut current = v;
        let mut closed = false;
        loop {
            let next = mapping.get(current).expect("every vertex in the chain has a target");
            if next == v {
                closed = true;
                break;
            }
            chain.push(next);
            seen.insert(next);
            if mapping.contains_key(next) {
                current = next;
            } else {
                break;
            }
        }
        if !closed {
            let mut front = chain[0];
            while let Some(&p) = reverse.get(&front) {
                if seen.contains(&p) {
                    break;
                }
                chain.insert(0, p);
                seen.insert(p);
                front = p;
            }
        }
        cycles.push(chain);
    }
    cycles
}

/// Estimates the cheapest way to realise the cyclic rotation `vertices`
/// implies: cuts the single longest inter-vertex edge (the rest is paid for
/// regardless of rotation start, so excluding the most expensive one is
/// optimal) and reports where the rotation should start plus how many
/// concrete swaps the walk is expected to cost.
pub fn cyclic_shift_cost_estimate(vertices: &[Vertex], distances: &mut impl Distances) -> Result<(usize, i64)> {
    let n = vertices.len();
    let mut edge_dists = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        edge_dists.push(distances.distance(vertices[i], vertices[j])? as i64);
    }
    let total: i64 = edge_dists.iter().sum();
    let (max_index, &max_val) = edge_dists
        .iter()
        .enumerate()
        .max_by_key(|&(_, &d)| d)
        .expect("vertices is non-empty");
    let total_distance = total - max_val;
    let start_v_index = (max_index + 1) % n;
    let estimated_concrete_swaps = 2 * total_distance - (n as i64 - 1);
    Ok((start_v_index, estimated_concrete_swaps))
}

fn apply_and_push(a: Vertex, b: Vertex, mapping: &mut VertexMapping, swap_list: &mut SwapList) -> Result<()> {
    if mapping.apply_swap(a, b) > 0 {
        swap_list.push_back(Swap::new(a, b)?);
    }
    Ok(())
}

/// Walks `path` backward then forward so that only its two endpoints end up
/// swapped, every intermediate vertex restored to where it started.
pub fn append_swaps_to_interchange_path_ends(
    path: &[Vertex],
    mapping: &mut VertexMapping,
    swap_list: &mut SwapList,
) -> Result<()> {
    let n = path.len();
    if n < 2 {
        return Ok(());
    }
    for i in (0..n - 1).rev() {
        apply_and_push(path[i], path[i + 1], mapping, swap_list)?;
    }
    if n >= 3 {
        for i in 1..n - 1 {
            apply_and_push(path[i], path[i + 1], mapping, swap_list)?;
        }
    }
    Ok(())
}

/// Resolves every cycle in full: for each, walks its abstract swaps from
/// the last vertex down to the second, realising each as an
/// interchange-path-ends walk.
pub fn full_tsa(
    mapping: &mut VertexMapping,
    distances: &mut impl Distances,
    neighbours: &mut impl Neighbours,
    path_finder: &mut RiverFlow,
    swap_list: &mut SwapList,
) -> Result<()> {
    let cycles = decompose_into_cycles(mapping);
    for cycle in cycles {
        if cycle.len() < 2 {
            continue;
        }
        for ii in (1..cycle.len()).rev() {
            let path = path_finder.find(cycle[ii], cycle[ii - 1], distances, neighbours)?;
            append_swaps_to_interchange_path_ends(&path, mapping, swap_list)?;
        }
    }
    Ok(())
}

/// Resolves only as much of the cheapest available cycle as it takes for
/// `L` to start strictly decreasing, then stops (possibly mid interchange
/// path). Used inside `HybridTsa`, where a cycles-engine pass always
/// follows and can pick up wherever this one left off.
pub fn break_after_progress(
    mapping: &mut VertexMapping,
    distances: &mut impl Distances,
    neighbours: &mut impl Neighbours,
    path_finder: &mut RiverFlow,
    swap_list: &mut SwapList,
) -> Result<()> {
    let cycles = decompose_into_cycles(mapping);
    let mut best: Option<(usize, usize, i64)> = None;
    for (ci, cycle) in cycles.iter().enumerate() {
        if cycle.len() < 2 {
            continue;
        }
        let (start_index, estimate) = cyclic_shift_cost_estimate(cycle, distances)?;
        if best.map_or(true, |(_, _, e)| estimate < e) {
            best = Some((ci, start_index, estimate));
        }
    }
    let Some((ci, start_index, _)) = best else {
        return Ok(());
    };
    let cycle = &cycles[ci];
    let n = cycle.len();
    let rotated: Vec<Vertex> = (0..n).map(|i| cycle[(start_index + i) % n]).collect();

    let mut current_l_decrease: i64 = 0;
    for ii in (1..n).rev() {
        let path = path_finder.find(rotated[ii], rotated[ii - 1], distances, neighbours)?;
        let m = path.len();
        if m < 2 {
            continue;
        }
        for i in 0..m - 1 {
            let (a, b) = (path[i], path[i + 1]);
            current_l_decrease += get_swap_decrease(mapping, a, b, distances)?;
            apply_and_push(a, b, mapping, swap_list)?;
            if current_l_decrease > 0 {
                return Ok(());
            }
        }
        if m >= 3 {
            for i in (0..=m - 3).rev() {
                let (a, b) = (path[i], path[i + 1]);
                current_l_decrease += get_swap_decrease(mapping, a, b, distances)?;
                apply_and_push(a, b, mapping, swap_list)?;
                if current_l_decrease > 0 {
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListGraph;

    #[test]
    fn decompose_finds_a_closed_three_cycle() {
        let mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let cycles = decompose_into_cycles(&mapping);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
    }

    #[test]
    fn decompose_extends_an_open_chain_backward() {
        // 0 -> 1 -> 2, with 2 untokened: an open chain ending at 2.
        let mapping = VertexMapping::from_pairs([(0, 1), (1, 2)]).unwrap();
        let cycles = decompose_into_cycles(&mapping);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec![0, 1, 2]);
    }

    #[test]
    fn full_tsa_solves_a_triangle() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 0)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut path_finder = RiverFlow::new(0);
        let mut swap_list = SwapList::new();
        full_tsa(&mut mapping, &mut d, &mut n, &mut path_finder, &mut swap_list).unwrap();
        assert!(mapping.all_tokens_home());
    }

    #[test]
    fn interchange_path_ends_only_swaps_the_endpoints() {
        let mut mapping = VertexMapping::from_pairs([(0, 99), (3, 7)]).unwrap();
        let mut swap_list = SwapList::new();
        append_swaps_to_interchange_path_ends(&[0, 1, 2, 3], &mut mapping, &mut swap_list).unwrap();
        assert_eq!(mapping.get(3), Some(99));
        assert_eq!(mapping.get(0), Some(7));
        assert!(!mapping.contains_key(1));
        assert!(!mapping.contains_key(2));
    }

    #[test]
    fn break_after_progress_makes_some_progress_on_a_triangle() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 0)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let before = crate::mapping::progress_l(&mapping, &mut d).unwrap();
        let mut path_finder = RiverFlow::new(0);
        let mut swap_list = SwapList::new();
        break_after_progress(&mut mapping, &mut d, &mut n, &mut path_finder, &mut swap_list).unwrap();
        let after = crate::mapping::progress_l(&mapping, &mut d).unwrap();
        assert!(after < before);
        assert!(!swap_list.is_empty());
    }
}

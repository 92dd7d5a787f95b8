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

//! `CyclesCandidateManager`: turns a population of closed `Cycle`s into a
//! disjoint subset, and realises that subset as concrete swaps.

use hashbrown::HashSet;

use crate::cycles::growth::Cycle;
use crate::error::{Result, Vertex};
use crate::mapping::VertexMapping;
use crate::swap_list::{Swap, SwapList};

#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub return_all_good_single_swaps: bool,
    pub return_lower_power_solutions_for_multiswap_candidates: bool,
    pub min_candidate_power_percentage: i64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            return_all_good_single_swaps: false,
            return_lower_power_solutions_for_multiswap_candidates: false,
            min_candidate_power_percentage: 0,
        }
    }
}

/// A rotation-invariant key for a cycle: the cycle's vertices, rotated to
/// start at the smallest one, alongside its decrease. Two `Cycle`s with the
/// same closed rotation (up to starting point) compare equal under this key.
fn rotation_key(cycle: &Cycle) -> (i64, Vec<Vertex>) {
    let n = cycle.vertices.len();
    let start = cycle
        .vertices
        .iter()
        .enumerate()
        .min_by_key(|&(_, &v)| v)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let rotated: Vec<Vertex> = (0..n).map(|i| cycle.vertices[(start + i) % n]).collect();
    (cycle.decrease, rotated)
}

/// Drops cycles whose decrease is too small relative to their length, and
/// any exact rotation-duplicate of a cycle already kept.
fn fill_initial_cycle_ids(cycles: Vec<Cycle>, options: &Options) -> Vec<Cycle> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for cycle in cycles {
        let len = cycle.vertices.len() as i64;
        if 50 * cycle.decrease < options.min_candidate_power_percentage * len {
            continue;
        }
        if seen.insert(rotation_key(&cycle)) {
            out.push(cycle);
        }
    }
    out
}

/// Keeps only the maximum-decrease cycles, unless the options widen that:
/// `return_all_good_single_swaps` keeps every positive-decrease 2-cycle,
/// `return_lower_power_solutions_for_multiswap_candidates` keeps every
/// positive-decrease longer cycle.
fn discard_lower_power_solutions(cycles: Vec<Cycle>, options: &Options) -> Vec<Cycle> {
    let Some(max_decrease) = cycles.iter().map(|c| c.decrease).max() else {
        return cycles;
    };
    cycles
        .into_iter()
        .filter(|c| {
            if c.decrease == max_decrease {
                return true;
            }
            if c.decrease <= 0 {
                return false;
            }
            (c.vertices.len() == 2 && options.return_all_good_single_swaps)
                || (c.vertices.len() > 2 && options.return_lower_power_solutions_for_multiswap_candidates)
        })
        .collect()
}

/// Orders candidates so the greedy disjoint-subset pass in
/// `append_partial_solution` favours cycles that overlap the fewest others,
/// ties broken by the cycle's original position.
fn sort_candidates(cycles: Vec<Cycle>) -> Vec<Cycle> {
    let n = cycles.len();
    let mut touch_count = vec![0usize; n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if cycles[i].vertices.iter().any(|v| cycles[j].contains(*v)) {
                touch_count[i] += 1;
            }
        }
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| (touch_count[i], i));
    order.into_iter().map(|i| cycles[i].clone()).collect()
}

fn should_add_swaps_for_candidate(cycle: &Cycle, used: &HashSet<Vertex>) -> bool {
    cycle.vertices.iter().all(|v| !used.contains(v))
}

/// Realises the forward cyclic rotation `v[0] -> v[1] -> ... -> v[n-1] ->
/// v[0]` as `n - 1` concrete swaps of descending-index consecutive pairs,
/// applying each to `mapping` and appending it to `swap_list` (only those
/// that actually move a token, matching `VertexMapping::apply_swap`).
fn emit_cycle_swaps(cycle: &Cycle, mapping: &mut VertexMapping, swap_list: &mut SwapList) -> Result<()> {
    for ii in (1..cycle.vertices.len()).rev() {
        let (a, b) = (cycle.vertices[ii], cycle.vertices[ii - 1]);
        if mapping.apply_swap(a, b) > 0 {
            swap_list.push_back(Swap::new(a, b)?);
        }
    }
    Ok(())
}

pub struct CyclesCandidateManager {
    options: Options,
}

impl CyclesCandidateManager {
    pub fn new(options: Options) -> Self {
        CyclesCandidateManager { options }
    }

    /// Selects a vertex-disjoint subset of `cycles` and emits the swaps that
    /// realise each selected cycle's rotation, greedily in
    /// least-overlapping-first order.
    pub fn append_partial_solution(
        &self,
        cycles: Vec<Cycle>,
        mapping: &mut VertexMapping,
        swap_list: &mut SwapList,
    ) -> Result<()> {
        let cycles = fill_initial_cycle_ids(cycles, &self.options);
        let cycles = discard_lower_power_solutions(cycles, &self.options);
        let cycles = sort_candidates(cycles);

        let mut used: HashSet<Vertex> = HashSet::new();
        for cycle in &cycles {
            if !should_add_swaps_for_candidate(cycle, &used) {
                continue;
            }
            used.extend(cycle.vertices.iter().copied());
            emit_cycle_swaps(cycle, mapping, swap_list)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_a_three_cycle_as_two_swaps() {
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut swap_list = SwapList::new();
        let cycle = Cycle {
            decrease: 1,
            vertices: vec![0, 1, 2],
        };
        let manager = CyclesCandidateManager::new(Options::default());
        manager
            .append_partial_solution(vec![cycle], &mut mapping, &mut swap_list)
            .unwrap();
        assert!(mapping.all_tokens_home());
        assert_eq!(swap_list.len(), 2);
    }

    #[test]
    fn overlapping_candidates_are_pruned_to_a_disjoint_subset() {
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 0), (2, 3), (3, 2)]).unwrap();
        let mut swap_list = SwapList::new();
        let a = Cycle {
            decrease: 5,
            vertices: vec![0, 1],
        };
        let b = Cycle {
            decrease: 5,
            vertices: vec![1, 2],
        };
        let c = Cycle {
            decrease: 2,
            vertices: vec![2, 3],
        };
        let manager = CyclesCandidateManager::new(Options {
            return_all_good_single_swaps: true,
            ..Options::default()
        });
        manager
            .append_partial_solution(vec![a, b, c], &mut mapping, &mut swap_list)
            .unwrap();
        // `b` shares a vertex with both `a` and `c`; the other two are
        // mutually disjoint, so the greedy pass should keep exactly those.
        assert_eq!(swap_list.len(), 2);
    }

    #[test]
    fn rotation_duplicates_are_collapsed_to_one() {
        let mut mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut swap_list = SwapList::new();
        let a = Cycle {
            decrease: 1,
            vertices: vec![0, 1, 2],
        };
        let b = Cycle {
            decrease: 1,
            vertices: vec![1, 2, 0],
        };
        let manager = CyclesCandidateManager::new(Options::default());
        manager
            .append_partial_solution(vec![a, b], &mut mapping, &mut swap_list)
            .unwrap();
        assert!(mapping.all_tokens_home());
        assert_eq!(swap_list.len(), 2);
    }
}

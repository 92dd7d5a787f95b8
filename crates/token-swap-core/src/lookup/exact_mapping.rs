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

//! `ExactMappingLookup`: resolves a small closed sub-permutation to a swap
//! sequence via the canonical relabelling and the global table, in terms of
//! the caller's original vertex labels.

use hashbrown::HashSet;

use crate::error::Vertex;
use crate::lookup::canonical_relabelling::CanonicalRelabelling;
use crate::lookup::swap_conversion::{EdgesBitset, SwapConversion};
use crate::lookup::table::GLOBAL_TABLE;
use crate::mapping::VertexMapping;

pub struct ExactMappingLookup;

impl ExactMappingLookup {
    /// Looks up a swap sequence solving `mapping` exactly, given which
    /// genuine graph edges are available among its vertices. Only replaces
    /// `existing` (an already-known solution, if any) with a strictly
    /// shorter one; `None` in, `None` out means "nothing found", not
    /// "failed".
    pub fn improve_upon_existing_result(
        mapping: &VertexMapping,
        available_edges: &HashSet<(Vertex, Vertex)>,
        existing: Option<&[(Vertex, Vertex)]>,
        max_number_of_swaps: usize,
    ) -> Option<Vec<(Vertex, Vertex)>> {
        let relabelling = CanonicalRelabelling::new(mapping);
        if relabelling.identity {
            return Some(Vec::new());
        }
        if relabelling.too_many_vertices {
            return existing.map(|e| e.to_vec());
        }

        let budget = match existing {
            Some(e) if e.is_empty() => return Some(Vec::new()),
            Some(e) => max_number_of_swaps.min(e.len() - 1),
            None => max_number_of_swaps,
        };

        let sequences = GLOBAL_TABLE.get(&relabelling.permutation_hash)?;

        let mut new_edges_bitset: EdgesBitset = 0;
        for &(u, v) in available_edges {
            let (Some(&nu), Some(&nv)) = (
                relabelling.old_to_new_vertices.get(&u),
                relabelling.old_to_new_vertices.get(&v),
            ) else {
                continue;
            };
            if nu == nv {
                continue;
            }
            let (i, j) = if nu < nv { (nu, nv) } else { (nv, nu) };
            let code = SwapConversion::swap_to_code(i, j);
            new_edges_bitset |= 1 << (code - 1);
        }

        let swap_hash = sequences.get_lookup_result(new_edges_bitset, budget)?;
        let num_swaps = SwapConversion::get_number_of_swaps(swap_hash);
        let mut result = Vec::with_capacity(num_swaps);
        let mut h = swap_hash;
        for _ in 0..num_swaps {
            let code = (h & 0xF) as u8;
            let (i, j) = SwapConversion::code_to_swap(code);
            let old_i = relabelling.new_to_old_vertices[i as usize];
            let old_j = relabelling.new_to_old_vertices[j as usize];
            result.push((old_i, old_j));
            h >>= 4;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapping_resolves_to_no_swaps() {
        let mapping = VertexMapping::from_pairs([(0, 0)]).unwrap();
        let edges = HashSet::new();
        let result = ExactMappingLookup::improve_upon_existing_result(&mapping, &edges, None, 16);
        assert_eq!(result, Some(Vec::new()));
    }

    #[test]
    fn a_fully_connected_three_cycle_resolves_in_two_swaps() {
        let mapping = VertexMapping::from_pairs([(10, 20), (20, 30), (30, 10)]).unwrap();
        let edges: HashSet<(u64, u64)> = [(10, 20), (20, 30), (10, 30)].into_iter().collect();
        let result = ExactMappingLookup::improve_upon_existing_result(&mapping, &edges, None, 16).unwrap();
        assert_eq!(result.len(), 2);

        // Applying the returned swaps must actually home every token.
        let mut check = mapping.clone();
        for (a, b) in result {
            check.apply_swap(a, b);
        }
        assert!(check.all_tokens_home());
    }

    #[test]
    fn missing_edges_make_the_lookup_fail() {
        // A 3-cycle needs at least two of the triangle's edges; with only
        // one edge available there's no way to realise it within budget.
        let mapping = VertexMapping::from_pairs([(10, 20), (20, 30), (30, 10)]).unwrap();
        let edges: HashSet<(u64, u64)> = [(10, 20)].into_iter().collect();
        let result = ExactMappingLookup::improve_upon_existing_result(&mapping, &edges, None, 16);
        assert!(result.is_none());
    }

    #[test]
    fn does_not_replace_an_existing_result_with_a_longer_one() {
        let mapping = VertexMapping::from_pairs([(10, 20), (20, 30), (30, 10)]).unwrap();
        let edges: HashSet<(u64, u64)> = [(10, 20), (20, 30), (10, 30)].into_iter().collect();
        let existing = vec![(10u64, 20u64)]; // pretend a 1-swap result is already known
        let result = ExactMappingLookup::improve_upon_existing_result(&mapping, &edges, Some(&existing), 16);
        assert!(result.is_none());
    }
}

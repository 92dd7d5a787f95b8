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

//! `PartialMappingLookup`: when some tokens in the lookup window haven't
//! committed to a specific empty vertex yet, tries a bounded number of ways
//! to assign them one and keeps whichever assignment the table resolves in
//! the fewest swaps.

use hashbrown::HashSet;

use crate::error::Vertex;
use crate::lookup::exact_mapping::ExactMappingLookup;
use crate::mapping::VertexMapping;

#[derive(Clone, Copy, Debug)]
pub struct Parameters {
    /// Upper bound on how many candidate assignments of floating tokens to
    /// empty vertices get tried; enumeration stops early once this many
    /// have been generated; picking among equally-sized windows is rarely
    /// worth an exhaustive search.
    pub max_number_of_empty_vertex_permutations: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            max_number_of_empty_vertex_permutations: 24,
        }
    }
}

pub struct PartialMappingLookup {
    pub parameters: Parameters,
}

impl PartialMappingLookup {
    pub fn new(parameters: Parameters) -> Self {
        PartialMappingLookup { parameters }
    }

    /// `fixed_mapping` already assigns every vertex whose destination is
    /// settled; `floating_tokens` lists vertices holding a token that may
    /// land on any of `empty_vertices` (in this window, they're
    /// interchangeable). Tries up to
    /// `parameters.max_number_of_empty_vertex_permutations` assignments and
    /// keeps the cheapest table resolution found.
    pub fn call(
        &self,
        fixed_mapping: &VertexMapping,
        floating_tokens: &[Vertex],
        empty_vertices: &[Vertex],
        available_edges: &HashSet<(Vertex, Vertex)>,
        max_number_of_swaps: usize,
    ) -> Option<Vec<(Vertex, Vertex)>> {
        if floating_tokens.is_empty() {
            return ExactMappingLookup::improve_upon_existing_result(
                fixed_mapping,
                available_edges,
                None,
                max_number_of_swaps,
            );
        }
        if floating_tokens.len() > empty_vertices.len() {
            return None;
        }

        let mut assignments = Vec::new();
        generate_k_permutations(
            empty_vertices,
            floating_tokens.len(),
            self.parameters.max_number_of_empty_vertex_permutations,
            &mut assignments,
        );

        let mut best: Option<Vec<(Vertex, Vertex)>> = None;
        for assignment in assignments {
            // Closes each floating token against its assigned empty vertex
            // as its own 2-cycle, so the candidate is a genuinely closed
            // sub-permutation `CanonicalRelabelling` can decompose.
            let mut candidate = fixed_mapping.clone();
            let mut ok = true;
            for (&token_v, &target_v) in floating_tokens.iter().zip(assignment.iter()) {
                if candidate.insert(token_v, target_v).is_err() || candidate.insert(target_v, token_v).is_err() {
                    ok = false;
                    break;
                }
            }
            if !ok {
                continue;
            }
            let budget = match &best {
                Some(b) if !b.is_empty() => max_number_of_swaps.min(b.len() - 1),
                Some(_) => break, // already found an empty (optimal) result
                None => max_number_of_swaps,
            };
            if let Some(result) =
                ExactMappingLookup::improve_upon_existing_result(&candidate, available_edges, best.as_deref(), budget)
            {
                if best.as_ref().map_or(true, |b| result.len() < b.len()) {
                    best = Some(result);
                }
            }
        }
        best
    }
}

/// Enumerates ordered `k`-subsets ("k-permutations") of `pool`, capped at
/// `cap` results.
fn generate_k_permutations(pool: &[Vertex], k: usize, cap: usize, out: &mut Vec<Vec<Vertex>>) {
    if k > pool.len() || cap == 0 {
        return;
    }
    let mut used = vec![false; pool.len()];
    let mut current = Vec::with_capacity(k);
    fn helper(
        pool: &[Vertex],
        k: usize,
        cap: usize,
        used: &mut [bool],
        current: &mut Vec<Vertex>,
        out: &mut Vec<Vec<Vertex>>,
    ) {
        if out.len() >= cap {
            return;
        }
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in 0..pool.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            current.push(pool[i]);
            helper(pool, k, cap, used, current, out);
            current.pop();
            used[i] = false;
            if out.len() >= cap {
                return;
            }
        }
    }
    helper(pool, k, cap, &mut used, &mut current, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_exact_lookup_when_nothing_is_floating() {
        let mapping = VertexMapping::from_pairs([(0, 0)]).unwrap();
        let lookup = PartialMappingLookup::new(Parameters::default());
        let result = lookup.call(&mapping, &[], &[], &HashSet::new(), 16);
        assert_eq!(result, Some(Vec::new()));
    }

    #[test]
    fn assigns_a_floating_token_to_an_empty_vertex_and_resolves_it() {
        // Vertex 2 holds a floating token that may land on empty vertex 3;
        // the only assignment closes `(2, 3)` into a 2-cycle, solved in one
        // swap.
        let mapping = VertexMapping::new();
        let edges: HashSet<(u64, u64)> = [(2, 3)].into_iter().collect();
        let lookup = PartialMappingLookup::new(Parameters::default());
        let result = lookup.call(&mapping, &[2], &[3], &edges, 16).unwrap();
        assert_eq!(result.len(), 1);
    }
}

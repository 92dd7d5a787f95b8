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

//! `CanonicalRelabelling`: maps a small (at most 6 vertices), already-closed
//! permutation onto a canonical `0..6` relabelling, so the lookup table only
//! ever has to know about *shapes* of permutations (cycle-length
//! multisets), not the actual vertex labels involved.

use hashbrown::{HashMap, HashSet};

use crate::error::Vertex;
use crate::mapping::VertexMapping;

/// Identifies a permutation's shape: the multiset of its cycle lengths
/// (excluding fixed points), encoded as a base-10 number with one digit per
/// cycle, longest cycle first (`332` for a 3-cycle, a 3-cycle, and a
/// 2-cycle — impossible on 6 vertices, but illustrative).
pub type PermutationHash = u64;

/// The at-most-6-vertex relabelling of a closed sub-permutation.
pub struct CanonicalRelabelling {
    /// True if every vertex already maps to itself: nothing to look up.
    pub identity: bool,
    /// True if the mapping has more than 6 displaced vertices: too big for
    /// this table, any lookup must fall back to whatever solution already
    /// exists.
    pub too_many_vertices: bool,
    /// `new_to_old_vertices[i]` is the original vertex now relabelled `i`.
    pub new_to_old_vertices: Vec<Vertex>,
    /// Inverse of `new_to_old_vertices`.
    pub old_to_new_vertices: HashMap<Vertex, u8>,
    pub permutation_hash: PermutationHash,
}

impl CanonicalRelabelling {
    /// `mapping` must already be a closed permutation (every vertex that is
    /// a key is also some other key's target, or its own) restricted to at
    /// most 6 vertices; this is the invariant `VertexMapResizing` and the
    /// segment optimiser's abstract mappings maintain.
    pub fn new(mapping: &VertexMapping) -> Self {
        if mapping.all_tokens_home() {
            return CanonicalRelabelling {
                identity: true,
                too_many_vertices: false,
                new_to_old_vertices: Vec::new(),
                old_to_new_vertices: HashMap::new(),
                permutation_hash: 0,
            };
        }
        if mapping.len() > 6 {
            return CanonicalRelabelling {
                identity: false,
                too_many_vertices: true,
                new_to_old_vertices: Vec::new(),
                old_to_new_vertices: HashMap::new(),
                permutation_hash: 0,
            };
        }

        let mut keys: Vec<Vertex> = mapping.keys().collect();
        keys.sort_unstable();
        let mut seen: HashSet<Vertex> = HashSet::new();
        let mut cycles: Vec<Vec<Vertex>> = Vec::new();
        for &start in &keys {
            if seen.contains(&start) {
                continue;
            }
            let mut cycle = vec![start];
            seen.insert(start);
            let mut current = start;
            loop {
                let next = mapping
                    .get(current)
                    .expect("CanonicalRelabelling requires a closed sub-permutation");
                if next == start {
                    break;
                }
                cycle.push(next);
                seen.insert(next);
                current = next;
            }
            cycles.push(cycle);
        }
        // Longest cycle first; ties broken by the cycle's own minimum
        // vertex (always its first element, by construction above).
        cycles.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

        let new_to_old_vertices: Vec<Vertex> = cycles.iter().flatten().copied().collect();
        let old_to_new_vertices: HashMap<Vertex, u8> = new_to_old_vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i as u8))
            .collect();

        let mut permutation_hash: PermutationHash = 0;
        for cycle in &cycles {
            if cycle.len() == 1 {
                break;
            }
            permutation_hash = permutation_hash * 10 + cycle.len() as u64;
        }

        CanonicalRelabelling {
            identity: false,
            too_many_vertices: false,
            new_to_old_vertices,
            old_to_new_vertices,
            permutation_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapping_is_flagged_and_needs_no_relabelling() {
        let mapping = VertexMapping::from_pairs([(0, 0), (1, 1)]).unwrap();
        let relabelling = CanonicalRelabelling::new(&mapping);
        assert!(relabelling.identity);
    }

    #[test]
    fn more_than_six_vertices_is_flagged_too_many() {
        let mapping = VertexMapping::from_pairs((0..8).map(|v| (v, (v + 1) % 8))).unwrap();
        let relabelling = CanonicalRelabelling::new(&mapping);
        assert!(relabelling.too_many_vertices);
    }

    #[test]
    fn three_cycle_hashes_to_three() {
        let mapping = VertexMapping::from_pairs([(5, 7), (7, 9), (9, 5)]).unwrap();
        let relabelling = CanonicalRelabelling::new(&mapping);
        assert_eq!(relabelling.permutation_hash, 3);
        assert_eq!(relabelling.new_to_old_vertices, vec![5, 7, 9]);
        assert_eq!(relabelling.old_to_new_vertices[&5], 0);
    }

    #[test]
    fn a_three_cycle_and_a_two_cycle_hash_to_thirty_two() {
        let mapping = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0), (3, 4), (4, 3)]).unwrap();
        let relabelling = CanonicalRelabelling::new(&mapping);
        assert_eq!(relabelling.permutation_hash, 32);
        assert_eq!(relabelling.new_to_old_vertices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn fixed_points_do_not_affect_the_hash() {
        let mapping = VertexMapping::from_pairs([(0, 1), (1, 0), (2, 2)]).unwrap();
        let relabelling = CanonicalRelabelling::new(&mapping);
        assert_eq!(relabelling.permutation_hash, 2);
        assert_eq!(relabelling.new_to_old_vertices, vec![0, 1, 2]);
    }
}

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

//! The global swap-sequence lookup table.
//!
//! For every partition of `2..=6` into parts of size at least 2 (ten
//! shapes: `2, 3, 4, 22, 5, 32, 6, 42, 33, 222`), the table holds the
//! provably-optimal swap sequence realising that permutation shape: each
//! part of size `k` is assigned the next `k` relabelled vertices in order,
//! and resolved as the `k - 1` descending-consecutive-pair swaps
//! `(v[k-1], v[k-2]), ..., (v[1], v[0])`, which realise the forward cyclic
//! shift `v[0] -> v[1] -> ... -> v[k-1] -> v[0]` in the minimum number of
//! swaps for a cycle of that length. Parts are laid out in the same
//! longest-first order `CanonicalRelabelling` itself sorts cycles into, so
//! a looked-up hash always matches the shape it was built for.

use hashbrown::HashMap;
use once_cell::sync::Lazy;

use crate::lookup::canonical_relabelling::PermutationHash;
use crate::lookup::filtered_sequences::{FilteredSwapSequences, SequenceEntry};
use crate::lookup::swap_conversion::SwapConversion;

fn partitions_into_parts_of_at_least_two(n: usize) -> Vec<Vec<usize>> {
    fn helper(remaining: usize, max_part: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining == 0 {
            out.push(current.clone());
            return;
        }
        if remaining < 2 {
            return;
        }
        let upper = remaining.min(max_part);
        for part in (2..=upper).rev() {
            current.push(part);
            helper(remaining - part, part, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    helper(n, n, &mut Vec::new(), &mut out);
    out
}

fn permutation_hash_for_shape(shape: &[usize]) -> PermutationHash {
    shape.iter().fold(0u64, |acc, &k| acc * 10 + k as u64)
}

fn build_entry_for_shape(shape: &[usize]) -> (PermutationHash, SequenceEntry) {
    let mut swaps: Vec<(u8, u8)> = Vec::new();
    let mut next_vertex = 0u8;
    for &k in shape {
        let block: Vec<u8> = (next_vertex..next_vertex + k as u8).collect();
        next_vertex += k as u8;
        for ii in (1..block.len()).rev() {
            swaps.push((block[ii], block[ii - 1]));
        }
    }
    let swap_hash = SwapConversion::hash_from_swaps(&swaps);
    let edges_bitset = SwapConversion::get_edges_bitset(swap_hash);
    (permutation_hash_for_shape(shape), SequenceEntry { edges_bitset, swap_hash })
}

pub static GLOBAL_TABLE: Lazy<HashMap<PermutationHash, FilteredSwapSequences>> = Lazy::new(|| {
    let mut table: HashMap<PermutationHash, FilteredSwapSequences> = HashMap::new();
    for n in 2..=6usize {
        for shape in partitions_into_parts_of_at_least_two(n) {
            let (hash, entry) = build_entry_for_shape(&shape);
            table.entry(hash).or_insert_with(FilteredSwapSequences::new).insert(entry);
        }
    }
    table
});

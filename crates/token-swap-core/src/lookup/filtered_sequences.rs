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

//! `FilteredSwapSequences`: the per-permutation-shape bucket of known swap
//! sequences, queried by which graph edges are actually available.

use hashbrown::HashMap;

use crate::lookup::swap_conversion::{EdgesBitset, SwapConversion, SwapHash};

/// One known swap sequence realising a permutation shape, alongside the
/// edges it needs.
#[derive(Clone, Copy, Debug)]
pub struct SequenceEntry {
    pub edges_bitset: EdgesBitset,
    pub swap_hash: SwapHash,
}

/// Entries bucketed by a single representative bit of their edge set, so a
/// query only has to scan buckets whose key it can actually satisfy rather
/// than every entry.
#[derive(Default)]
pub struct FilteredSwapSequences {
    buckets: HashMap<EdgesBitset, Vec<SequenceEntry>>,
}

impl FilteredSwapSequences {
    pub fn new() -> Self {
        FilteredSwapSequences::default()
    }

    /// Buckets `entry` under whichever single bit of its edge set currently
    /// holds the fewest entries, for rough load balancing across bits.
    pub fn insert(&mut self, entry: SequenceEntry) {
        let mut best_key: Option<EdgesBitset> = None;
        for bit in 0..15u32 {
            let mask: EdgesBitset = 1 << bit;
            if entry.edges_bitset & mask == 0 {
                continue;
            }
            let count = self.buckets.get(&mask).map_or(0, |v| v.len());
            if best_key.map_or(true, |k| count < self.buckets.get(&k).map_or(0, |v| v.len())) {
                best_key = Some(mask);
            }
        }
        let key = best_key.unwrap_or(0);
        self.buckets.entry(key).or_default().push(entry);
    }

    /// The cheapest (fewest swaps, at most `max_num_swaps`) entry whose
    /// required edges are all present in `edges_bitset`.
    pub fn get_lookup_result(&self, edges_bitset: EdgesBitset, max_num_swaps: usize) -> Option<SwapHash> {
        let mut bucket_keys: Vec<&EdgesBitset> = self.buckets.keys().collect();
        bucket_keys.sort_unstable();
        let mut best: Option<(usize, SwapHash)> = None;
        for &key in bucket_keys {
            // The bucket's representative bit must itself be satisfiable.
            if key & !edges_bitset != 0 {
                continue;
            }
            for entry in &self.buckets[key] {
                if entry.edges_bitset & !edges_bitset != 0 {
                    continue;
                }
                let n = SwapConversion::get_number_of_swaps(entry.swap_hash);
                if n > max_num_swaps {
                    continue;
                }
                if best.map_or(true, |(best_n, _)| n < best_n) {
                    best = Some((n, entry.swap_hash));
                }
            }
        }
        best.map(|(_, hash)| hash)
    }
}

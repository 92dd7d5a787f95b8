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

//! Packs a sequence of swaps among at most 6 relabelled vertices (`0..6`)
//! into a single `u64`, one nibble per swap, so the lookup table can use it
//! as a cheap hash/equality key instead of a `Vec<(u8, u8)>`.

/// A sequence of up to 16 swaps among 6 relabelled vertices, packed one
/// nibble per swap starting from the least significant, terminated by the
/// first zero nibble (`0` is never a valid swap code).
pub type SwapHash = u64;

/// A 15-bit mask, one bit per possible swap among 6 vertices, recording
/// *which* swaps a sequence uses without caring how many times or in what
/// order.
pub type EdgesBitset = u16;

const NUM_VERTICES: u8 = 6;

pub struct SwapConversion;

impl SwapConversion {
    /// The 1-based code for the swap `(i, j)`, `i < j`, both in `0..6`,
    /// under the nested-loop enumeration order `i` outer, `j` inner
    /// (`(0,1)=1, (0,2)=2, ..., (0,5)=5, (1,2)=6, ..., (4,5)=15`).
    pub fn swap_to_code(i: u8, j: u8) -> u8 {
        debug_assert!(i < j && j < NUM_VERTICES);
        let mut code = 1u8;
        for a in 0..i {
            code += NUM_VERTICES - 1 - a;
        }
        code + (j - i - 1)
    }

    /// Inverse of `swap_to_code`.
    pub fn code_to_swap(code: u8) -> (u8, u8) {
        let mut c = 1u8;
        for i in 0..NUM_VERTICES {
            for j in (i + 1)..NUM_VERTICES {
                if c == code {
                    return (i, j);
                }
                c += 1;
            }
        }
        unreachable!("code {code} is not a valid swap code among {NUM_VERTICES} vertices")
    }

    /// Packs a swap sequence into a hash, earliest swap in the least
    /// significant nibble.
    pub fn hash_from_swaps(swaps: &[(u8, u8)]) -> SwapHash {
        debug_assert!(swaps.len() <= 16, "a SwapHash holds at most 16 nibbles");
        let mut hash: SwapHash = 0;
        for (shift, &(a, b)) in swaps.iter().enumerate() {
            let (i, j) = if a < b { (a, b) } else { (b, a) };
            let code = Self::swap_to_code(i, j) as SwapHash;
            hash |= code << (4 * shift);
        }
        hash
    }

    /// Number of swaps packed into `hash`: nonzero nibbles counted from the
    /// least significant, stopping at the first zero.
    pub fn get_number_of_swaps(hash: SwapHash) -> usize {
        let mut count = 0;
        let mut h = hash;
        for _ in 0..16 {
            if h & 0xF == 0 {
                break;
            }
            count += 1;
            h >>= 4;
        }
        count
    }

    /// The set of distinct swaps `hash` uses, regardless of order or
    /// repetition.
    pub fn get_edges_bitset(hash: SwapHash) -> EdgesBitset {
        let mut bitset: EdgesBitset = 0;
        let mut h = hash;
        for _ in 0..16 {
            let nibble = (h & 0xF) as u8;
            if nibble == 0 {
                break;
            }
            bitset |= 1 << (nibble - 1);
            h >>= 4;
        }
        bitset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_to_code_covers_all_fifteen_pairs_in_order() {
        let mut expected = 1u8;
        for i in 0..6u8 {
            for j in (i + 1)..6u8 {
                assert_eq!(SwapConversion::swap_to_code(i, j), expected);
                assert_eq!(SwapConversion::code_to_swap(expected), (i, j));
                expected += 1;
            }
        }
        assert_eq!(expected, 16);
    }

    #[test]
    fn hash_from_swaps_round_trips_through_number_and_bitset() {
        let swaps = [(2u8, 1u8), (4, 3), (0, 5)];
        let hash = SwapConversion::hash_from_swaps(&swaps);
        assert_eq!(SwapConversion::get_number_of_swaps(hash), 3);
        let bitset = SwapConversion::get_edges_bitset(hash);
        for &(a, b) in &swaps {
            let (i, j) = if a < b { (a, b) } else { (b, a) };
            let code = SwapConversion::swap_to_code(i, j);
            assert_ne!(bitset & (1 << (code - 1)), 0);
        }
    }

    #[test]
    fn empty_sequence_has_zero_swaps_and_empty_bitset() {
        assert_eq!(SwapConversion::get_number_of_swaps(0), 0);
        assert_eq!(SwapConversion::get_edges_bitset(0), 0);
    }
}

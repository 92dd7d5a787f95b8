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

//! `SwapListSegmentOptimiser` and `SwapListTableOptimiser`: slide the
//! lookup table (4.J) over growing windows of a solved `SwapList`,
//! replacing any window the table can realise in strictly fewer swaps.
//!
//! Neither pass needs a real `VertexMapping` with genuine targets: all
//! that matters is which vertices are *occupied* by some token at any
//! point (to tell a real swap from a no-op one) and, within a window,
//! which occupied vertex a token started the window on versus which one
//! it ends the window on. A `VertexMapping` is reused here purely as that
//! bookkeeping device, seeded with each occupied vertex mapped to itself
//! as an identity tag.

use hashbrown::HashSet;

use crate::arena::Handle;
use crate::error::{Result, Vertex};
use crate::graph::Neighbours;
use crate::lookup::partial_mapping::PartialMappingLookup;
use crate::lookup::vertex_map_resizing::VertexMapResizing;
use crate::mapping::VertexMapping;
use crate::optimiser::frontward_travel_pass;
use crate::swap_list::{Swap, SwapList};

/// Give up growing a segment after this many consecutive window sizes
/// whose mapping couldn't be shrunk to the table's 6-vertex ceiling.
const MAX_CONSECUTIVE_TOO_MANY_VERTICES: usize = 5;

/// A window isn't offered to the lookup table until it holds at least this
/// many swaps, except at the very end of the list.
const MIN_WINDOW_LEN_FOR_LOOKUP: usize = 3;

/// Updates `occupied` for the vertex-swap `(a, b)`, exactly the occupancy
/// half of `VertexMapping::apply_swap` without any target bookkeeping.
/// Returns how many of the two vertices were occupied beforehand, so
/// callers can tell an empty swap (0) apart from a real one.
fn advance_occupancy(occupied: &mut HashSet<Vertex>, a: Vertex, b: Vertex) -> u8 {
    let had_a = occupied.remove(&a);
    let had_b = occupied.remove(&b);
    match (had_a, had_b) {
        (true, true) => {
            occupied.insert(a);
            occupied.insert(b);
            2
        }
        (true, false) => {
            occupied.insert(b);
            1
        }
        (false, true) => {
            occupied.insert(a);
            1
        }
        (false, false) => 0,
    }
}

/// Slides a single growing window starting at `start_id`, looks up a
/// replacement at every eligible window size, and splices in whichever
/// replacement gave the greatest reduction (earliest size wins ties).
/// Returns the handle the caller should resume scanning from: either the
/// node right after the (possibly now shorter) window, or `None` if the
/// window ran to the end of the list.
pub fn optimise_segment(
    start_id: Handle,
    tokens_at_start: &HashSet<Vertex>,
    resizer: &mut VertexMapResizing,
    swap_list: &mut SwapList,
    neighbours: &mut impl Neighbours,
    lookup: &PartialMappingLookup,
) -> Result<Option<Handle>> {
    let mut occupant = VertexMapping::from_pairs(tokens_at_start.iter().map(|&v| (v, v)))?;
    let mut window_len = 0usize;
    let mut consecutive_too_many_vertices = 0usize;
    // (original window length, replacement, handle right after that window)
    let mut best: Option<(usize, Vec<(Vertex, Vertex)>, Option<Handle>)> = None;

    let mut current = Some(start_id);
    while let Some(h) = current {
        let (a, b) = swap_list.get(h).endpoints();
        occupant.apply_swap(a, b);
        window_len += 1;
        current = swap_list.next(h);

        if window_len < MIN_WINDOW_LEN_FOR_LOOKUP && current.is_some() {
            continue;
        }

        let mut local_mapping = VertexMapping::new();
        for (final_v, start_v) in occupant.iter() {
            local_mapping.insert(start_v, final_v)?;
        }
        let reached = resizer.resize_mapping(&mut local_mapping, 6, neighbours)?;
        if !reached && local_mapping.len() > 6 {
            consecutive_too_many_vertices += 1;
            if consecutive_too_many_vertices > MAX_CONSECUTIVE_TOO_MANY_VERTICES {
                break;
            }
            continue;
        }
        consecutive_too_many_vertices = 0;

        let available: HashSet<(Vertex, Vertex)> = resizer.result_edges().iter().map(|s| s.endpoints()).collect();
        if let Some(replacement) = lookup.call(&local_mapping, &[], &[], &available, window_len) {
            if replacement.len() < window_len {
                let reduction = window_len - replacement.len();
                let improves = best
                    .as_ref()
                    .map_or(true, |(best_len, best_repl, _)| reduction > *best_len - best_repl.len());
                if improves {
                    best = Some((window_len, replacement, current));
                }
            }
        }
    }

    let Some((original_len, replacement, resume_after_original)) = best else {
        return Ok(swap_list.next(start_id));
    };

    if replacement.is_empty() {
        swap_list.erase_interval(start_id, original_len);
        return Ok(resume_after_original);
    }

    let mut replaced_swaps = Vec::with_capacity(replacement.len());
    for (a, b) in replacement {
        replaced_swaps.push(Swap::new(a, b)?);
    }
    let num_replacement = replaced_swaps.len();
    let last_written = swap_list.overwrite_interval(start_id, replaced_swaps);
    let tail_len = original_len - num_replacement;
    if tail_len > 0 {
        if let Some(first_tail) = swap_list.next(last_written) {
            swap_list.erase_interval(first_tail, tail_len);
        }
    }
    Ok(swap_list.next(last_written))
}

/// The occupancy set just before `stop_before`, replayed from the front of
/// `list`. Recomputing this on every step (rather than threading an
/// incrementally-updated set through table-optimiser splices) keeps
/// `forward_direction_pass` correct regardless of how much a preceding
/// `optimise_segment` call shortened the list by.
fn occupancy_before(list: &SwapList, tokens_at_start: &HashSet<Vertex>, stop_before: Handle) -> HashSet<Vertex> {
    let mut tokens = tokens_at_start.clone();
    let mut current = list.front_id();
    while let Some(h) = current {
        if h == stop_before {
            break;
        }
        let (a, b) = list.get(h).endpoints();
        advance_occupancy(&mut tokens, a, b);
        current = list.next(h);
    }
    tokens
}

/// One forward sweep: `frontward_travel_pass`, then `optimise_segment`
/// from the front, then from every subsequent position in turn, each time
/// with the occupancy set advanced past everything before it.
fn forward_direction_pass(
    tokens_at_start: &HashSet<Vertex>,
    resizer: &mut VertexMapResizing,
    list: &mut SwapList,
    neighbours: &mut impl Neighbours,
    lookup: &PartialMappingLookup,
) -> Result<()> {
    frontward_travel_pass(list);

    let mut current = list.front_id();
    while let Some(h) = current {
        let tokens_here = occupancy_before(list, tokens_at_start, h);
        current = optimise_segment(h, &tokens_here, resizer, list, neighbours, lookup)?;
    }
    Ok(())
}

/// Slides the lookup table over `list` until its length stops decreasing:
/// alternates a forward pass (seeded with the occupancy at the list's
/// start) with a reversed-list forward pass (seeded with the occupancy at
/// the list's end), each reversal undone immediately after.
pub fn optimise(
    tokens_at_start: &HashSet<Vertex>,
    resizer: &mut VertexMapResizing,
    list: &mut SwapList,
    neighbours: &mut impl Neighbours,
    lookup: &PartialMappingLookup,
) -> Result<()> {
    let mut tokens_at_end = tokens_at_start.clone();
    let mut current = list.front_id();
    while let Some(h) = current {
        let next = list.next(h);
        let (a, b) = list.get(h).endpoints();
        if advance_occupancy(&mut tokens_at_end, a, b) == 0 {
            list.erase(h);
        }
        current = next;
    }

    loop {
        let before = list.len();
        forward_direction_pass(tokens_at_start, resizer, list, neighbours, lookup)?;
        list.reverse();
        forward_direction_pass(&tokens_at_end, resizer, list, neighbours, lookup)?;
        list.reverse();
        if list.len() >= before {
            break;
        }
    }
    Ok(())
}

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

//! `Swap`, an unordered edge with `a < b`, and `SwapList`, the
//! `ListArena<Swap>`-backed sequence the rest of the solver mutates.

use crate::arena::{Handle, ListArena};
use crate::error::{Error, Result, Vertex};

/// An unordered pair of distinct vertices, canonicalised so `a < b`. Two
/// swaps commute ("are disjoint") iff they share no vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swap {
    a: Vertex,
    b: Vertex,
}

impl Swap {
    pub fn new(a: Vertex, b: Vertex) -> Result<Self> {
        if a == b {
            return Err(Error::InvalidSwap(a));
        }
        Ok(if a < b { Swap { a, b } } else { Swap { a: b, b: a } })
    }

    pub fn a(&self) -> Vertex {
        self.a
    }

    pub fn b(&self) -> Vertex {
        self.b
    }

    pub fn endpoints(&self) -> (Vertex, Vertex) {
        (self.a, self.b)
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.a == v || self.b == v
    }

    /// Two swaps are disjoint ("commute") iff they share no vertex.
    pub fn is_disjoint_from(&self, other: &Swap) -> bool {
        self.a != other.a && self.a != other.b && self.b != other.a && self.b != other.b
    }
}

/// A thin wrapper of `ListArena<Swap>`. `push_back` performs trivial
/// peephole cancellation: appending the same swap as the current back
/// erases both instead of growing the list.
#[derive(Default)]
pub struct SwapList {
    arena: ListArena<Swap>,
}

impl SwapList {
    pub fn new() -> Self {
        SwapList {
            arena: ListArena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn front_id(&self) -> Option<Handle> {
        self.arena.front_id()
    }

    pub fn back_id(&self) -> Option<Handle> {
        self.arena.back_id()
    }

    pub fn next(&self, h: Handle) -> Option<Handle> {
        self.arena.next(h)
    }

    pub fn previous(&self, h: Handle) -> Option<Handle> {
        self.arena.previous(h)
    }

    pub fn get(&self, h: Handle) -> Swap {
        *self.arena.get(h)
    }

    /// Appends `swap`, with trivial peephole cancellation against the
    /// current back of the list.
    pub fn push_back(&mut self, swap: Swap) {
        if let Some(back) = self.arena.back_id() {
            if *self.arena.get(back) == swap {
                self.arena.erase(back);
                return;
            }
        }
        self.arena.push_back(swap);
    }

    pub fn insert_after(&mut self, h: Handle, swap: Swap) -> Handle {
        self.arena.insert_after(h, swap)
    }

    pub fn insert_before(&mut self, h: Handle, swap: Swap) -> Handle {
        self.arena.insert_before(h, swap)
    }

    pub fn erase(&mut self, h: Handle) -> Swap {
        self.arena.erase(h)
    }

    pub fn erase_interval(&mut self, h: Handle, k: usize) {
        self.arena.erase_interval(h, k)
    }

    pub fn overwrite_interval<I: IntoIterator<Item = Swap>>(&mut self, h: Handle, values: I) -> Handle {
        self.arena.overwrite_interval(h, values)
    }

    pub fn reverse(&mut self) {
        self.arena.reverse()
    }

    pub fn clear(&mut self) {
        self.arena.clear()
    }

    pub fn fast_clear(&mut self) {
        self.arena.fast_clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = Swap> + '_ {
        self.arena.iter().copied()
    }

    pub fn iter_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.arena.iter_handles()
    }

    pub fn to_vec(&self) -> Vec<(Vertex, Vertex)> {
        self.iter().map(|s| s.endpoints()).collect()
    }
}

impl Extend<Swap> for SwapList {
    fn extend<I: IntoIterator<Item = Swap>>(&mut self, iter: I) {
        for swap in iter {
            self.push_back(swap);
        }
    }
}

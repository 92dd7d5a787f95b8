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

//! `VertexMapping`: current vertex -> target vertex, and the progress
//! metric `L` defined over it.

use indexmap::IndexMap;

use crate::error::{Error, Result, Vertex};
use crate::graph::Distances;

/// A partial injection current vertex -> target vertex. Iteration order
/// follows insertion order (`IndexMap`), which keeps the growth/candidate
/// managers' tie-breaking deterministic independent of hash seed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexMapping {
    forward: IndexMap<Vertex, Vertex>,
}

impl VertexMapping {
    pub fn new() -> Self {
        VertexMapping {
            forward: IndexMap::new(),
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Vertex, Vertex)>) -> Result<Self> {
        let mut m = VertexMapping::new();
        for (v, t) in pairs {
            m.insert(v, t)?;
        }
        Ok(m)
    }

    /// Inserts `v -> target`, failing with `DuplicateTarget` if some other
    /// key already claims `target`.
    pub fn insert(&mut self, v: Vertex, target: Vertex) -> Result<()> {
        if let Some((&other, _)) = self.forward.iter().find(|(&k, &t)| k != v && t == target) {
            return Err(Error::DuplicateTarget {
                target,
                first: other,
                second: v,
            });
        }
        self.forward.insert(v, target);
        Ok(())
    }

    pub fn remove(&mut self, v: Vertex) -> Option<Vertex> {
        self.forward.shift_remove(&v)
    }

    pub fn get(&self, v: Vertex) -> Option<Vertex> {
        self.forward.get(&v).copied()
    }

    pub fn contains_key(&self, v: Vertex) -> bool {
        self.forward.contains_key(&v)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.forward.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.forward.iter().map(|(&v, &t)| (v, t))
    }

    /// Exchanges the values stored under `a` and `b`, moving a token to the
    /// other's vertex if only one of them is present, and doing nothing if
    /// neither is. Returns how many tokens moved (0, 1, or 2), matching the
    /// `SwapSequence` application semantics in the data model.
    pub fn apply_swap(&mut self, a: Vertex, b: Vertex) -> u8 {
        match (self.forward.swap_remove(&a), self.forward.swap_remove(&b)) {
            (Some(ta), Some(tb)) => {
                self.forward.insert(a, tb);
                self.forward.insert(b, ta);
                2
            }
            (Some(ta), None) => {
                self.forward.insert(b, ta);
                1
            }
            (None, Some(tb)) => {
                self.forward.insert(a, tb);
                1
            }
            (None, None) => 0,
        }
    }

    /// True iff every key currently maps to itself.
    pub fn all_tokens_home(&self) -> bool {
        self.forward.iter().all(|(&v, &t)| v == t)
    }

    /// Validates the no-duplicate-target invariant from scratch; used when
    /// a mapping is handed in from the outside rather than built up via
    /// `insert`.
    pub fn check(&self) -> Result<()> {
        let mut seen: IndexMap<Vertex, Vertex> = IndexMap::new();
        for (&v, &t) in self.forward.iter() {
            if let Some(&other) = seen.get(&t) {
                return Err(Error::DuplicateTarget {
                    target: t,
                    first: other,
                    second: v,
                });
            }
            seen.insert(t, v);
        }
        Ok(())
    }
}

/// `L(M) = sum over v in keys(M) of dist(v, M[v])`.
pub fn progress_l(mapping: &VertexMapping, distances: &mut impl Distances) -> Result<u64> {
    let mut total = 0u64;
    for (v, t) in mapping.iter() {
        total += distances.distance(v, t)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListGraph;

    #[test]
    fn duplicate_target_is_rejected() {
        let mut m = VertexMapping::new();
        m.insert(0, 1).unwrap();
        let err = m.insert(2, 1).unwrap_err();
        assert!(matches!(err, Error::DuplicateTarget { .. }));
    }

    #[test]
    fn apply_swap_moves_tokens_correctly() {
        // Scenario S2 from the spec: a 3-cycle on a triangle, solved by two
        // swaps.
        let mut m = VertexMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        m.apply_swap(1, 2);
        m.apply_swap(0, 1);
        assert!(m.all_tokens_home());
    }

    #[test]
    fn apply_swap_with_one_sided_presence_relocates_the_token() {
        let mut m = VertexMapping::from_pairs([(0, 5)]).unwrap();
        let moved = m.apply_swap(0, 1);
        assert_eq!(moved, 1);
        assert_eq!(m.get(0), None);
        assert_eq!(m.get(1), Some(5));
    }

    #[test]
    fn apply_swap_with_neither_present_is_a_no_op() {
        let mut m = VertexMapping::from_pairs([(0, 5)]).unwrap();
        let moved = m.apply_swap(1, 2);
        assert_eq!(moved, 0);
        assert_eq!(m.get(0), Some(5));
    }

    #[test]
    fn progress_metric_sums_distances() {
        let graph = EdgeListGraph::from_edges([(0, 1), (1, 2)]).unwrap();
        let mut distances = graph.distances();
        let m = VertexMapping::from_pairs([(0, 2), (2, 0)]).unwrap();
        assert_eq!(progress_l(&m, &mut distances).unwrap(), 4);
    }
}

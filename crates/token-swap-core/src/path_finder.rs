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

//! `RiverFlow`: among the (possibly many) shortest paths between two
//! vertices, picks one that reuses edges previous paths already used, on
//! the theory that reused edges are more likely to cancel out later.

use hashbrown::HashMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::error::{Result, Vertex};
use crate::graph::{Distances, Neighbours};

fn edge_key(a: Vertex, b: Vertex) -> (Vertex, Vertex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Picks shortest paths biased to reuse previously travelled edges.
pub struct RiverFlow {
    edge_counts: HashMap<(Vertex, Vertex), u64>,
    rng: Pcg64Mcg,
    seed: u64,
}

impl RiverFlow {
    pub fn new(seed: u64) -> Self {
        RiverFlow {
            edge_counts: HashMap::new(),
            rng: Pcg64Mcg::seed_from_u64(seed),
            seed,
        }
    }

    /// Zeroes all usage counters and reseeds the RNG, so replays against
    /// the same graph are deterministic.
    pub fn reset(&mut self) {
        self.edge_counts.clear();
        self.rng = Pcg64Mcg::seed_from_u64(self.seed);
    }

    /// Increments the usage counter for `(u, v)` directly, for edges the
    /// caller emitted without going through `find` (the cycles engine does
    /// this for every swap it emits).
    pub fn register_edge(&mut self, u: Vertex, v: Vertex) {
        *self.edge_counts.entry(edge_key(u, v)).or_insert(0) += 1;
    }

    /// Finds a shortest path from `u` to `v`, biased towards edges this
    /// finder has used before.
    pub fn find(
        &mut self,
        u: Vertex,
        v: Vertex,
        distances: &mut impl Distances,
        neighbours: &mut impl Neighbours,
    ) -> Result<Vec<Vertex>> {
        if u == v {
            return Ok(vec![u]);
        }
        let total = distances.distance(u, v)?;
        let mut path = vec![u];
        let mut current = u;
        let mut steps = 0u64;
        while steps < total {
            let remaining = total - steps;
            let candidates: Vec<Vertex> = neighbours
                .neighbours(current)
                .to_vec()
                .into_iter()
                .map(|n| Ok::<_, crate::error::Error>((n, distances.distance(n, v)?)))
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .filter(|&(_, d)| d == remaining - 1)
                .map(|(n, _)| n)
                .collect();
            debug_assert!(
                !candidates.is_empty(),
                "no neighbour of {current} lies on a shortest path to {v}"
            );
            let max_count = candidates
                .iter()
                .map(|&n| self.edge_counts.get(&edge_key(current, n)).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let best: Vec<Vertex> = candidates
                .into_iter()
                .filter(|&n| self.edge_counts.get(&edge_key(current, n)).copied().unwrap_or(0) == max_count)
                .collect();
            let next = *best.choose(&mut self.rng).expect("candidate list is non-empty");
            path.push(next);
            current = next;
            steps += 1;
        }
        for window in path.windows(2) {
            *self.edge_counts.entry(edge_key(window[0], window[1])).or_insert(0) += 1;
        }
        distances.register_shortest_path(&path);
        Ok(path)
    }
}

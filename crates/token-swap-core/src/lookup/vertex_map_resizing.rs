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

//! `VertexMapResizing`: grows or shrinks a small abstract mapping towards
//! exactly 6 vertices (the lookup table's ceiling), trading in fixed
//! (self-mapped) vertices for better connectivity among the vertices that
//! remain.

use hashbrown::HashSet;

use crate::error::{Result, Vertex};
use crate::graph::Neighbours;
use crate::mapping::VertexMapping;
use crate::swap_list::Swap;

/// Resizes abstract mappings and remembers the genuine graph edges among
/// whichever vertex set the last resize left behind.
#[derive(Default)]
pub struct VertexMapResizing {
    result_edges: HashSet<Swap>,
}

impl VertexMapResizing {
    pub fn new() -> Self {
        VertexMapResizing::default()
    }

    /// The genuine graph edges among `mapping`'s vertices, as of the last
    /// `resize_mapping` call.
    pub fn result_edges(&self) -> &HashSet<Swap> {
        &self.result_edges
    }

    /// Grows or shrinks `mapping`'s vertex set towards `desired_size`.
    /// Shrinking only ever removes *fixed* vertices (`map[v] == v`), picking
    /// whichever has the fewest edges into the rest of the set, and fails
    /// (returns `false`, leaving `mapping` larger than requested) if no
    /// fixed vertex remains to remove. Growing adds fixed vertices chosen
    /// among neighbours of the current set with the most edges back into
    /// it, and always succeeds — running out of candidates before reaching
    /// `desired_size` still counts as success, just at a smaller size.
    pub fn resize_mapping(
        &mut self,
        mapping: &mut VertexMapping,
        desired_size: usize,
        neighbours: &mut impl Neighbours,
    ) -> Result<bool> {
        let mut reached = true;
        if mapping.len() > desired_size {
            while mapping.len() > desired_size {
                if self.remove_vertex(mapping, neighbours)?.is_none() {
                    reached = false;
                    break;
                }
            }
        } else {
            while mapping.len() < desired_size {
                if self.add_vertex(mapping, neighbours)?.is_none() {
                    break;
                }
            }
        }
        self.fill_result_edges(mapping, neighbours)?;
        Ok(reached)
    }

    fn remove_vertex(&mut self, mapping: &mut VertexMapping, neighbours: &mut impl Neighbours) -> Result<Option<Vertex>> {
        let vertex_set: HashSet<Vertex> = mapping.keys().collect();
        let mut best: Option<(Vertex, usize)> = None;
        for v in mapping.keys() {
            if mapping.get(v) != Some(v) {
                continue;
            }
            let edge_count = neighbours.neighbours(v).iter().filter(|n| vertex_set.contains(n)).count();
            if best.map_or(true, |(_, c)| edge_count < c) {
                best = Some((v, edge_count));
            }
        }
        if let Some((v, _)) = best {
            mapping.remove(v);
            Ok(Some(v))
        } else {
            Ok(None)
        }
    }

    fn add_vertex(&mut self, mapping: &mut VertexMapping, neighbours: &mut impl Neighbours) -> Result<Option<Vertex>> {
        let vertex_set: HashSet<Vertex> = mapping.keys().collect();
        let mut candidate_edge_counts: hashbrown::HashMap<Vertex, usize> = hashbrown::HashMap::new();
        for v in mapping.keys() {
            let adjacent = neighbours.neighbours(v).to_vec();
            for nb in adjacent {
                if !vertex_set.contains(&nb) {
                    *candidate_edge_counts.entry(nb).or_insert(0) += 1;
                }
            }
        }
        let best = candidate_edge_counts
            .into_iter()
            .max_by_key(|&(v, count)| (count, std::cmp::Reverse(v)));
        if let Some((v, _)) = best {
            mapping.insert(v, v)?;
            Ok(Some(v))
        } else {
            Ok(None)
        }
    }

    fn fill_result_edges(&mut self, mapping: &VertexMapping, neighbours: &mut impl Neighbours) -> Result<()> {
        self.result_edges.clear();
        let keys: Vec<Vertex> = mapping.keys().collect();
        for &v in &keys {
            let adjacent = neighbours.neighbours(v).to_vec();
            for nb in adjacent {
                if keys.contains(&nb) {
                    self.result_edges.insert(Swap::new(v, nb)?);
                }
            }
        }
        Ok(())
    }
}

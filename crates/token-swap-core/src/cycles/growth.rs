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

//! `CyclesGrowthManager`: grows a population of candidate abstract cycles
//! (sequences of vertices whose cyclic rotation would reduce `L`) from
//! small seeds, closing or discarding each as it's extended.

use crate::error::{Result, Vertex};
use crate::graph::{Distances, Neighbours};
use crate::mapping::VertexMapping;

/// A candidate cyclic rotation: applying the swaps this cycle implies
/// reduces `L` by `decrease` once closed. `vertices` lists the cycle in
/// rotation order; a `Cycle` is not yet closed until `attempt_to_close_cycles`
/// accepts it.
#[derive(Clone, Debug)]
pub struct Cycle {
    pub decrease: i64,
    pub vertices: Vec<Vertex>,
}

impl Cycle {
    pub fn contains(&self, vertex: Vertex) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// `dist(v1, M[v1]) - dist(v2, M[v1])`, the change in `L` from moving the
/// token at `v1` onto `v2`. Zero if `v1` holds no token.
pub fn get_move_decrease(
    mapping: &VertexMapping,
    v1: Vertex,
    v2: Vertex,
    distances: &mut impl Distances,
) -> Result<i64> {
    match mapping.get(v1) {
        None => Ok(0),
        Some(target) => {
            let d1 = distances.distance(v1, target)? as i64;
            let d2 = distances.distance(v2, target)? as i64;
            Ok(d1 - d2)
        }
    }
}

/// The change in `L` from swapping the tokens at `v1` and `v2` outright.
pub fn get_swap_decrease(
    mapping: &VertexMapping,
    v1: Vertex,
    v2: Vertex,
    distances: &mut impl Distances,
) -> Result<i64> {
    Ok(get_move_decrease(mapping, v1, v2, distances)? + get_move_decrease(mapping, v2, v1, distances)?)
}

#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub max_cycle_size: usize,
    pub max_number_of_cycles: usize,
    pub min_decrease_for_partial_path: i64,
    pub min_power_percentage_for_partial_path: i64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_cycle_size: 6,
            max_number_of_cycles: 1000,
            min_decrease_for_partial_path: 0,
            min_power_percentage_for_partial_path: 0,
        }
    }
}

/// Whether `attempt_to_grow` ran out of cycles to grow, or hit the cycle
/// size cap and cleared everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthResult {
    pub empty: bool,
    pub hit_cycle_length_limit: bool,
}

pub struct CyclesGrowthManager {
    options: Options,
    cycles: Vec<Cycle>,
}

impl CyclesGrowthManager {
    pub fn new(options: Options) -> Self {
        CyclesGrowthManager {
            options,
            cycles: Vec::new(),
        }
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn cycles_mut(&mut self) -> &mut Vec<Cycle> {
        &mut self.cycles
    }

    pub fn max_cycle_size(&self) -> usize {
        self.options.max_cycle_size
    }

    /// Seeds a 2-vertex cycle `[source, adj_v]` (decrease 1) for every
    /// mapped `source` and every neighbour `adj_v` of `source` strictly
    /// closer to `source`'s target than `source` itself is. Returns whether
    /// any cycle was seeded.
    pub fn reset(
        &mut self,
        mapping: &VertexMapping,
        distances: &mut impl Distances,
        neighbours: &mut impl Neighbours,
    ) -> Result<bool> {
        self.cycles.clear();
        'outer: for (source, target) in mapping.iter() {
            if source == target {
                continue;
            }
            let source_dist = distances.distance(source, target)?;
            let adjacent: Vec<Vertex> = neighbours.neighbours(source).to_vec();
            for adj_v in adjacent {
                let adj_dist = distances.distance(adj_v, target)?;
                if adj_dist < source_dist {
                    self.cycles.push(Cycle {
                        decrease: 1,
                        vertices: vec![source, adj_v],
                    });
                    if self.cycles.len() >= self.options.max_number_of_cycles {
                        break 'outer;
                    }
                }
            }
        }
        Ok(!self.cycles.is_empty())
    }

    /// For each cycle, tries closing it (swapping its last vertex back to
    /// its first). A cycle whose closed decrease stays positive is marked a
    /// candidate; once the first candidate appears, every earlier
    /// non-candidate cycle is discarded, and subsequent non-candidates are
    /// discarded as they're seen. Returns whether any candidate was found.
    pub fn attempt_to_close_cycles(
        &mut self,
        mapping: &VertexMapping,
        distances: &mut impl Distances,
    ) -> Result<bool> {
        let mut kept: Vec<Cycle> = Vec::new();
        let mut found_candidate = false;
        for cycle in std::mem::take(&mut self.cycles) {
            let first = cycle.vertices[0];
            let last = *cycle.vertices.last().unwrap();
            let decrease_close = get_move_decrease(mapping, last, first, distances)?;
            let new_decrease = cycle.decrease + decrease_close;
            if new_decrease > 0 {
                if !found_candidate {
                    kept.clear();
                    found_candidate = true;
                }
                kept.push(Cycle {
                    decrease: new_decrease,
                    vertices: cycle.vertices,
                });
            } else if !found_candidate {
                kept.push(cycle);
            }
            // else: a non-candidate seen after candidates were found; discard.
        }
        self.cycles = kept;
        Ok(found_candidate)
    }

    /// Extends every live cycle by one vertex along every neighbour of its
    /// back vertex not already in the cycle, pruning extensions whose
    /// decrease falls below the configured threshold. If every cycle is
    /// already at `max_cycle_size`, clears the population instead and
    /// reports the cap was hit.
    pub fn attempt_to_grow(
        &mut self,
        mapping: &VertexMapping,
        distances: &mut impl Distances,
        neighbours: &mut impl Neighbours,
    ) -> Result<GrowthResult> {
        if self.cycles.iter().all(|c| c.vertices.len() >= self.options.max_cycle_size) {
            self.cycles.clear();
            return Ok(GrowthResult {
                empty: true,
                hit_cycle_length_limit: true,
            });
        }
        let mut grown: Vec<Cycle> = Vec::new();
        for cycle in std::mem::take(&mut self.cycles) {
            if cycle.vertices.len() >= self.options.max_cycle_size {
                continue;
            }
            let back = *cycle.vertices.last().unwrap();
            let num_moves = cycle.vertices.len() as i64;
            let min_decrease = {
                let by_count = self.options.min_decrease_for_partial_path.min(num_moves);
                let pct = self.options.min_power_percentage_for_partial_path;
                let by_power = (99 + pct * num_moves) / 100;
                by_count.max(by_power)
            };
            let adjacent: Vec<Vertex> = neighbours.neighbours(back).to_vec();
            for adj_v in adjacent {
                if cycle.contains(adj_v) {
                    continue;
                }
                let new_decr = cycle.decrease + get_move_decrease(mapping, back, adj_v, distances)?;
                if new_decr < min_decrease {
                    continue;
                }
                let mut vertices = cycle.vertices.clone();
                vertices.push(adj_v);
                grown.push(Cycle {
                    decrease: new_decr,
                    vertices,
                });
                if grown.len() >= self.options.max_number_of_cycles {
                    self.cycles = grown;
                    return Ok(GrowthResult {
                        empty: false,
                        hit_cycle_length_limit: false,
                    });
                }
            }
        }
        let empty = grown.is_empty();
        self.cycles = grown;
        Ok(GrowthResult {
            empty,
            hit_cycle_length_limit: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListGraph;

    #[test]
    fn reset_seeds_cycles_towards_the_target() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2), (2, 3)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mapping = VertexMapping::from_pairs([(0, 3)]).unwrap();
        let mut gm = CyclesGrowthManager::new(Options::default());
        let any = gm.reset(&mapping, &mut d, &mut n).unwrap();
        assert!(any);
        assert_eq!(gm.cycles().len(), 1);
        assert_eq!(gm.cycles()[0].vertices, vec![0, 1]);
    }

    #[test]
    fn attempt_to_close_keeps_only_positive_decrease_cycles() {
        let mut graph = EdgeListGraph::from_edges([(0, 1), (1, 2)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        // A 2-cycle [0, 1] with tokens at 0 -> 1 and 1 -> 0: closing it
        // swaps both home, decrease = dist(0,1) + dist(1,0) = 2 > 0.
        let mapping = VertexMapping::from_pairs([(0, 1), (1, 0)]).unwrap();
        let mut gm = CyclesGrowthManager::new(Options::default());
        gm.reset(&mapping, &mut d, &mut n).unwrap();
        let found = gm.attempt_to_close_cycles(&mapping, &mut d).unwrap();
        assert!(found);
        assert!(gm.cycles().iter().all(|c| c.decrease > 0));
    }

    #[test]
    fn attempt_to_grow_reports_hit_limit_at_max_size() {
        let mut graph = EdgeListGraph::from_edges([(0, 1)]).unwrap();
        let (mut d, mut n) = graph.split_mut();
        let mapping = VertexMapping::from_pairs([(0, 1)]).unwrap();
        let mut gm = CyclesGrowthManager::new(Options {
            max_cycle_size: 2,
            ..Options::default()
        });
        gm.reset(&mapping, &mut d, &mut n).unwrap();
        let result = gm.attempt_to_grow(&mapping, &mut d, &mut n).unwrap();
        assert!(result.hit_cycle_length_limit);
        assert!(gm.cycles().is_empty());
    }
}

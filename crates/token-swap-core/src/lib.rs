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

//! A heuristic solver for the token swapping problem: given an undirected
//! graph and a partial injective mapping from current vertex to target
//! vertex, produce a short sequence of edge swaps realising it.
//!
//! [`BestFullTsa`] is the top-level entry point for callers already working
//! in the solver's own vertex space; [`arch::route`] is a thin convenience
//! layer for callers who think in terms of a logical/physical split.

pub mod arch;
pub mod arena;
pub mod best_full_tsa;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod hybrid_tsa;
pub mod lookup;
pub mod mapping;
pub mod optimiser;
pub mod path_finder;
pub mod swap_list;
pub mod table_optimiser;
pub mod token_tracker;
pub mod trivial_tsa;

pub use arch::{route, ArchGraph};
pub use best_full_tsa::{BestFullTsa, Options as BestFullTsaOptions};
pub use error::{Error, Result, Vertex};
pub use graph::{Distances, EdgeListGraph, GraphDistances, GraphNeighbours, Neighbours};
pub use mapping::{progress_l, VertexMapping};
pub use swap_list::{Swap, SwapList};

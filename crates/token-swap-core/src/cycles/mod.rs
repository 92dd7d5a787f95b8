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

//! The cycles engine: grows and closes candidate cyclic rotations of the
//! current mapping, greedily emitting a vertex-disjoint subset as swaps.

pub mod candidates;
pub mod growth;
pub mod partial_tsa;

pub use candidates::CyclesCandidateManager;
pub use growth::{Cycle, CyclesGrowthManager};
pub use partial_tsa::CyclesPartialTsa;

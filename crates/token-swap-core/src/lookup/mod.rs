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

//! A closed-form table of provably-optimal swap sequences for small (at
//! most 6 vertex) permutations, queried through a canonical relabelling so
//! the table only has to know permutation *shapes*.

pub mod canonical_relabelling;
pub mod exact_mapping;
pub mod filtered_sequences;
pub mod partial_mapping;
pub mod swap_conversion;
pub mod table;
pub mod vertex_map_resizing;

pub use canonical_relabelling::{CanonicalRelabelling, PermutationHash};
pub use exact_mapping::ExactMappingLookup;
pub use partial_mapping::{Parameters as PartialMappingParameters, PartialMappingLookup};
pub use swap_conversion::{EdgesBitset, SwapConversion, SwapHash};
pub use vertex_map_resizing::VertexMapResizing;

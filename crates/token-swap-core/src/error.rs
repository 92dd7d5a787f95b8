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

//! Error kinds surfaced across the crate boundary.
//!
//! None of these are caught internally: a solver run either completes or it
//! doesn't. `InternalInvariantViolation` is reserved for the bounded-loop and
//! monotone-progress assertions described in the component design; hitting
//! one indicates a bug in this crate rather than a malformed input.

/// A vertex identifier, as exposed at the crate boundary.
pub type Vertex = u64;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Attempted to construct a swap with `a == b`.
    #[error("invalid swap: vertex {0} cannot be swapped with itself")]
    InvalidSwap(Vertex),

    /// A `VertexMapping` had two keys mapping to the same target vertex.
    #[error("duplicate target vertex {target} (claimed by {first} and {second})")]
    DuplicateTarget {
        target: Vertex,
        first: Vertex,
        second: Vertex,
    },

    /// `Distances` was queried across two vertices in different connected
    /// components.
    #[error("no path between vertex {0} and vertex {1}: graph is disconnected")]
    DisconnectedGraph(Vertex, Vertex),

    /// The initial and desired logical maps passed to the architecture-level
    /// convenience wrapper don't cover the same set of logical qubits.
    #[error("initial and desired mappings disagree on their logical qubit set")]
    UnmatchedLogicalQubit,

    /// A bounded loop ran out of iterations, or a progress/consistency
    /// invariant was violated. Indicates a bug in this crate.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl Error {
    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        Error::InternalInvariantViolation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable_enough_to_match_on() {
        let err = Error::InvalidSwap(3);
        assert_eq!(
            err.to_string(),
            "invalid swap: vertex 3 cannot be swapped with itself"
        );
    }
}

//! Error types for keyroute-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors raised while building or searching a topology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// An edge points at an identifier that is not a node of the graph.
    #[error("edge {from} -> {to} references unknown node {to}")]
    UnknownNeighbor { from: String, to: String },

    /// An edge weight is negative or not a finite number.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    NegativeWeight {
        from: String,
        to: String,
        weight: f64,
    },

    /// The search origin is not a node of the graph.
    #[error("origin {0} is not part of the topology")]
    UnknownOrigin(String),
}

impl TopologyError {
    /// Whether this error is a setup contract breach rather than bad
    /// per-request input.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownNeighbor { .. } | Self::NegativeWeight { .. }
        )
    }
}

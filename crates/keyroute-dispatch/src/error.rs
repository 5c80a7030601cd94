//! Error types for keyroute-dispatch.
//!
//! Two classes share one enum. Denials ([`Error::InvalidOrigin`],
//! [`Error::NoServerReachable`], [`Error::RaceLost`]) are ordinary
//! per-transaction outcomes. [`Error::Invariant`] is a setup or contract
//! breach and indicates a defect.

use keyroute_fleet::{FleetError, KeyError};
use keyroute_topology::TopologyError;
use thiserror::Error;

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a transaction was not assigned a key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The origin is not a node of the topology.
    #[error("origin {0} is not part of the topology")]
    InvalidOrigin(String),

    /// The search exhausted every reachable node without finding a key.
    #[error("no server with an available key is reachable from {origin}")]
    NoServerReachable { origin: String },

    /// The located server lost its last available key before reservation.
    #[error("server {server} ran out of keys before reservation")]
    RaceLost { server: String },

    /// An internal contract was broken.
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl Error {
    /// Whether this is an ordinary denial the caller should log and move
    /// past.
    #[must_use]
    pub const fn is_denial(&self) -> bool {
        !self.is_defect()
    }

    /// Whether this indicates a defect in setup or in the dispatcher.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl From<TopologyError> for Error {
    fn from(e: TopologyError) -> Self {
        match e {
            TopologyError::UnknownOrigin(origin) => Error::InvalidOrigin(origin),
            other => Error::Invariant(InvariantViolation::Topology(other)),
        }
    }
}

impl From<KeyError> for Error {
    fn from(e: KeyError) -> Self {
        Error::Invariant(InvariantViolation::Key(e))
    }
}

impl From<FleetError> for Error {
    fn from(e: FleetError) -> Self {
        Error::Invariant(InvariantViolation::Fleet(e))
    }
}

/// Contract breaches surfaced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    /// A usage was recorded on an exhausted key.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The topology is malformed (negative weight, dangling edge).
    #[error(transparent)]
    Topology(TopologyError),

    /// The fleet could not be assembled.
    #[error(transparent)]
    Fleet(#[from] FleetError),

    /// A located server has no entry in the fleet.
    #[error("located server {0} is not part of the fleet")]
    MissingServer(String),
}

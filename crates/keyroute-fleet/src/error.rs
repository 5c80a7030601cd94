//! Error types for keyroute-fleet.

use thiserror::Error;

/// Errors raised while assembling a fleet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    /// Two servers share an identifier.
    #[error("server {0} is already part of the fleet")]
    DuplicateServer(String),

    /// Two keys on one server share an identifier.
    #[error("server {server} already holds key {key}")]
    DuplicateKey { server: String, key: String },

    /// A key was created with a cap of zero usages.
    #[error("key {0} must allow at least one usage")]
    ZeroCapacity(String),

    /// A restored key's counters contradict each other.
    #[error("key {key} has inconsistent state ({usages}/{max_usages} usages, expired={expired})")]
    InconsistentKey {
        key: String,
        usages: u32,
        max_usages: u32,
        expired: bool,
    },

    /// A server identifier is not part of the fleet.
    #[error("server {0} is not part of the fleet")]
    UnknownServer(String),
}

/// Contract violations on a single key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A usage was recorded on a key that had no capacity left.
    #[error("key {key} is exhausted ({usages}/{max_usages} usages)")]
    Exhausted {
        key: String,
        usages: u32,
        max_usages: u32,
    },
}

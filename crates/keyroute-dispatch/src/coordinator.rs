//! Assignment Coordinator - search, reserve, audit.
//!
//! Each transaction walks a small state machine:
//!
//! ```text
//! Searching ─┬─> Found ──> Reserving ─┬─> Assigned
//!            │                        └─> RaceLost
//!            └─> NotFound
//! ```
//!
//! The search reads availability without locking anything for longer than
//! one server's check, so a server that looked available can be drained by
//! another transaction before this one reserves. That window is reported as
//! [`Error::RaceLost`]; the coordinator does not retry at the next-nearest
//! server.

use std::sync::Arc;

use keyroute_fleet::{Fleet, KeyId, ServerId};
use keyroute_topology::{nearest_matching, SearchHit, Topology, Weight};
use tracing::{debug, error, info, trace, warn};

use crate::audit::AuditLog;
use crate::config::DispatchConfig;
use crate::error::{Error, InvariantViolation, Result};

/// Where a transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Running the nearest-available search.
    Searching,
    /// A server with an available key was settled.
    Found,
    /// No reachable server had an available key.
    NotFound,
    /// Reserving a key on the found server.
    Reserving,
    /// A key was reserved and audited.
    Assigned,
    /// The found server had no key left at reservation time.
    RaceLost,
}

impl TransactionState {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::NotFound | Self::Assigned | Self::RaceLost)
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Searching => write!(f, "Searching"),
            Self::Found => write!(f, "Found"),
            Self::NotFound => write!(f, "NotFound"),
            Self::Reserving => write!(f, "Reserving"),
            Self::Assigned => write!(f, "Assigned"),
            Self::RaceLost => write!(f, "RaceLost"),
        }
    }
}

/// A server located by the search but not yet reserved on.
///
/// Only [`Coordinator::locate`] produces these.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    origin: String,
    hit: SearchHit,
}

impl Located {
    /// The origin the search started from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The located server.
    pub fn server(&self) -> &str {
        &self.hit.server
    }

    /// Path cost from the origin.
    pub fn distance(&self) -> Weight {
        self.hit.distance
    }

    /// Nodes settled before the search stopped.
    pub fn settled(&self) -> usize {
        self.hit.settled
    }
}

/// A successful key assignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Transaction that received the key.
    pub transaction_id: String,
    /// Server the key came from.
    pub server_id: ServerId,
    /// Reserved key.
    pub key_id: KeyId,
    /// Path cost from the transaction's origin to the server.
    pub distance: Weight,
    /// Key usages after this reservation.
    pub usages: u32,
    /// The key's usage cap.
    pub max_usages: u32,
    /// Position of the audit record.
    pub sequence: u64,
}

impl Assignment {
    /// `(server, key)` pair.
    pub fn pair(&self) -> (&str, &str) {
        (&self.server_id, &self.key_id)
    }
}

/// Assigns keys to transactions from the nearest server that has one.
///
/// Safe to share across threads: the topology is immutable, each server
/// serialises its own reservations, and the audit log has its own lock.
#[derive(Debug)]
pub struct Coordinator {
    topology: Arc<Topology>,
    fleet: Arc<Fleet>,
    audit: Arc<AuditLog>,
    config: DispatchConfig,
}

impl Coordinator {
    /// Create a coordinator with default configuration.
    pub fn new(topology: Topology, fleet: Fleet) -> Self {
        Self::with_config(topology, fleet, DispatchConfig::default())
    }

    /// Create a coordinator with its own audit log built from `config`.
    pub fn with_config(topology: Topology, fleet: Fleet, config: DispatchConfig) -> Self {
        let audit = Arc::new(AuditLog::with_config(&config));
        Self::with_shared(Arc::new(topology), Arc::new(fleet), audit, config)
    }

    /// Create a coordinator over shared components, e.g. an audit log owned
    /// by the caller.
    pub fn with_shared(
        topology: Arc<Topology>,
        fleet: Arc<Fleet>,
        audit: Arc<AuditLog>,
        config: DispatchConfig,
    ) -> Self {
        debug!(
            servers = fleet.len(),
            nodes = topology.len(),
            edges = topology.edge_count(),
            "Created assignment coordinator"
        );
        Self {
            topology,
            fleet,
            audit,
            config,
        }
    }

    /// The topology searched.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The fleet reserved from.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The audit log.
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Shared handle to the audit log.
    pub fn audit_handle(&self) -> Arc<AuditLog> {
        Arc::clone(&self.audit)
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Assign a key to `transaction_id`, searching from `origin`.
    ///
    /// Denials come back as [`Error::InvalidOrigin`],
    /// [`Error::NoServerReachable`] or [`Error::RaceLost`]; none are retried.
    pub fn assign_key(&self, transaction_id: &str, origin: &str) -> Result<Assignment> {
        let result = self
            .locate(origin)
            .and_then(|located| self.reserve(transaction_id, &located));

        if let Err(e) = &result {
            if e.is_defect() {
                error!(transaction = transaction_id, origin, error = %e, "Assignment failed");
            } else {
                debug!(transaction = transaction_id, origin, reason = %e, "Assignment denied");
            }
        }

        result
    }

    /// Search phase: find the nearest server with an available key.
    pub fn locate(&self, origin: &str) -> Result<Located> {
        trace!(origin, state = %TransactionState::Searching, "Searching for an available key");

        let hit = nearest_matching(&self.topology, origin, |id| {
            self.fleet.has_available_key(id)
        })?;

        match hit {
            Some(hit) => {
                trace!(
                    origin,
                    server = %hit.server,
                    distance = hit.distance,
                    settled = hit.settled,
                    state = %TransactionState::Found,
                    "Located server"
                );
                Ok(Located {
                    origin: origin.to_string(),
                    hit,
                })
            }
            None => {
                trace!(origin, state = %TransactionState::NotFound, "No reachable server has a key");
                Err(Error::NoServerReachable {
                    origin: origin.to_string(),
                })
            }
        }
    }

    /// Reservation phase: consume one usage on the located server and
    /// audit it.
    ///
    /// The audit record is appended while the server's keys are still
    /// locked, so per-server audit order matches reservation order.
    pub fn reserve(&self, transaction_id: &str, located: &Located) -> Result<Assignment> {
        let server_id = located.server();
        let server = self
            .fleet
            .server(server_id)
            .ok_or_else(|| InvariantViolation::MissingServer(server_id.to_string()))?;

        trace!(
            transaction = transaction_id,
            server = server_id,
            state = %TransactionState::Reserving,
            "Reserving key"
        );

        let reserved = server.reserve_with(|key| {
            let record = self.audit.append(transaction_id, server_id, key.id());
            (record, key.usages(), key.max_usages())
        })?;

        let Some((record, usages, max_usages)) = reserved else {
            warn!(
                transaction = transaction_id,
                server = server_id,
                state = %TransactionState::RaceLost,
                "Server lost its last key before reservation"
            );
            return Err(Error::RaceLost {
                server: server_id.to_string(),
            });
        };

        info!(
            transaction = transaction_id,
            server = server_id,
            key = %record.key_id,
            usages,
            max_usages,
            distance = located.distance(),
            state = %TransactionState::Assigned,
            "Assigned key"
        );

        Ok(Assignment {
            transaction_id: record.transaction_id,
            server_id: record.server_id,
            key_id: record.key_id,
            distance: located.distance(),
            usages,
            max_usages,
            sequence: record.sequence,
        })
    }
}

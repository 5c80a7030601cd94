//! Keyroute Dispatch - nearest-available key assignment.
//!
//! This crate ties the topology search to the fleet's key reservation and
//! records every successful assignment in an audit log.
//!
//! # Overview
//!
//! For each transaction the [`Coordinator`]:
//!
//! 1. Runs a nearest-match search from the transaction's origin, settling
//!    servers in order of path cost and stopping at the first one that has
//!    an available key.
//! 2. Reserves one usage on that server. Selection and consumption are one
//!    critical section per server.
//! 3. Appends an [`AuditRecord`] and returns the [`Assignment`].
//!
//! Every outcome is distinguishable: [`Error::InvalidOrigin`],
//! [`Error::NoServerReachable`] and [`Error::RaceLost`] are denials,
//! [`Error::Invariant`] is a defect.
//!
//! # Example
//!
//! ```
//! use keyroute_dispatch::{Coordinator, Error};
//! use keyroute_fleet::Fleet;
//! use keyroute_topology::Topology;
//!
//! let topology = Topology::undirected([
//!     ("A", "B", 10.0),
//!     ("A", "C", 5.0),
//!     ("B", "C", 2.0),
//!     ("B", "D", 1.0),
//!     ("C", "D", 9.0),
//! ])?;
//!
//! let mut fleet = Fleet::from_ids(topology.nodes())?;
//! fleet.add_key("C", "kC1", 1)?;
//!
//! let coordinator = Coordinator::new(topology, fleet);
//!
//! let assignment = coordinator.assign_key("T1", "A")?;
//! assert_eq!(assignment.pair(), ("C", "kC1"));
//!
//! let denied = coordinator.assign_key("T2", "A").unwrap_err();
//! assert!(matches!(denied, Error::NoServerReachable { .. }));
//! assert_eq!(coordinator.audit_log().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audit;
pub mod config;
pub mod coordinator;
pub mod error;

pub use audit::{AuditLog, AuditRecord};
pub use config::{ConfigError, DispatchConfig, MAX_AUDIT_CAPACITY};
pub use coordinator::{Assignment, Coordinator, Located, TransactionState};
pub use error::{Error, InvariantViolation, Result};

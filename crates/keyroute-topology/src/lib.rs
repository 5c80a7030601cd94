//! Keyroute Topology
//!
//! Weighted cost graph over server identifiers, plus the nearest-match
//! search the dispatcher runs over it.
//!
//! # Model
//!
//! A [`Topology`] maps every server identifier to an ordered list of
//! outgoing `(neighbor, weight)` edges. Weights are routing or latency
//! costs and are never negative. A node with no outgoing edges is present
//! with an empty list; every neighbor must itself be a node.
//!
//! # Search
//!
//! [`nearest_matching`] is Dijkstra with an early exit: nodes are settled
//! in increasing distance order and the first settled node accepted by
//! the caller's predicate is returned. Equal distances are settled in
//! identifier order, so results are reproducible.
//!
//! ```
//! use keyroute_topology::{nearest_matching, Topology};
//!
//! let topology = Topology::undirected([("A", "B", 10.0), ("A", "C", 5.0)])?;
//! let hit = nearest_matching(&topology, "A", |id| id != "A")?.unwrap();
//!
//! assert_eq!(hit.server, "C");
//! assert_eq!(hit.distance, 5.0);
//! # Ok::<(), keyroute_topology::TopologyError>(())
//! ```

mod error;
mod graph;
mod search;

pub use error::{Result, TopologyError};
pub use graph::{Edge, NodeIndex, Topology};
pub use search::{nearest_matching, SearchHit};

/// Identifier of a server node in the topology.
pub type ServerId = String;

/// Routing cost of an edge or path.
pub type Weight = f64;

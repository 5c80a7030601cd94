//! Keyroute Fleet
//!
//! The credential-holding side of the dispatcher: [`Key`]s with a hard
//! usage cap, [`Server`]s that own them, and the [`Fleet`] that maps server
//! identifiers to servers.
//!
//! # Reservation
//!
//! A server's key set is the only mutable shared state in the system. It is
//! guarded by one lock per server, and [`Server::reserve_key`] is the only
//! mutating entry point: selecting the least-used available key and
//! consuming one unit of it happen inside the same critical section, so
//! concurrent callers can never over-consume a key.
//!
//! # Selection Policy
//!
//! Among available keys, the one with the lowest usage count wins. Ties go
//! to the key added first.

mod error;
mod fleet;
mod key;
mod server;

pub use error::{FleetError, KeyError};
pub use fleet::Fleet;
pub use key::{Key, KeyId};
pub use server::{Server, ServerId};

//! Keyroute Demo - example wiring for the dispatcher.
//!
//! Loads a fleet fixture (topology, keys, transactions) from JSON, builds a
//! [`Coordinator`](keyroute_dispatch::Coordinator) and pushes the
//! transactions through it, sequentially or from several tokio workers.
//!
//! # Fixture Format
//!
//! ```json
//! {
//!   "topology": { "A": [["B", 10], ["C", 5]], "B": [], "C": [] },
//!   "servers": { "C": [{ "id": "kC1", "max_usages": 2 }] },
//!   "transactions": [{ "id": "T1", "origin": "A" }]
//! }
//! ```
//!
//! Every topology node gets a server; `servers` provisions keys on them.

pub mod config;
pub mod error;
pub mod fixture;
pub mod runner;

pub use config::DemoConfig;
pub use error::{DemoError, Result};
pub use fixture::{Fixture, KeySpec, TransactionSpec};
pub use runner::{run, Outcome};

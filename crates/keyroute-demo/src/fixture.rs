//! JSON fleet fixtures.

use std::collections::BTreeMap;
use std::path::Path;

use keyroute_fleet::{Fleet, Key, Server};
use keyroute_topology::Topology;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The fixture shipped with the demo: four servers, five transactions.
pub const SCENARIO_A: &str = include_str!("../fixtures/scenario_a.json");

/// A key to provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub id: String,
    pub max_usages: u32,
}

/// A transaction to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSpec {
    pub id: String,
    pub origin: String,
}

/// Topology, key provisioning and workload in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// `node -> [[neighbor, weight], ...]`
    pub topology: BTreeMap<String, Vec<(String, f64)>>,
    /// `server -> keys`
    #[serde(default)]
    pub servers: BTreeMap<String, Vec<KeySpec>>,
    #[serde(default)]
    pub transactions: Vec<TransactionSpec>,
}

impl Fixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The built-in fixture.
    pub fn scenario_a() -> Result<Self> {
        Self::from_json(SCENARIO_A)
    }

    /// Build the topology and fleet this fixture describes.
    ///
    /// Each topology node becomes a server; keys may only be provisioned on
    /// those servers.
    pub fn build(&self) -> Result<(Topology, Fleet)> {
        let topology = Topology::from_adjacency(
            self.topology
                .iter()
                .map(|(node, edges)| (node.clone(), edges.clone())),
        )?;

        let mut fleet = Fleet::new();
        for node in topology.nodes() {
            let keys = self
                .servers
                .get(node)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|k| Key::new(k.id.clone(), k.max_usages))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            fleet.add_server(Server::with_keys(node, keys)?)?;
        }

        if let Some(unknown) = self.servers.keys().find(|id| !topology.contains(id)) {
            return Err(keyroute_fleet::FleetError::UnknownServer(unknown.clone()).into());
        }

        Ok((topology, fleet))
    }
}

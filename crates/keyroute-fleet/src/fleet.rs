//! The fleet: identifier -> server.

use std::collections::BTreeMap;

use crate::error::FleetError;
use crate::key::Key;
use crate::server::{Server, ServerId};

/// All servers known to the dispatcher.
///
/// The map shape is fixed after setup. Servers are shared by reference
/// across searches; only their key sets change, under each server's lock.
#[derive(Debug, Default)]
pub struct Fleet {
    servers: BTreeMap<ServerId, Server>,
}

impl Fleet {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self {
            servers: BTreeMap::new(),
        }
    }

    /// Create a fleet with one keyless server per identifier.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, FleetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ServerId>,
    {
        let mut fleet = Self::new();
        for id in ids {
            fleet.add_server(Server::new(id))?;
        }
        Ok(fleet)
    }

    /// Add a server. Identifiers must be unique.
    pub fn add_server(&mut self, server: Server) -> Result<(), FleetError> {
        if self.servers.contains_key(server.id()) {
            return Err(FleetError::DuplicateServer(server.id().to_string()));
        }
        self.servers.insert(server.id().to_string(), server);
        Ok(())
    }

    /// Provision a new key on an existing server.
    pub fn add_key(
        &mut self,
        server: &str,
        key_id: &str,
        max_usages: u32,
    ) -> Result<(), FleetError> {
        let key = Key::new(key_id, max_usages)?;
        self.servers
            .get_mut(server)
            .ok_or_else(|| FleetError::UnknownServer(server.to_string()))?
            .add_key(key)
    }

    /// Look up a server.
    pub fn server(&self, id: &str) -> Option<&Server> {
        self.servers.get(id)
    }

    /// Whether `id` names a server that currently has an available key.
    ///
    /// Unknown identifiers hold no keys.
    pub fn has_available_key(&self, id: &str) -> bool {
        self.server(id).is_some_and(Server::has_available_key)
    }

    /// Snapshot of a server's keys.
    pub fn key_status(&self, id: &str) -> Option<Vec<Key>> {
        self.server(id).map(Server::keys)
    }

    /// Iterate servers in identifier order.
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }

    /// Number of servers.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Check if the fleet has no servers.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

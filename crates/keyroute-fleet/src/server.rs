//! Key-holding servers.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{FleetError, KeyError};
use crate::key::{Key, KeyId};

/// Identifier of a server, unique across the fleet.
pub type ServerId = String;

/// An addressable node owning an ordered set of keys.
///
/// Reads take the key lock briefly and return snapshots. Reservation holds
/// the lock across selection and consumption.
#[derive(Debug)]
pub struct Server {
    id: ServerId,
    keys: Mutex<Vec<Key>>,
}

impl Server {
    /// Create a server with no keys.
    pub fn new(id: impl Into<ServerId>) -> Self {
        Self {
            id: id.into(),
            keys: Mutex::new(Vec::new()),
        }
    }

    /// Create a server holding `keys`, in order.
    pub fn with_keys<I>(id: impl Into<ServerId>, keys: I) -> Result<Self, FleetError>
    where
        I: IntoIterator<Item = Key>,
    {
        let mut server = Self::new(id);
        for key in keys {
            server.add_key(key)?;
        }
        Ok(server)
    }

    /// Add a key during setup.
    ///
    /// Takes `&mut self`: keys are never added once the server is shared.
    pub fn add_key(&mut self, key: Key) -> Result<(), FleetError> {
        let keys = self.keys.get_mut();
        if keys.iter().any(|k| k.id() == key.id()) {
            return Err(FleetError::DuplicateKey {
                server: self.id.clone(),
                key: key.id().to_string(),
            });
        }
        keys.push(key);
        Ok(())
    }

    /// Server identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of keys owned, available or not.
    pub fn key_count(&self) -> usize {
        self.keys.lock().len()
    }

    /// Whether any owned key can take another usage.
    pub fn has_available_key(&self) -> bool {
        self.keys.lock().iter().any(Key::available)
    }

    /// Total usages left across all keys.
    pub fn remaining_capacity(&self) -> u64 {
        self.keys
            .lock()
            .iter()
            .map(|k| u64::from(k.remaining()))
            .sum()
    }

    /// The key the next reservation would pick, without consuming it.
    ///
    /// Lowest usage count wins; ties go to the earliest key.
    pub fn select_key(&self) -> Option<Key> {
        let keys = self.keys.lock();
        select_index(&keys).map(|i| keys[i].clone())
    }

    /// Snapshot of every owned key, in insertion order.
    pub fn keys(&self) -> Vec<Key> {
        self.keys.lock().clone()
    }

    /// Select a key and consume one usage of it as a single step.
    ///
    /// Returns `Ok(None)` when no key is available.
    pub fn reserve_key(&self) -> Result<Option<KeyId>, KeyError> {
        self.reserve_with(|key| key.id().to_string())
    }

    /// Like [`reserve_key`](Self::reserve_key), running `on_reserved` on the
    /// consumed key before the lock is released.
    ///
    /// Anything `on_reserved` does is ordered with every other reservation
    /// on this server. It must not call back into this server.
    pub fn reserve_with<T, F>(&self, on_reserved: F) -> Result<Option<T>, KeyError>
    where
        F: FnOnce(&Key) -> T,
    {
        let mut keys = self.keys.lock();
        let Some(index) = select_index(&keys) else {
            debug!(server = %self.id, "No available key to reserve");
            return Ok(None);
        };

        let key = &mut keys[index];
        key.record_use()?;
        trace!(
            server = %self.id,
            key = %key.id(),
            usages = key.usages(),
            max_usages = key.max_usages(),
            "Reserved key usage"
        );

        Ok(Some(on_reserved(key)))
    }
}

/// Position of the least-used available key, first one on ties.
fn select_index(keys: &[Key]) -> Option<usize> {
    keys.iter()
        .enumerate()
        .filter(|(_, k)| k.available())
        .min_by_key(|(_, k)| k.usages())
        .map(|(i, _)| i)
}

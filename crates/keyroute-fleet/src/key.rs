//! Usage-capped keys.

use crate::error::{FleetError, KeyError};

/// Identifier of a key, unique within its server.
pub type KeyId = String;

/// A depletable credential.
///
/// Invariants:
/// - `usages` never decreases and never exceeds `max_usages`
/// - `expired` is true exactly when `usages == max_usages`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "KeyState"))]
pub struct Key {
    id: KeyId,
    usages: u32,
    max_usages: u32,
    expired: bool,
}

/// Unchecked wire form of a [`Key`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct KeyState {
    id: KeyId,
    usages: u32,
    max_usages: u32,
    expired: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<KeyState> for Key {
    type Error = FleetError;

    fn try_from(state: KeyState) -> Result<Self, FleetError> {
        let KeyState {
            id,
            usages,
            max_usages,
            expired,
        } = state;
        let mut key = Self::new(id, max_usages)?;
        if usages > max_usages || expired != (usages == max_usages) {
            return Err(FleetError::InconsistentKey {
                key: key.id,
                usages,
                max_usages,
                expired,
            });
        }
        key.usages = usages;
        key.expired = expired;
        Ok(key)
    }
}

impl Key {
    /// Create an unused key allowing `max_usages` reservations.
    pub fn new(id: impl Into<KeyId>, max_usages: u32) -> Result<Self, FleetError> {
        let id = id.into();
        if max_usages == 0 {
            return Err(FleetError::ZeroCapacity(id));
        }
        Ok(Self {
            id,
            usages: 0,
            max_usages,
            expired: false,
        })
    }

    /// Key identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Usages recorded so far.
    pub const fn usages(&self) -> u32 {
        self.usages
    }

    /// Hard cap fixed at creation.
    pub const fn max_usages(&self) -> u32 {
        self.max_usages
    }

    /// Whether the cap has been reached.
    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    /// Usages left before the key expires.
    pub const fn remaining(&self) -> u32 {
        self.max_usages - self.usages
    }

    /// Whether one more usage can be recorded.
    pub const fn available(&self) -> bool {
        !self.expired && self.usages < self.max_usages
    }

    /// Record one usage, expiring the key when it reaches its cap.
    ///
    /// Callers must have checked [`available`](Self::available) under the
    /// same lock. Recording a usage on an exhausted key is a contract
    /// violation and leaves the key untouched.
    pub fn record_use(&mut self) -> Result<(), KeyError> {
        if !self.available() {
            return Err(KeyError::Exhausted {
                key: self.id.clone(),
                usages: self.usages,
                max_usages: self.max_usages,
            });
        }
        self.usages += 1;
        if self.usages >= self.max_usages {
            self.expired = true;
        }
        Ok(())
    }
}

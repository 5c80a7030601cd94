//! Dispatcher configuration.

use thiserror::Error;

/// Environment variable toggling audit timestamps.
pub const ENV_AUDIT_TIMESTAMPS: &str = "KEYROUTE_AUDIT_TIMESTAMPS";

/// Environment variable sizing the audit log's initial allocation.
pub const ENV_AUDIT_CAPACITY: &str = "KEYROUTE_AUDIT_CAPACITY";

/// Largest initial audit allocation, in records.
pub const MAX_AUDIT_CAPACITY: usize = 1 << 20;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable or out-of-range value.
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Configuration for a [`Coordinator`](crate::Coordinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Stamp audit records with the wall-clock time of reservation.
    pub record_timestamps: bool,

    /// Initial capacity of the audit log, at most [`MAX_AUDIT_CAPACITY`].
    pub audit_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            record_timestamps: true,
            audit_capacity: 64,
        }
    }
}

impl DispatchConfig {
    /// Read configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_AUDIT_TIMESTAMPS) {
            let normalized = value.trim().to_ascii_lowercase();
            config.record_timestamps = match normalized.as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: ENV_AUDIT_TIMESTAMPS,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_AUDIT_CAPACITY) {
            config.audit_capacity = match value.trim().parse::<usize>() {
                Ok(n) if n <= MAX_AUDIT_CAPACITY => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: ENV_AUDIT_CAPACITY,
                        value,
                    })
                }
            };
        }

        Ok(config)
    }

    /// Enable or disable audit timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.record_timestamps = enabled;
        self
    }

    /// Set the audit log's initial capacity, clamped to
    /// [`MAX_AUDIT_CAPACITY`].
    #[must_use]
    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity.min(MAX_AUDIT_CAPACITY);
        self
    }
}

//! Demo configuration from arguments and environment.

use std::path::PathBuf;

use keyroute_dispatch::{ConfigError, DispatchConfig};

/// Environment variable naming a fixture file.
pub const ENV_FIXTURE: &str = "KEYROUTE_FIXTURE";

/// Environment variable setting the number of concurrent workers.
pub const ENV_WORKERS: &str = "KEYROUTE_WORKERS";

/// Upper bound on concurrent workers.
pub const MAX_WORKERS: usize = 256;

/// Configuration for a demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Fixture file; the built-in fixture is used when unset.
    pub fixture: Option<PathBuf>,

    /// Concurrent workers, `1..=MAX_WORKERS`. 1 processes transactions in
    /// order.
    pub workers: usize,

    /// Dispatcher configuration.
    pub dispatch: DispatchConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            workers: 1,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Read configuration from process arguments and environment.
    ///
    /// The first argument, if any, overrides `KEYROUTE_FIXTURE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_parts(&args, |name| std::env::var(name).ok())
    }

    /// Build configuration from explicit arguments and a variable lookup.
    pub fn from_parts<F>(args: &[String], lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fixture = args
            .first()
            .cloned()
            .or_else(|| lookup(ENV_FIXTURE))
            .map(PathBuf::from);

        let workers = match lookup(ENV_WORKERS) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_WORKERS).contains(&n) => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: ENV_WORKERS,
                        value,
                    })
                }
            },
            None => 1,
        };

        Ok(Self {
            fixture,
            workers,
            dispatch: DispatchConfig::from_lookup(lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_input() {
        let config = DemoConfig::from_parts(&[], |_| None).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn argument_beats_environment() {
        let args = vec!["from-arg.json".to_string()];
        let config = DemoConfig::from_parts(&args, |name| {
            (name == ENV_FIXTURE).then(|| "from-env.json".to_string())
        })
        .unwrap();
        assert_eq!(config.fixture, Some(PathBuf::from("from-arg.json")));
    }

    #[test]
    fn workers_must_be_positive() {
        let zero = DemoConfig::from_parts(&[], |name| (name == ENV_WORKERS).then(|| "0".into()));
        assert!(zero.is_err());

        let four = DemoConfig::from_parts(&[], |name| (name == ENV_WORKERS).then(|| "4".into()))
            .unwrap();
        assert_eq!(four.workers, 4);
    }

    #[test]
    fn oversized_values_rejected() {
        let huge = usize::MAX.to_string();
        let err = DemoConfig::from_parts(&[], |name| (name == ENV_WORKERS).then(|| huge.clone()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: ENV_WORKERS,
                value: huge.clone(),
            }
        );

        let err = DemoConfig::from_parts(&[], |name| {
            (name == keyroute_dispatch::config::ENV_AUDIT_CAPACITY).then(|| huge.clone())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name, .. }
            if name == keyroute_dispatch::config::ENV_AUDIT_CAPACITY));

        let max = DemoConfig::from_parts(&[], |name| {
            (name == ENV_WORKERS).then(|| MAX_WORKERS.to_string())
        })
        .unwrap();
        assert_eq!(max.workers, MAX_WORKERS);
    }
}

//! Error types for the demo.

use keyroute_dispatch::ConfigError;
use keyroute_fleet::FleetError;
use keyroute_topology::TopologyError;
use thiserror::Error;

/// Result type for demo operations.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Errors that can occur while loading or running a fixture.
#[derive(Debug, Error)]
pub enum DemoError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fixture is not valid JSON for the expected shape
    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    /// Fixture topology is malformed
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Fixture keys are malformed
    #[error("Fleet error: {0}")]
    Fleet(#[from] FleetError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A worker task panicked or was cancelled
    #[error("Worker error: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

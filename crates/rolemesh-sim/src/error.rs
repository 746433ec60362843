//! Error types for the simulation driver.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// Network generation, loading or saving failed
    #[error("Topology error: {0}")]
    Topology(#[from] rolemesh_topology::TopologyError),

    /// The protocol halted
    #[error("Protocol error: {0}")]
    Protocol(#[from] rolemesh_consensus::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

//! Error types for rolemesh-consensus.
//!
//! Every variant is fatal: the protocol is deterministic and round-based, so
//! there is nothing to retry. Stale or duplicate claim messages are not errors.

use rolemesh_topology::NodeId;
use thiserror::Error;

use crate::RoleId;

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that halt a role-assignment run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Some node cannot be reached from a message source.
    #[error("topology is disconnected: {unreachable} unreachable from {origin}")]
    DisconnectedGraph { origin: NodeId, unreachable: NodeId },

    /// A node was handed a claim about itself; the forwarding table or router is broken.
    #[error("node {node} received its own claim message")]
    SelfMessage { node: NodeId },

    /// A claim names a node outside the topology.
    #[error("node {node} received a claim from unknown node {source_node}")]
    UnknownSource { node: NodeId, source_node: NodeId },

    /// A yielding node found every role taken.
    #[error("node {node} has no available role after vacating {vacated}")]
    NoAvailableRole { node: NodeId, vacated: RoleId },

    /// Preference input does not have one row per node and one column per role.
    #[error("preference matrix malformed: row {row} has {len} scores, expected {expected}")]
    PreferenceShape { row: usize, len: usize, expected: usize },

    /// Preference input covers a different number of nodes than the topology.
    #[error("preference matrix has {rows} rows but topology has {nodes} nodes")]
    PreferenceSize { rows: usize, nodes: usize },

    /// A preference score is NaN or infinite.
    #[error("preference of {node} for {role} is not finite")]
    NonFinitePreference { node: NodeId, role: RoleId },
}

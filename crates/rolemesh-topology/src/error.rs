//! Error types for rolemesh-topology.

use thiserror::Error;

use crate::{GridCoord, NodeId};

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors that can occur while building or loading a topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// An edge references a node outside `0..node_count`.
    #[error("node {node} out of range for a topology of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    /// An edge connects a node to itself.
    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    /// A network layout line could not be parsed.
    #[error("malformed network line {line}: {content:?}")]
    Parse { line: usize, content: String },

    /// Two nodes of a layout occupy the same grid point.
    #[error("grid position {0} occupied twice")]
    DuplicatePosition(GridCoord),

    /// A layout contained no nodes.
    #[error("network layout contains no nodes")]
    EmptyNetwork,

    /// IO error while reading or writing a layout.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

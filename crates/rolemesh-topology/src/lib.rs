//! Rolemesh Topology
//!
//! The static communication graph a swarm runs its role-assignment protocol on.
//!
//! # Model
//!
//! A topology is an undirected, simple graph over nodes `0..N`. Edges are direct
//! communication links; a node can only ever exchange messages with the nodes it
//! shares an edge with. The protocol core reads a topology exclusively through the
//! [`Adjacency`] trait, so any loader can supply one.
//!
//! # Triangle Grid Networks
//!
//! Swarm networks are laid out on a 2D equilateral triangle grid. Every grid point
//! has six potential neighbors, and two placed nodes are linked exactly when their
//! grid points are adjacent. [`TriGridNetwork`] generates random connected layouts
//! and reads/writes the plain-text layout format (`"<x> <y>"` per line).

mod error;
mod graph;
mod grid;
mod network;

pub use error::{Result, TopologyError};
pub use graph::{Adjacency, NodeId, Topology};
pub use grid::GridCoord;
pub use network::TriGridNetwork;

/// Maximum number of links a node can have on the triangle grid.
pub const GRID_CONNECTIONS: usize = 6;

const _: () = assert!(GridCoord::DIRECTIONS.len() == GRID_CONNECTIONS);

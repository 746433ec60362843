//! Undirected communication graph.
//!
//! Nodes are identified by stable integer ids `0..N`. Adjacency lists are kept
//! sorted and de-duplicated so iteration order (and therefore every derived
//! routing table) is deterministic.

use std::collections::VecDeque;

use crate::error::{Result, TopologyError};

/// A node identifier, stable for the lifetime of a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Read-only neighbor access.
///
/// This is everything the role-assignment core needs from a topology.
pub trait Adjacency {
    /// Number of nodes; ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Direct neighbors of `node`.
    fn neighbors(&self, node: NodeId) -> &[NodeId];
}

/// An immutable undirected simple graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Topology {
    adjacency: Vec<Vec<NodeId>>,
}

impl Topology {
    /// Build a topology from an edge list.
    ///
    /// Duplicate edges (in either direction) collapse into one link.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut adjacency = vec![Vec::new(); node_count];

        for (a, b) in edges {
            for node in [a, b] {
                if node.0 >= node_count {
                    return Err(TopologyError::NodeOutOfRange { node, node_count });
                }
            }
            if a == b {
                return Err(TopologyError::SelfLoop(a));
            }
            adjacency[a.0].push(b);
            adjacency[b.0].push(a);
        }

        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self { adjacency })
    }

    /// A path `0 - 1 - ... - (n-1)`.
    pub fn line(n: usize) -> Self {
        let adjacency = (0..n)
            .map(|i| {
                let mut list = Vec::with_capacity(2);
                if i > 0 {
                    list.push(NodeId(i - 1));
                }
                if i + 1 < n {
                    list.push(NodeId(i + 1));
                }
                list
            })
            .collect();
        Self { adjacency }
    }

    /// A cycle over `n` nodes. Degenerates to a line for `n < 3`.
    pub fn ring(n: usize) -> Self {
        if n < 3 {
            return Self::line(n);
        }
        let adjacency = (0..n)
            .map(|i| {
                let mut list = vec![NodeId((i + n - 1) % n), NodeId((i + 1) % n)];
                list.sort_unstable();
                list
            })
            .collect();
        Self { adjacency }
    }

    /// The complete graph on `n` nodes.
    pub fn complete(n: usize) -> Self {
        let adjacency = (0..n)
            .map(|i| (0..n).filter(|&j| j != i).map(NodeId).collect())
            .collect();
        Self { adjacency }
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Check whether two nodes share a link.
    pub fn are_neighbors(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(a.0)
            .is_some_and(|list| list.binary_search(&b).is_ok())
    }

    /// Nodes that cannot be reached from `start`, in ascending order.
    pub fn unreachable_from(&self, start: NodeId) -> Vec<NodeId> {
        let n = self.adjacency.len();
        if start.0 >= n {
            return (0..n).map(NodeId).collect();
        }

        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([start]);
        seen[start.0] = true;

        while let Some(node) = queue.pop_front() {
            for &next in &self.adjacency[node.0] {
                if !seen[next.0] {
                    seen[next.0] = true;
                    queue.push_back(next);
                }
            }
        }

        seen.iter()
            .enumerate()
            .filter(|(_, &reached)| !reached)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// True when every node can reach every other node.
    ///
    /// The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        self.adjacency.is_empty() || self.unreachable_from(NodeId(0)).is_empty()
    }
}

impl Adjacency for Topology {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn line_has_two_ended_path() {
        let line = Topology::line(4);
        assert_eq!(line.neighbors(NodeId(0)), ids(&[1]).as_slice());
        assert_eq!(line.neighbors(NodeId(2)), ids(&[1, 3]).as_slice());
        assert_eq!(line.edge_count(), 3);
        assert!(line.is_connected());
    }

    #[test]
    fn complete_graph_edge_count() {
        let k5 = Topology::complete(5);
        assert_eq!(k5.edge_count(), 10);
        for i in 0..5 {
            assert_eq!(k5.neighbors(NodeId(i)).len(), 4);
        }
    }

    #[test]
    fn ring_wraps_around() {
        let ring = Topology::ring(5);
        assert!(ring.are_neighbors(NodeId(0), NodeId(4)));
        assert_eq!(ring.edge_count(), 5);
    }

    #[test]
    fn from_edges_dedups_and_symmetrizes() {
        let edges = [(NodeId(0), NodeId(1)), (NodeId(1), NodeId(0)), (NodeId(1), NodeId(2))];
        let topology = Topology::from_edges(3, edges).unwrap();

        assert_eq!(topology.edge_count(), 2);
        assert!(topology.are_neighbors(NodeId(1), NodeId(0)));
        assert!(topology.are_neighbors(NodeId(2), NodeId(1)));
        assert!(!topology.are_neighbors(NodeId(0), NodeId(2)));
    }

    #[test]
    fn from_edges_rejects_bad_edges() {
        assert!(matches!(
            Topology::from_edges(2, [(NodeId(0), NodeId(5))]),
            Err(TopologyError::NodeOutOfRange { node: NodeId(5), node_count: 2 })
        ));
        assert!(matches!(
            Topology::from_edges(2, [(NodeId(1), NodeId(1))]),
            Err(TopologyError::SelfLoop(NodeId(1)))
        ));
    }

    #[test]
    fn disconnected_graph_detected() {
        let topology = Topology::from_edges(4, [(NodeId(0), NodeId(1)), (NodeId(2), NodeId(3))]).unwrap();

        assert!(!topology.is_connected());
        assert_eq!(topology.unreachable_from(NodeId(0)), ids(&[2, 3]));
    }

    #[test]
    fn single_node_is_connected() {
        let topology = Topology::line(1);
        assert!(topology.is_connected());
        assert!(topology.neighbors(NodeId(0)).is_empty());
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let topology = Topology::line(3);
        assert!(topology.neighbors(NodeId(9)).is_empty());
    }
}

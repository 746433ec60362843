//! Gradient field: per-source hop distances and outward forwarding edges.
//!
//! For every node `s` treated as a message source, `gradient(s, n)` is the BFS
//! hop distance from `s` to `n`. A node relays `s`'s messages only to neighbors
//! exactly one hop farther from `s`, so every message flows strictly outward,
//! never loops, and reaches every node within `eccentricity(s)` relays.
//!
//! ```text
//!     source s            gradient 0
//!      /    \
//!     a      b            gradient 1   forward(s, s) = {a, b}
//!     |    /   \
//!     c   d     e         gradient 2   forward(s, b) = {d, e}
//! ```
//!
//! Both tables are computed once, before any round, and never change.

use std::collections::VecDeque;

use rolemesh_topology::{Adjacency, NodeId};

use crate::error::{Error, Result};

/// Precomputed gradients and forwarding sets for every (source, node) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientField {
    size: usize,
    /// `gradients[s * size + n]`
    gradients: Vec<u32>,
    /// `forwarding[s * size + n]`
    forwarding: Vec<Vec<NodeId>>,
}

impl GradientField {
    /// Run one BFS per source and derive the forwarding table.
    ///
    /// Fails with [`Error::DisconnectedGraph`] if any node is unreachable from
    /// some source.
    pub fn build<G: Adjacency + ?Sized>(graph: &G) -> Result<Self> {
        let size = graph.node_count();
        let mut gradients = vec![u32::MAX; size * size];

        for s in 0..size {
            let row = &mut gradients[s * size..(s + 1) * size];
            bfs(graph, NodeId(s), row);
            if let Some(n) = row.iter().position(|&g| g == u32::MAX) {
                return Err(Error::DisconnectedGraph {
                    origin: NodeId(s),
                    unreachable: NodeId(n),
                });
            }
        }

        let mut forwarding = Vec::with_capacity(size * size);
        for s in 0..size {
            let row = &gradients[s * size..(s + 1) * size];
            for n in 0..size {
                let next = row[n] + 1;
                forwarding.push(
                    graph
                        .neighbors(NodeId(n))
                        .iter()
                        .copied()
                        .filter(|m| row[m.0] == next)
                        .collect(),
                );
            }
        }

        Ok(Self {
            size,
            gradients,
            forwarding,
        })
    }

    /// Number of nodes covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Hop distance from `source` to `node`.
    #[inline]
    pub fn gradient(&self, source: NodeId, node: NodeId) -> u32 {
        self.gradients[source.0 * self.size + node.0]
    }

    /// Neighbors `node` relays `source`'s messages to.
    #[inline]
    pub fn forward_targets(&self, source: NodeId, node: NodeId) -> &[NodeId] {
        &self.forwarding[source.0 * self.size + node.0]
    }

    /// Largest gradient from `source`.
    pub fn eccentricity(&self, source: NodeId) -> u32 {
        let start = source.0 * self.size;
        self.gradients[start..start + self.size]
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Graph diameter: the largest gradient over all sources.
    pub fn diameter(&self) -> u32 {
        self.gradients.iter().copied().max().unwrap_or(0)
    }
}

fn bfs<G: Adjacency + ?Sized>(graph: &G, source: NodeId, dist: &mut [u32]) {
    let mut queue = VecDeque::from([source]);
    dist[source.0] = 0;

    while let Some(node) = queue.pop_front() {
        let next = dist[node.0] + 1;
        for &m in graph.neighbors(node) {
            if dist[m.0] == u32::MAX {
                dist[m.0] = next;
                queue.push_back(m);
            }
        }
    }
}
